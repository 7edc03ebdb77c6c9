//! Configuration file support.
//!
//! Configuration is loaded from `<config dir>/name-raffle/config.toml`
//! (e.g. `~/.config/name-raffle/config.toml`) with the following precedence:
//! 1. CLI arguments (highest priority)
//! 2. Environment variables
//! 3. Configuration file
//! 4. Default values (lowest priority)
//!
//! # Example Configuration
//!
//! ```toml
//! state_file = "~/raffle/raffle_memory.txt"
//!
//! # contestants of a fresh raffle, used until a state file exists
//! contestants = ["alice", "bob", "carol"]
//!
//! [suspense]
//! style = "dots"
//! duration_ms = 1500
//! ```

use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::ledger::{DEFAULT_SEED_SIZE, Ledger};
use crate::store;
use crate::suspense::{DEFAULT_DURATION_MS, SuspenseStyle};

/// Environment variable overriding the state file location.
pub const STATE_ENV: &str = "RAFFLE_STATE";

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Where picks and counts are kept between runs
    pub state_file: Option<PathBuf>,

    /// Contestants of a fresh raffle
    pub contestants: Option<Vec<String>>,

    pub suspense: SuspenseConfig,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SuspenseConfig {
    pub style: SuspenseStyle,
    pub duration_ms: u64,
}

impl Default for SuspenseConfig {
    fn default() -> Self {
        Self {
            style: SuspenseStyle::default(),
            duration_ms: DEFAULT_DURATION_MS,
        }
    }
}

impl SuspenseConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

impl Config {
    /// `<config dir>/name-raffle/config.toml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs_next::config_dir().map(|dir| dir.join("name-raffle").join("config.toml"))
    }

    /// Loads the file at `path`; it must exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Like `load`, but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::Io { source, .. }) if source.kind() == ErrorKind::NotFound => {
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Resolves the state file: `flag`, then `$RAFFLE_STATE`, then the config
    /// file, then the file next to the executable.
    pub fn state_path(&self, flag: Option<PathBuf>) -> PathBuf {
        self.resolve_state_path(flag, std::env::var_os(STATE_ENV))
    }

    fn resolve_state_path(&self, flag: Option<PathBuf>, env: Option<OsString>) -> PathBuf {
        flag.or_else(|| env.filter(|v| !v.is_empty()).map(PathBuf::from))
            .or_else(|| self.state_file.clone())
            .unwrap_or_else(store::default_state_path)
    }

    /// The ledger a raffle starts from when nothing has been saved yet.
    pub fn seed_ledger(&self) -> Ledger {
        match &self.contestants {
            Some(names) => Ledger::with_contestants(names),
            None => Ledger::seeded(DEFAULT_SEED_SIZE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_full_config() {
        let config: Config = toml::from_str(
            r#"
            state_file = "/tmp/raffle.txt"
            contestants = ["Alice", "bob"]

            [suspense]
            style = "dots"
            duration_ms = 900
            "#,
        )
        .unwrap();

        assert_eq!(config.state_file, Some(PathBuf::from("/tmp/raffle.txt")));
        assert_eq!(config.suspense.style, SuspenseStyle::Dots);
        assert_eq!(config.suspense.duration(), Duration::from_millis(900));
        assert_eq!(config.seed_ledger(), Ledger::with_contestants(["alice", "bob"]));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.suspense.style, SuspenseStyle::Names);
        assert_eq!(config.suspense.duration_ms, 2250);
        assert_eq!(config.seed_ledger().len(), 28);
    }

    #[test]
    fn test_partial_suspense_section() {
        let config: Config = toml::from_str("[suspense]\nstyle = \"off\"\n").unwrap();
        assert_eq!(config.suspense.style, SuspenseStyle::Off);
        assert_eq!(config.suspense.duration_ms, DEFAULT_DURATION_MS);
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(toml::from_str::<Config>("colour = \"red\"\n").is_err());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        assert!(matches!(Config::load(&path), Err(ConfigError::Io { .. })));
        assert_eq!(Config::load_or_default(&path).unwrap(), Config::default());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "state_file = [").unwrap();
        assert!(matches!(
            Config::load_or_default(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_state_path_precedence() {
        let config = Config {
            state_file: Some(PathBuf::from("from-config.txt")),
            ..Config::default()
        };
        let flag = Some(PathBuf::from("from-flag.txt"));
        let env = Some(OsString::from("from-env.txt"));

        assert_eq!(
            config.resolve_state_path(flag, env.clone()),
            PathBuf::from("from-flag.txt")
        );
        assert_eq!(config.resolve_state_path(None, env), PathBuf::from("from-env.txt"));
        assert_eq!(
            config.resolve_state_path(None, Some(OsString::new())),
            PathBuf::from("from-config.txt")
        );
        assert_eq!(
            Config::default().resolve_state_path(None, None),
            store::default_state_path()
        );
    }
}
