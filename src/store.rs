use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use crate::ledger::Ledger;

pub const STATE_FILE_NAME: &str = "raffle_memory.txt";

// The state file holds a single JSON object:
// {
//    "score": { "alice": { "count": 2, "excluded": false }, ... },
//    "history": [ "alice", "bob", "alice" ]
// }
// Older files map each name straight to its count; those still load.

/// `raffle_memory.txt` next to the running executable, or in the working
/// directory when the executable location is unknown.
pub fn default_state_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(STATE_FILE_NAME)
}

/// Reads the ledger from `path`. A missing file is `Ok(None)`.
pub fn load(path: &Path) -> StoreResult<Option<Ledger>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => return Err(StoreError::Io { path: path.to_path_buf(), source }),
    };
    let reader = BufReader::new(file);
    let ledger = serde_json::from_reader(reader)
        .map_err(|source| StoreError::Malformed { path: path.to_path_buf(), source })?;
    Ok(Some(ledger))
}

/// Writes the ledger to `path`, creating the parent directory if needed.
pub fn save(ledger: &Ledger, path: &Path) -> StoreResult<()> {
    let io_err = |source: std::io::Error| StoreError::Io { path: path.to_path_buf(), source };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, ledger).map_err(|e| io_err(e.into()))?;
    writer.flush().map_err(io_err)?;
    Ok(())
}

/// Best-effort save: failures are logged, never raised.
/// Returns whether the state reached the disk.
pub fn persist(ledger: &Ledger, path: &Path) -> bool {
    match save(ledger, path) {
        Ok(()) => {
            debug!(path = %path.display(), "state saved");
            true
        }
        Err(e) => {
            warn!("{e}");
            false
        }
    }
}

/// Loads the saved ledger, or builds the fallback when there is none or it
/// cannot be read. The saved state replaces the fallback entirely.
pub fn restore(path: &Path, fallback: impl FnOnce() -> Ledger) -> Ledger {
    match load(path) {
        Ok(Some(ledger)) => {
            debug!(path = %path.display(), contestants = ledger.len(), "state restored");
            ledger
        }
        Ok(None) => {
            debug!(path = %path.display(), "no saved state, using defaults");
            fallback()
        }
        Err(e) => {
            warn!("{e}; starting from defaults");
            fallback()
        }
    }
}
