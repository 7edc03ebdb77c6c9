//! Error types for the raffle
//!
//! - `RaffleError` for misuse of the ledger
//! - `StoreError` for the state file
//! - `ConfigError` for the TOML configuration
//! - `Error` as the top-level error type

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Raffle(#[from] RaffleError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by ledger operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RaffleError {
    #[error("Nobody left to pick: every contestant is excluded or the list is empty")]
    EmptyPool,

    #[error("Contestant name must not be empty")]
    EmptyName,

    #[error("{0} is not in the list")]
    UnknownContestant(String),

    #[error("{0} has reached the highest possible count")]
    CountOverflow(String),

    #[error("Invalid edit: {0}")]
    InvalidEdit(String),
}

/// Errors reading or writing the state file
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Could not access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed state file {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors loading the configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Result type alias for Error
pub type Result<T> = std::result::Result<T, Error>;

/// Result type alias for RaffleError
pub type RaffleResult<T> = std::result::Result<T, RaffleError>;

/// Result type alias for StoreError
pub type StoreResult<T> = std::result::Result<T, StoreError>;
