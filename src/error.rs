//! Error types for the monitor library.

use std::path::PathBuf;

use soakwatch_types::SchemaVersion;
use thiserror::Error;

/// Errors that can abort a monitor run.
///
/// Malformed records are not errors; they are skipped and counted.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// Filesystem access failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The state file exists but is not a valid state document.
    #[error("Failed to parse state file {path}: {source}")]
    StateParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The state file was written with an incompatible schema.
    #[error("State file {path} has schema version {found}, expected {expected}")]
    IncompatibleState {
        path: PathBuf,
        found: SchemaVersion,
        expected: SchemaVersion,
    },

    /// A configured log path does not exist.
    #[error("Log input not found: {0}")]
    MissingInput(PathBuf),

    /// Configuration could not be loaded or is invalid.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Serializing a document failed.
    #[error("Failed to serialize {what}: {source}")]
    Serialize {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl MonitorError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MonitorError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<config::ConfigError> for MonitorError {
    fn from(err: config::ConfigError) -> Self {
        MonitorError::Config(err.to_string())
    }
}

/// Result alias for monitor operations.
pub type Result<T> = std::result::Result<T, MonitorError>;
