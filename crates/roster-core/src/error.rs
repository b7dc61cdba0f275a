use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by Active Roster.
#[derive(Error, Debug)]
pub enum RosterError {
    /// The scan root (or a series directory) could not be enumerated.
    #[error("Failed to read directory {path}: {source}")]
    DirectoryUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An event export could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A record line did not have the expected tab-separated layout.
    #[error("Malformed record in {path} at line {line}: {reason}")]
    MalformedRecord {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    /// A command-line value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl RosterError {
    /// `true` for errors after which a scan can continue with the next
    /// file or line.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            RosterError::FileUnreadable { .. } | RosterError::MalformedRecord { .. }
        )
    }
}

/// Convenience alias used throughout the roster crates.
pub type Result<T> = std::result::Result<T, RosterError>;
