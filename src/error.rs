//! Persistence error types.
//!
//! None of these are fatal: the container keeps its in-memory state as the
//! source of truth and only logs or reports them.

use thiserror::Error;

/// Errors raised while reading or writing the persisted list.
#[derive(Debug, Error)]
pub enum PersistError {
    /// The key-value backend failed to read or write.
    #[error("storage error for key '{key}': {message}")]
    Storage { key: String, message: String },

    /// Filesystem-backed storage failed.
    #[error("storage I/O error for key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// Stored bytes are not a valid envelope.
    #[error("failed to decode snapshot: {0}")]
    Decode(#[source] serde_json::Error),

    /// Snapshot could not be serialized.
    #[error("failed to encode snapshot: {0}")]
    Encode(#[source] serde_json::Error),

    /// Envelope was written by a newer build.
    #[error("unsupported envelope version {found} (supported up to {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// The writer task is gone; queued snapshots can no longer be persisted.
    #[error("persistence writer has stopped")]
    WriterClosed,
}

impl PersistError {
    pub(crate) fn storage(key: &str, message: impl Into<String>) -> Self {
        Self::Storage {
            key: key.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PersistError>;
