//! Record store error types.

use thiserror::Error;

/// Errors raised while reading, ingesting or writing PR records.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The persisted table has the wrong schema or undecodable rows.
    #[error("Record store '{path}' is corrupt: {reason}")]
    Corrupt { path: String, reason: String },

    /// A snapshot record failed validation. The whole batch is rejected.
    #[error("Malformed record #{number}: {reason}")]
    MalformedRecord { number: u64, reason: String },

    /// The snapshot is not a JSON array of PR objects.
    #[error("Failed to parse snapshot '{path}': {source}")]
    Snapshot {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// Failed to read or write a file.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.display().to_string(),
            source,
        }
    }

    pub(crate) fn corrupt(path: &std::path::Path, reason: impl Into<String>) -> Self {
        StoreError::Corrupt {
            path: path.display().to_string(),
            reason: reason.into(),
        }
    }
}
