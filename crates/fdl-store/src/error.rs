use std::path::PathBuf;

/// Errors from snapshot and counter persistence.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Atomic replace of a file failed.
    #[error("failed to replace {}: {source}", path.display())]
    Replace {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A persisted counter does not hold a decimal integer.
    #[error("invalid sequence counter for {date}: {raw:?}")]
    InvalidCounter { date: String, raw: String },

    /// The backend refused the write.
    #[error("store is read-only")]
    ReadOnly,
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
