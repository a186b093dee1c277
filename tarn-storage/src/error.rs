use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("read error: {reason}")]
    ReadError { reason: String },

    #[error("write error: {reason}")]
    WriteError { reason: String },

    #[error("batch error: {reason}")]
    BatchError { reason: String },
}
