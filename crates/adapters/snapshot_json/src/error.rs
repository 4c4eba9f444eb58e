//! Snapshot-store-specific error type wrapping file IO errors.

use autoff_domain::error::AutoffError;

/// Errors originating from the JSON snapshot file.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// Reading or writing the snapshot file failed.
    #[error("snapshot file error")]
    Io(#[from] std::io::Error),

    /// Failed to encode the snapshot map as JSON.
    #[error("snapshot serialization error")]
    Json(#[from] serde_json::Error),
}

impl From<SnapshotError> for AutoffError {
    fn from(err: SnapshotError) -> Self {
        Self::Storage(Box::new(err))
    }
}
