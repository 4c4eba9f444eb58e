//! Snapshot store port — persistence for timer snapshots.

use autoff_domain::error::AutoffError;
use autoff_domain::snapshot::TimerSnapshot;
use autoff_domain::target::TargetId;

/// Persists one [`TimerSnapshot`] per target so armed deadlines survive a
/// restart.
pub trait SnapshotStore {
    /// Last saved snapshot for `target`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`AutoffError::Storage`] when the backing store cannot be
    /// read.
    fn load(
        &self,
        target: &TargetId,
    ) -> impl Future<Output = Result<Option<TimerSnapshot>, AutoffError>> + Send;

    /// Write `snapshot`, replacing any previous one for the same target.
    ///
    /// # Errors
    ///
    /// Returns [`AutoffError::Storage`] when the write fails.
    fn save(&self, snapshot: &TimerSnapshot)
    -> impl Future<Output = Result<(), AutoffError>> + Send;
}

impl<T: SnapshotStore + Send + Sync> SnapshotStore for std::sync::Arc<T> {
    fn load(
        &self,
        target: &TargetId,
    ) -> impl Future<Output = Result<Option<TimerSnapshot>, AutoffError>> + Send {
        (**self).load(target)
    }

    fn save(
        &self,
        snapshot: &TimerSnapshot,
    ) -> impl Future<Output = Result<(), AutoffError>> + Send {
        (**self).save(snapshot)
    }
}
