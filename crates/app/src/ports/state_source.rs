//! State source port — read access to target states.

use autoff_domain::error::AutoffError;
use autoff_domain::state::TargetState;
use autoff_domain::target::TargetId;

/// Reads the current observed state of a target.
pub trait StateSource {
    /// Current state of `target`, or `None` when the target is unknown
    /// to the source.
    fn current_state(
        &self,
        target: &TargetId,
    ) -> impl Future<Output = Result<Option<TargetState>, AutoffError>> + Send;
}

impl<T: StateSource + Send + Sync> StateSource for std::sync::Arc<T> {
    fn current_state(
        &self,
        target: &TargetId,
    ) -> impl Future<Output = Result<Option<TargetState>, AutoffError>> + Send {
        (**self).current_state(target)
    }
}
