//! Switchboard port — the full control surface of a device integration.
//!
//! [`StateSource`](super::StateSource) is the narrow read the timers use.
//! Driving adapters that let an operator inspect and flip targets go
//! through this wider port instead, so they stay decoupled from any
//! concrete integration.

use autoff_domain::error::AutoffError;
use autoff_domain::state::TargetState;
use autoff_domain::target::TargetId;

/// Lists and commands the targets of a device integration.
pub trait Switchboard {
    /// Every target the integration knows with its current state, in id
    /// order.
    fn target_states(&self) -> impl Future<Output = Vec<(TargetId, TargetState)>> + Send;

    /// Set `target` to `state`.
    ///
    /// # Errors
    ///
    /// Returns [`AutoffError::NotFound`] when the integration does not
    /// know the target.
    fn set_target_state(
        &self,
        target: &TargetId,
        state: TargetState,
    ) -> impl Future<Output = Result<(), AutoffError>> + Send;
}

impl<T: Switchboard + Send + Sync> Switchboard for std::sync::Arc<T> {
    fn target_states(&self) -> impl Future<Output = Vec<(TargetId, TargetState)>> + Send {
        (**self).target_states()
    }

    fn set_target_state(
        &self,
        target: &TargetId,
        state: TargetState,
    ) -> impl Future<Output = Result<(), AutoffError>> + Send {
        (**self).set_target_state(target, state)
    }
}
