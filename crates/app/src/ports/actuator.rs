//! Actuator port — family-keyed turn-off dispatch.

use async_trait::async_trait;

use autoff_domain::error::AutoffError;
use autoff_domain::target::TargetId;

/// Turns targets of one device family off.
///
/// The registry resolves the actuator for a timer once, when the timer is
/// attached, by matching [`family`](Self::family) against the target id's
/// family segment. Implementations return as soon as the command is
/// accepted; they do not wait for the device to confirm.
#[async_trait]
pub trait Actuator: Send + Sync {
    /// Family this actuator serves, e.g. `switch`.
    fn family(&self) -> &str;

    /// Dispatch a turn-off for `target`.
    ///
    /// # Errors
    ///
    /// Returns [`AutoffError::Dispatch`] when the command cannot be
    /// accepted.
    async fn turn_off(&self, target: &TargetId) -> Result<(), AutoffError>;
}
