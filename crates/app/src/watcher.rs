//! Watches the event bus for target state changes.

use std::sync::Arc;

use tokio::sync::broadcast;

use autoff_domain::event::AutoffEvent;

use crate::ports::{EventPublisher, SnapshotStore, StateSource, TimerScheduler};
use crate::registry::TimerRegistry;

/// Consume `receiver`, routing every target change to the registry, until
/// the bus closes.
///
/// Timer updates on the same bus are passed over. When the receiver lags
/// behind the bus the dropped changes are logged and consumption resumes;
/// the affected timers simply stay where they were.
pub async fn run<S, T, P, B>(
    registry: Arc<TimerRegistry<S, T, P, B>>,
    mut receiver: broadcast::Receiver<AutoffEvent>,
) where
    S: TimerScheduler + Send + Sync + 'static,
    T: StateSource + Send + Sync + 'static,
    P: SnapshotStore + Send + Sync + 'static,
    B: EventPublisher + Send + Sync + 'static,
{
    loop {
        match receiver.recv().await {
            Ok(AutoffEvent::TargetChanged(change)) => {
                tracing::debug!(target = %change.target, "observed target state change");
                registry.dispatch_change(&change).await;
            }
            Ok(AutoffEvent::TimerUpdated(_)) => {}
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "event bus lagged, target changes dropped");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
