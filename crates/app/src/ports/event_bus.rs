//! Event bus port — publish/subscribe for autoff events.

use autoff_domain::error::AutoffError;
use autoff_domain::event::AutoffEvent;

/// Publishes events to interested subscribers.
pub trait EventPublisher {
    /// Publish an event to all current subscribers.
    fn publish(&self, event: AutoffEvent) -> impl Future<Output = Result<(), AutoffError>> + Send;
}

impl<T: EventPublisher + Send + Sync> EventPublisher for std::sync::Arc<T> {
    fn publish(&self, event: AutoffEvent) -> impl Future<Output = Result<(), AutoffError>> + Send {
        (**self).publish(event)
    }
}
