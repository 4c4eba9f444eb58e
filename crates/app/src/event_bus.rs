//! In-process event bus backed by a tokio broadcast channel.

use tokio::sync::broadcast;

use autoff_domain::error::AutoffError;
use autoff_domain::event::AutoffEvent;

use crate::ports::EventPublisher;

/// In-process event bus using a tokio [`broadcast`] channel.
///
/// Publishing succeeds even when there are no active subscribers
/// (the event is simply dropped).
pub struct InProcessEventBus {
    sender: broadcast::Sender<AutoffEvent>,
}

impl InProcessEventBus {
    /// Create a new event bus with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to events on this bus.
    ///
    /// Returns a receiver that will get all events published *after*
    /// the subscription is created.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<AutoffEvent> {
        self.sender.subscribe()
    }
}

impl EventPublisher for InProcessEventBus {
    fn publish(&self, event: AutoffEvent) -> impl Future<Output = Result<(), AutoffError>> + Send {
        // broadcast::send fails only when there are zero receivers,
        // which is fine — we simply ignore the error.
        let _ = self.sender.send(event);
        async { Ok(()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autoff_domain::state::{StateChange, TargetState};
    use autoff_domain::target::TargetId;
    use autoff_domain::time::now;

    fn heater_turned_on() -> AutoffEvent {
        AutoffEvent::TargetChanged(StateChange {
            target: TargetId::parse("switch.heater").unwrap(),
            old: Some(TargetState::Off),
            new: Some(TargetState::On),
            at: now(),
        })
    }

    #[tokio::test]
    async fn should_deliver_event_to_subscriber() {
        let bus = InProcessEventBus::new(16);
        let mut rx = bus.subscribe();

        let event = heater_turned_on();
        bus.publish(event.clone()).await.unwrap();

        let received = rx.recv().await.unwrap();
        assert_eq!(received, event);
    }

    #[tokio::test]
    async fn should_deliver_event_to_multiple_subscribers() {
        let bus = InProcessEventBus::new(16);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(heater_turned_on()).await.unwrap();

        assert!(matches!(rx1.recv().await, Ok(AutoffEvent::TargetChanged(_))));
        assert!(matches!(rx2.recv().await, Ok(AutoffEvent::TargetChanged(_))));
    }

    #[tokio::test]
    async fn should_succeed_when_no_subscribers() {
        let bus = InProcessEventBus::new(16);
        let result = bus.publish(heater_turned_on()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn should_not_deliver_events_published_before_subscription() {
        let bus = InProcessEventBus::new(16);

        bus.publish(heater_turned_on()).await.unwrap();

        let mut rx = bus.subscribe();

        let later = AutoffEvent::TargetChanged(StateChange {
            target: TargetId::parse("light.desk_lamp").unwrap(),
            old: Some(TargetState::On),
            new: Some(TargetState::Off),
            at: now(),
        });
        bus.publish(later).await.unwrap();

        let received = rx.recv().await.unwrap();
        let AutoffEvent::TargetChanged(change) = received else {
            panic!("expected a target change");
        };
        assert_eq!(change.target.as_str(), "light.desk_lamp");
    }
}
