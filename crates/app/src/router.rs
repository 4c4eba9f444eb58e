//! Service router — batch start/restart/cancel over the registry.
//!
//! Requests carry a list of target ids and, for start/restart, an
//! optional duration override. The whole request is validated before
//! anything is dispatched; targets without an attached timer are then
//! skipped silently. The returned count says how many timers were
//! actually reached.

use std::sync::Arc;

use autoff_domain::error::{AutoffError, ValidationError};
use autoff_domain::target::TargetId;
use autoff_domain::timer::validate_duration;

use crate::ports::{EventPublisher, SnapshotStore, StateSource, TimerScheduler};
use crate::registry::TimerRegistry;

/// Maps external service calls onto the timers in a [`TimerRegistry`].
pub struct TimerRouter<S, T, P, B>
where
    S: TimerScheduler,
{
    registry: Arc<TimerRegistry<S, T, P, B>>,
}

impl<S, T, P, B> TimerRouter<S, T, P, B>
where
    S: TimerScheduler + Send + Sync + 'static,
    T: StateSource + Send + Sync + 'static,
    P: SnapshotStore + Send + Sync + 'static,
    B: EventPublisher + Send + Sync + 'static,
{
    pub fn new(registry: Arc<TimerRegistry<S, T, P, B>>) -> Self {
        Self { registry }
    }

    /// Start the countdown on every listed target that has a timer.
    ///
    /// # Errors
    ///
    /// Returns [`AutoffError::Validation`] when the target list is empty
    /// or the duration override is out of range. Nothing is dispatched in
    /// that case.
    #[tracing::instrument(skip(self, targets), fields(targets = targets.len()))]
    pub async fn start(
        &self,
        targets: &[TargetId],
        duration: Option<u32>,
    ) -> Result<usize, AutoffError> {
        Self::validate(targets, duration)?;
        let mut dispatched = 0;
        for target in targets {
            if let Some(timer) = self.registry.get(target).await {
                timer.start(duration).await;
                dispatched += 1;
            } else {
                tracing::debug!(%target, "no timer attached, skipping");
            }
        }
        Ok(dispatched)
    }

    /// Restart the countdown on every listed target that has a timer.
    ///
    /// # Errors
    ///
    /// Returns [`AutoffError::Validation`] when the target list is empty
    /// or the duration override is out of range. Nothing is dispatched in
    /// that case.
    #[tracing::instrument(skip(self, targets), fields(targets = targets.len()))]
    pub async fn restart(
        &self,
        targets: &[TargetId],
        duration: Option<u32>,
    ) -> Result<usize, AutoffError> {
        Self::validate(targets, duration)?;
        let mut dispatched = 0;
        for target in targets {
            if let Some(timer) = self.registry.get(target).await {
                timer.restart(duration).await;
                dispatched += 1;
            } else {
                tracing::debug!(%target, "no timer attached, skipping");
            }
        }
        Ok(dispatched)
    }

    /// Cancel the countdown on every listed target that has a timer.
    ///
    /// # Errors
    ///
    /// Returns [`AutoffError::Validation`] when the target list is empty.
    #[tracing::instrument(skip(self, targets), fields(targets = targets.len()))]
    pub async fn cancel(&self, targets: &[TargetId]) -> Result<usize, AutoffError> {
        Self::validate(targets, None)?;
        let mut dispatched = 0;
        for target in targets {
            if let Some(timer) = self.registry.get(target).await {
                timer.cancel().await;
                dispatched += 1;
            } else {
                tracing::debug!(%target, "no timer attached, skipping");
            }
        }
        Ok(dispatched)
    }

    fn validate(targets: &[TargetId], duration: Option<u32>) -> Result<(), ValidationError> {
        if targets.is_empty() {
            return Err(ValidationError::EmptyTargets);
        }
        if let Some(seconds) = duration {
            validate_duration(seconds)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use autoff_domain::error::AutoffError;
    use autoff_domain::event::AutoffEvent;
    use autoff_domain::snapshot::TimerSnapshot;
    use autoff_domain::state::TargetState;
    use autoff_domain::time::Timestamp;
    use autoff_domain::timer::TimerConfig;

    use crate::ports::ScheduleCallback;

    // ── Stubs ──────────────────────────────────────────────────────

    struct NoopScheduler {
        start: Timestamp,
    }

    impl TimerScheduler for NoopScheduler {
        type Handle = ();

        fn now(&self) -> Timestamp {
            self.start
        }

        fn schedule_at(&self, _at: Timestamp, _callback: ScheduleCallback) -> Self::Handle {}

        fn schedule_every(
            &self,
            _period: std::time::Duration,
            _callback: ScheduleCallback,
        ) -> Self::Handle {
        }

        fn cancel(&self, _handle: Self::Handle) {}
    }

    struct OnSource;

    impl StateSource for OnSource {
        async fn current_state(
            &self,
            _target: &TargetId,
        ) -> Result<Option<TargetState>, AutoffError> {
            Ok(Some(TargetState::On))
        }
    }

    struct NullStore;

    impl SnapshotStore for NullStore {
        async fn load(&self, _target: &TargetId) -> Result<Option<TimerSnapshot>, AutoffError> {
            Ok(None)
        }

        async fn save(&self, _snapshot: &TimerSnapshot) -> Result<(), AutoffError> {
            Ok(())
        }
    }

    struct NullBus;

    impl EventPublisher for NullBus {
        fn publish(&self, _event: AutoffEvent) -> impl Future<Output = Result<(), AutoffError>> + Send {
            async { Ok(()) }
        }
    }

    // ── Helpers ────────────────────────────────────────────────────

    type TestRegistry = TimerRegistry<NoopScheduler, OnSource, NullStore, NullBus>;

    fn start_time() -> Timestamp {
        "2026-01-10T08:00:00Z".parse().unwrap()
    }

    async fn registry_with(targets: &[&str]) -> Arc<TestRegistry> {
        let registry = Arc::new(TimerRegistry::new(
            Arc::new(NoopScheduler { start: start_time() }),
            Arc::new(OnSource),
            Arc::new(NullStore),
            Arc::new(NullBus),
        ));
        for target in targets {
            let config = TimerConfig::builder()
                .target(TargetId::parse(*target).unwrap())
                .duration_seconds(60)
                .build()
                .unwrap();
            registry.attach(config).await.unwrap();
        }
        registry
    }

    fn ids(targets: &[&str]) -> Vec<TargetId> {
        targets
            .iter()
            .map(|target| TargetId::parse(*target).unwrap())
            .collect()
    }

    // ── Tests ──────────────────────────────────────────────────────

    #[tokio::test]
    async fn should_start_every_known_target() {
        let registry = registry_with(&["switch.heater", "light.desk_lamp"]).await;
        let router = TimerRouter::new(Arc::clone(&registry));

        let dispatched = router
            .start(&ids(&["switch.heater", "light.desk_lamp"]), None)
            .await
            .unwrap();

        assert_eq!(dispatched, 2);
        for snapshot in registry.snapshots().await {
            assert!(snapshot.finishes_at.is_some());
        }
    }

    #[tokio::test]
    async fn should_skip_unknown_targets_silently() {
        let registry = registry_with(&["switch.heater"]).await;
        let router = TimerRouter::new(Arc::clone(&registry));

        let dispatched = router
            .start(&ids(&["switch.heater", "switch.ghost"]), None)
            .await
            .unwrap();

        assert_eq!(dispatched, 1);
    }

    #[tokio::test]
    async fn should_reject_empty_target_list() {
        let registry = registry_with(&[]).await;
        let router = TimerRouter::new(registry);

        let result = router.start(&[], None).await;
        assert!(matches!(
            result,
            Err(AutoffError::Validation(ValidationError::EmptyTargets))
        ));
    }

    #[tokio::test]
    async fn should_reject_out_of_range_duration_without_dispatching() {
        let registry = registry_with(&["switch.heater"]).await;
        let router = TimerRouter::new(Arc::clone(&registry));

        let result = router.start(&ids(&["switch.heater"]), Some(0)).await;
        assert!(matches!(
            result,
            Err(AutoffError::Validation(ValidationError::DurationOutOfRange(0)))
        ));

        let snapshots = registry.snapshots().await;
        assert!(snapshots[0].finishes_at.is_none());
    }

    #[tokio::test]
    async fn should_restart_with_duration_override() {
        let registry = registry_with(&["switch.heater"]).await;
        let router = TimerRouter::new(Arc::clone(&registry));

        let dispatched = router
            .restart(&ids(&["switch.heater"]), Some(30))
            .await
            .unwrap();

        assert_eq!(dispatched, 1);
        let snapshots = registry.snapshots().await;
        let remaining = snapshots[0].remaining_seconds(start_time());
        assert_eq!(remaining, 30);
    }

    #[tokio::test]
    async fn should_cancel_batch() {
        let registry = registry_with(&["switch.heater", "light.desk_lamp"]).await;
        let router = TimerRouter::new(Arc::clone(&registry));

        router
            .start(&ids(&["switch.heater", "light.desk_lamp"]), None)
            .await
            .unwrap();
        let dispatched = router
            .cancel(&ids(&["switch.heater", "light.desk_lamp"]))
            .await
            .unwrap();

        assert_eq!(dispatched, 2);
        for snapshot in registry.snapshots().await {
            assert!(snapshot.finishes_at.is_none());
        }
    }
}
