//! Registry of live timers, one per target.
//!
//! The registry owns the shared adapter handles and hands each attached
//! timer its dependencies, resolving the actuator for the target's family
//! once at attach time. Service calls and observed state changes are
//! routed through here to the right timer.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tokio::sync::Mutex;

use autoff_domain::error::{AutoffError, NotFoundError, ValidationError};
use autoff_domain::snapshot::TimerSnapshot;
use autoff_domain::state::StateChange;
use autoff_domain::target::{DEFAULT_ELIGIBLE_FAMILIES, TargetId};
use autoff_domain::time::Timestamp;
use autoff_domain::timer::TimerConfig;

use crate::ports::{Actuator, EventPublisher, SnapshotStore, StateSource, TimerScheduler};
use crate::timer::AutoOffTimer;

/// Holds every live [`AutoOffTimer`] keyed by target.
pub struct TimerRegistry<S, T, P, B>
where
    S: TimerScheduler,
{
    scheduler: Arc<S>,
    states: Arc<T>,
    store: Arc<P>,
    bus: Arc<B>,
    actuators: HashMap<String, Arc<dyn Actuator>>,
    families: Vec<String>,
    timers: Mutex<BTreeMap<TargetId, Arc<AutoOffTimer<S, T, P, B>>>>,
}

impl<S, T, P, B> TimerRegistry<S, T, P, B>
where
    S: TimerScheduler + Send + Sync + 'static,
    T: StateSource + Send + Sync + 'static,
    P: SnapshotStore + Send + Sync + 'static,
    B: EventPublisher + Send + Sync + 'static,
{
    /// Create an empty registry accepting the default eligible families.
    pub fn new(scheduler: Arc<S>, states: Arc<T>, store: Arc<P>, bus: Arc<B>) -> Self {
        Self {
            scheduler,
            states,
            store,
            bus,
            actuators: HashMap::new(),
            families: DEFAULT_ELIGIBLE_FAMILIES
                .iter()
                .map(ToString::to_string)
                .collect(),
            timers: Mutex::new(BTreeMap::new()),
        }
    }

    /// Replace the set of families that may carry a timer.
    #[must_use]
    pub fn with_families(mut self, families: Vec<String>) -> Self {
        self.families = families;
        self
    }

    /// Register an actuator, keyed by the family it serves.
    pub fn register_actuator(&mut self, actuator: Arc<dyn Actuator>) {
        self.actuators
            .insert(actuator.family().to_string(), actuator);
    }

    /// Time base shared with every timer.
    pub fn now(&self) -> Timestamp {
        self.scheduler.now()
    }

    /// Create a timer for `config`, restore its persisted deadline, and
    /// start routing events to it.
    ///
    /// An existing timer for the same target is detached and replaced.
    ///
    /// # Errors
    ///
    /// Returns [`AutoffError::Validation`] when the config is invalid or
    /// the target's family is not eligible.
    pub async fn attach(
        &self,
        config: TimerConfig,
    ) -> Result<Arc<AutoOffTimer<S, T, P, B>>, AutoffError> {
        config.validate()?;
        if !self.families.iter().any(|family| family == config.target.family()) {
            return Err(ValidationError::IneligibleFamily(config.target.family().to_string()).into());
        }

        let actuator = self.actuators.get(config.target.family()).cloned();
        if actuator.is_none() {
            tracing::warn!(
                target = %config.target,
                "no actuator registered for family, expiry will not turn the target off"
            );
        }

        let target = config.target.clone();
        let timer = AutoOffTimer::new(
            config,
            Arc::clone(&self.scheduler),
            Arc::clone(&self.states),
            Arc::clone(&self.store),
            Arc::clone(&self.bus),
            actuator,
        );

        let replaced = {
            let mut timers = self.timers.lock().await;
            timers.insert(target, Arc::clone(&timer))
        };
        if let Some(previous) = replaced {
            previous.detach().await;
        }

        timer.restore().await;
        Ok(timer)
    }

    /// Stop routing events to `target` and revoke its pending callbacks.
    ///
    /// The persisted snapshot stays behind so a later attach can restore
    /// the deadline.
    ///
    /// # Errors
    ///
    /// Returns [`AutoffError::NotFound`] when no timer exists for `target`.
    pub async fn detach(&self, target: &TargetId) -> Result<(), AutoffError> {
        let timer = {
            let mut timers = self.timers.lock().await;
            timers.remove(target)
        };
        let timer = timer.ok_or_else(|| NotFoundError {
            kind: "timer",
            id: target.to_string(),
        })?;
        timer.detach().await;
        Ok(())
    }

    /// Detach every timer. Used on shutdown.
    pub async fn detach_all(&self) {
        let timers = {
            let mut timers = self.timers.lock().await;
            std::mem::take(&mut *timers)
        };
        for timer in timers.values() {
            timer.detach().await;
        }
    }

    /// The timer attached for `target`, if any.
    pub async fn get(&self, target: &TargetId) -> Option<Arc<AutoOffTimer<S, T, P, B>>> {
        self.timers.lock().await.get(target).cloned()
    }

    /// Snapshots of every live timer, ordered by target id.
    pub async fn snapshots(&self) -> Vec<TimerSnapshot> {
        let timers: Vec<_> = self.timers.lock().await.values().cloned().collect();
        let mut snapshots = Vec::with_capacity(timers.len());
        for timer in timers {
            snapshots.push(timer.snapshot().await);
        }
        snapshots
    }

    /// Route an observed state change to the timer watching that target.
    ///
    /// Changes for targets without a timer are ignored.
    pub async fn dispatch_change(&self, change: &StateChange) {
        let timer = { self.timers.lock().await.get(&change.target).cloned() };
        if let Some(timer) = timer {
            timer.on_target_event(change).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    use async_trait::async_trait;

    use autoff_domain::event::AutoffEvent;
    use autoff_domain::state::TargetState;
    use autoff_domain::time::plus_seconds;

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

    struct CountingActuator {
        calls: StdMutex<usize>,
    }

    #[async_trait]
    impl Actuator for CountingActuator {
        fn family(&self) -> &str {
            "switch"
        }

        async fn turn_off(&self, _target: &TargetId) -> Result<(), AutoffError> {
            *self.calls.lock().unwrap() += 1;
            Ok(())
        }
    }

    // ── Helpers ────────────────────────────────────────────────────

    fn start_time() -> Timestamp {
        "2026-01-10T08:00:00Z".parse().unwrap()
    }

    fn registry() -> TimerRegistry<NoopScheduler, OnSource, NullStore, NullBus> {
        let mut registry = TimerRegistry::new(
            Arc::new(NoopScheduler { start: start_time() }),
            Arc::new(OnSource),
            Arc::new(NullStore),
            Arc::new(NullBus),
        );
        registry.register_actuator(Arc::new(CountingActuator {
            calls: StdMutex::new(0),
        }));
        registry
    }

    fn heater_config() -> TimerConfig {
        TimerConfig::builder()
            .target(TargetId::parse("switch.heater").unwrap())
            .duration_seconds(60)
            .build()
            .unwrap()
    }

    // ── Tests ──────────────────────────────────────────────────────

    #[tokio::test]
    async fn should_attach_and_expose_idle_snapshot() {
        let registry = registry();
        registry.attach(heater_config()).await.unwrap();

        let snapshots = registry.snapshots().await;
        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0].target.as_str(), "switch.heater");
        assert!(snapshots[0].finishes_at.is_none());
    }

    #[tokio::test]
    async fn should_reject_ineligible_family() {
        let registry = registry();
        let config = TimerConfig::builder()
            .target(TargetId::parse("sensor.temperature").unwrap())
            .build()
            .unwrap();

        let result = registry.attach(config).await;
        assert!(matches!(
            result,
            Err(AutoffError::Validation(ValidationError::IneligibleFamily(_)))
        ));
    }

    #[tokio::test]
    async fn should_accept_custom_family_set() {
        let registry = registry().with_families(vec!["valve".to_string()]);
        let config = TimerConfig::builder()
            .target(TargetId::parse("valve.garden").unwrap())
            .build()
            .unwrap();

        assert!(registry.attach(config).await.is_ok());
    }

    #[tokio::test]
    async fn should_replace_timer_on_reattach() {
        let registry = registry();
        registry.attach(heater_config()).await.unwrap();

        let replacement = TimerConfig::builder()
            .target(TargetId::parse("switch.heater").unwrap())
            .duration_seconds(600)
            .build()
            .unwrap();
        registry.attach(replacement).await.unwrap();

        let snapshots = registry.snapshots().await;
        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0].duration_seconds, 600);
    }

    #[tokio::test]
    async fn should_return_not_found_when_detaching_unknown_target() {
        let registry = registry();
        let target = TargetId::parse("switch.heater").unwrap();

        let result = registry.detach(&target).await;
        assert!(matches!(result, Err(AutoffError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_detach_all_timers() {
        let registry = registry();
        registry.attach(heater_config()).await.unwrap();

        registry.detach_all().await;
        assert!(registry.snapshots().await.is_empty());
    }

    #[tokio::test]
    async fn should_route_change_to_matching_timer() {
        let registry = registry();
        let timer = registry.attach(heater_config()).await.unwrap();

        registry
            .dispatch_change(&StateChange {
                target: TargetId::parse("switch.heater").unwrap(),
                old: Some(TargetState::Off),
                new: Some(TargetState::On),
                at: start_time(),
            })
            .await;

        assert_eq!(
            timer.snapshot().await.finishes_at,
            Some(plus_seconds(start_time(), 60))
        );
    }

    #[tokio::test]
    async fn should_ignore_change_for_unknown_target() {
        let registry = registry();
        registry.attach(heater_config()).await.unwrap();

        registry
            .dispatch_change(&StateChange {
                target: TargetId::parse("switch.other").unwrap(),
                old: None,
                new: Some(TargetState::On),
                at: start_time(),
            })
            .await;

        let snapshots = registry.snapshots().await;
        assert!(snapshots[0].finishes_at.is_none());
    }

    #[tokio::test]
    async fn should_list_snapshots_ordered_by_target() {
        let registry = registry();
        for name in ["switch.zebra", "switch.alpha", "switch.middle"] {
            let config = TimerConfig::builder()
                .target(TargetId::parse(name).unwrap())
                .build()
                .unwrap();
            registry.attach(config).await.unwrap();
        }

        let targets: Vec<String> = registry
            .snapshots()
            .await
            .into_iter()
            .map(|snapshot| snapshot.target.to_string())
            .collect();
        assert_eq!(targets, vec!["switch.alpha", "switch.middle", "switch.zebra"]);
    }
}
