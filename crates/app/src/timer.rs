//! The per-target countdown machine.
//!
//! ## Responsibilities
//! - Arm and re-arm a deadline (`start`, `restart`), disarm it (`cancel`)
//! - Turn the target off when the deadline fires and the target is still on
//! - Re-publish remaining seconds once per second while armed
//! - Reconcile with observed target state changes
//! - Restore an armed deadline across restarts
//!
//! ## Concurrency
//! All mutable state lives in one `tokio::sync::Mutex<TimerCore>`. Schedule
//! handles are only revoked while holding that lock, and every schedule
//! callback takes the lock before touching state. An in-flight callback can
//! therefore only be revoked before it acquires the lock, never in the
//! middle of a transition.

use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::sync::Mutex;

use autoff_domain::event::{AutoffEvent, TimerUpdate};
use autoff_domain::reconcile::{ReconcileAction, decide};
use autoff_domain::snapshot::TimerSnapshot;
use autoff_domain::state::{StateChange, TargetState};
use autoff_domain::time::{Timestamp, plus_seconds};
use autoff_domain::timer::TimerConfig;

use crate::ports::{
    Actuator, EventPublisher, ScheduleCallback, SnapshotStore, StateSource, TimerScheduler,
};

/// Period of the remaining-seconds re-publish while armed.
const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Mutable state of one timer.
struct TimerCore<H> {
    deadline: Option<Timestamp>,
    expire: Option<H>,
    tick: Option<H>,
}

impl<H> Default for TimerCore<H> {
    fn default() -> Self {
        Self {
            deadline: None,
            expire: None,
            tick: None,
        }
    }
}

/// Countdown machine for a single target.
///
/// Created through [`AutoOffTimer::new`], which returns an [`Arc`] because
/// the schedule callbacks keep a [`Weak`] reference back to the timer.
/// Dropping the last `Arc` makes pending callbacks no-ops.
pub struct AutoOffTimer<S, T, P, B>
where
    S: TimerScheduler,
{
    config: TimerConfig,
    scheduler: Arc<S>,
    states: Arc<T>,
    store: Arc<P>,
    bus: Arc<B>,
    actuator: Option<Arc<dyn Actuator>>,
    weak: Weak<Self>,
    core: Mutex<TimerCore<S::Handle>>,
}

impl<S, T, P, B> AutoOffTimer<S, T, P, B>
where
    S: TimerScheduler + Send + Sync + 'static,
    T: StateSource + Send + Sync + 'static,
    P: SnapshotStore + Send + Sync + 'static,
    B: EventPublisher + Send + Sync + 'static,
{
    /// Create an idle timer. Call [`restore`](Self::restore) afterwards to
    /// pick up a persisted deadline.
    pub fn new(
        config: TimerConfig,
        scheduler: Arc<S>,
        states: Arc<T>,
        store: Arc<P>,
        bus: Arc<B>,
        actuator: Option<Arc<dyn Actuator>>,
    ) -> Arc<Self> {
        Arc::new_cyclic(|weak| Self {
            config,
            scheduler,
            states,
            store,
            bus,
            actuator,
            weak: weak.clone(),
            core: Mutex::new(TimerCore::default()),
        })
    }

    /// This timer's configuration.
    #[must_use]
    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    /// Current externally visible state.
    pub async fn snapshot(&self) -> TimerSnapshot {
        let core = self.core.lock().await;
        TimerSnapshot::of(&self.config, core.deadline)
    }

    /// Arm the countdown unless one is already running.
    ///
    /// No-op when the timer is disabled or already armed. `duration`
    /// overrides the configured duration for this run only.
    pub async fn start(&self, duration: Option<u32>) {
        if !self.config.enabled {
            return;
        }
        let mut core = self.core.lock().await;
        if core.deadline.is_some() {
            return;
        }
        self.arm(&mut core, duration).await;
    }

    /// Arm the countdown, replacing any running one.
    ///
    /// No-op when the timer is disabled.
    pub async fn restart(&self, duration: Option<u32>) {
        if !self.config.enabled {
            return;
        }
        let mut core = self.core.lock().await;
        self.arm(&mut core, duration).await;
    }

    /// Disarm the countdown without turning anything off.
    ///
    /// Publishes the idle state even when the timer was not armed.
    pub async fn cancel(&self) {
        let mut core = self.core.lock().await;
        self.revoke_handles(&mut core);
        core.deadline = None;
        self.persist_and_publish(&core).await;
    }

    /// React to an observed state change of the target.
    pub async fn on_target_event(&self, change: &StateChange) {
        match decide(
            self.config.enabled,
            self.config.restart_mode,
            change.old,
            change.new,
        ) {
            ReconcileAction::Ignore => {}
            ReconcileAction::Cancel => self.cancel().await,
            ReconcileAction::Restart => self.restart(None).await,
        }
    }

    /// Re-arm from a persisted snapshot.
    ///
    /// The saved deadline is honored only when the timer is enabled, the
    /// deadline lies in the future, and the target is currently on. In
    /// every other case the timer comes up idle and the stale deadline is
    /// overwritten in the store.
    pub async fn restore(&self) {
        let saved = match self.store.load(&self.config.target).await {
            Ok(snapshot) => snapshot.and_then(|snapshot| snapshot.finishes_at),
            Err(err) => {
                tracing::warn!(%err, target = %self.config.target, "failed to load persisted snapshot");
                None
            }
        };

        let mut deadline = None;
        if self.config.enabled {
            if let Some(at) = saved {
                if at > self.scheduler.now() && self.target_is_on().await {
                    deadline = Some(at);
                }
            }
        }

        let mut core = self.core.lock().await;
        core.deadline = deadline;
        if let Some(at) = deadline {
            self.schedule(&mut core, at);
        }
        self.persist_and_publish(&core).await;
    }

    /// Revoke pending callbacks without publishing or persisting.
    ///
    /// Called when the timer is taken out of service; the persisted
    /// snapshot is deliberately left behind for the next restore.
    pub async fn detach(&self) {
        let mut core = self.core.lock().await;
        self.revoke_handles(&mut core);
        core.deadline = None;
    }

    async fn arm(&self, core: &mut TimerCore<S::Handle>, duration: Option<u32>) {
        self.revoke_handles(core);
        let seconds = duration.unwrap_or(self.config.duration_seconds);
        let deadline = plus_seconds(self.scheduler.now(), seconds);
        core.deadline = Some(deadline);
        self.schedule(core, deadline);
        self.persist_and_publish(core).await;
    }

    fn schedule(&self, core: &mut TimerCore<S::Handle>, deadline: Timestamp) {
        core.expire = Some(self.scheduler.schedule_at(deadline, self.expire_callback()));
        core.tick = Some(self.scheduler.schedule_every(TICK_PERIOD, self.tick_callback()));
    }

    fn revoke_handles(&self, core: &mut TimerCore<S::Handle>) {
        if let Some(handle) = core.expire.take() {
            self.scheduler.cancel(handle);
        }
        if let Some(handle) = core.tick.take() {
            self.scheduler.cancel(handle);
        }
    }

    async fn on_expired(&self) {
        let mut core = self.core.lock().await;
        // Our own handle has fired; drop it without revoking ourselves.
        core.expire = None;
        if let Some(handle) = core.tick.take() {
            self.scheduler.cancel(handle);
        }

        if self.target_is_on().await {
            self.dispatch_turn_off().await;
        }

        core.deadline = None;
        self.persist_and_publish(&core).await;
    }

    async fn on_tick(&self) {
        let mut core = self.core.lock().await;
        let now = self.scheduler.now();
        let finished = core.deadline.is_none_or(|deadline| deadline <= now);
        let snapshot = TimerSnapshot::of(&self.config, core.deadline);
        // Publish before revoking our own tick: the cancel may abort this
        // very task at its next await point.
        self.publish_update(&snapshot).await;
        if finished {
            if let Some(handle) = core.tick.take() {
                self.scheduler.cancel(handle);
            }
        }
    }

    async fn target_is_on(&self) -> bool {
        match self.states.current_state(&self.config.target).await {
            Ok(state) => state.is_some_and(TargetState::is_on),
            Err(err) => {
                tracing::warn!(%err, target = %self.config.target, "failed to read target state");
                false
            }
        }
    }

    async fn dispatch_turn_off(&self) {
        let Some(actuator) = &self.actuator else {
            tracing::warn!(target = %self.config.target, "no actuator for target family");
            return;
        };
        if let Err(err) = actuator.turn_off(&self.config.target).await {
            tracing::warn!(%err, target = %self.config.target, "turn-off dispatch failed");
        }
    }

    async fn persist_and_publish(&self, core: &TimerCore<S::Handle>) {
        let snapshot = TimerSnapshot::of(&self.config, core.deadline);
        if let Err(err) = self.store.save(&snapshot).await {
            tracing::warn!(%err, target = %self.config.target, "failed to persist timer snapshot");
        }
        self.publish_update(&snapshot).await;
    }

    async fn publish_update(&self, snapshot: &TimerSnapshot) {
        let at = self.scheduler.now();
        let update = TimerUpdate {
            remaining_seconds: snapshot.remaining_seconds(at),
            snapshot: snapshot.clone(),
            at,
        };
        if let Err(err) = self.bus.publish(AutoffEvent::TimerUpdated(update)).await {
            tracing::warn!(%err, target = %self.config.target, "failed to publish timer update");
        }
    }

    fn expire_callback(&self) -> ScheduleCallback {
        let weak = self.weak.clone();
        Box::new(move || {
            let weak = weak.clone();
            Box::pin(async move {
                if let Some(timer) = weak.upgrade() {
                    timer.on_expired().await;
                }
            })
        })
    }

    fn tick_callback(&self) -> ScheduleCallback {
        let weak = self.weak.clone();
        Box::new(move || {
            let weak = weak.clone();
            Box::pin(async move {
                if let Some(timer) = weak.upgrade() {
                    timer.on_tick().await;
                }
            })
        })
    }
}
