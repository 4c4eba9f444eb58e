//! # autoff-adapter-scheduler-tokio
//!
//! Scheduler adapter backed by the tokio runtime. Every schedule spawns a
//! task that sleeps until the due instant (or ticks an interval) and then
//! invokes the callback; cancelling aborts the task.
//!
//! ## Dependency rule
//!
//! Depends on `autoff-app` (port traits) and `autoff-domain` only.

use std::time::Duration;

use autoff_app::ports::{ScheduleCallback, TimerScheduler};
use autoff_domain::time::{self, Timestamp};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Handle for one spawned schedule.
///
/// Dropping the handle leaves the task running detached;
/// [`TimerScheduler::cancel`] aborts it.
pub struct TaskHandle(JoinHandle<()>);

/// [`TimerScheduler`] backed by spawned tokio tasks and the UTC wall
/// clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioScheduler;

impl TokioScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl TimerScheduler for TokioScheduler {
    type Handle = TaskHandle;

    fn now(&self) -> Timestamp {
        time::now()
    }

    fn schedule_at(&self, at: Timestamp, callback: ScheduleCallback) -> Self::Handle {
        let delay = delay_until(at);
        TaskHandle(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            callback().await;
        }))
    }

    fn schedule_every(&self, period: Duration, callback: ScheduleCallback) -> Self::Handle {
        TaskHandle(tokio::spawn(async move {
            let first = tokio::time::Instant::now() + period;
            let mut interval = tokio::time::interval_at(first, period);
            // A stalled runtime realigns with a single tick, not a burst.
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                callback().await;
            }
        }))
    }

    fn cancel(&self, handle: Self::Handle) {
        handle.0.abort();
    }
}

/// Wall-clock distance to `at`, zero when the instant is already behind
/// us.
fn delay_until(at: Timestamp) -> Duration {
    (at - time::now()).to_std().unwrap_or(Duration::ZERO)
}

#[cfg(test)]
mod tests {
    use autoff_domain::time::plus_seconds;
    use tokio::sync::mpsc;
    use tokio::time::advance;

    use super::*;

    // All tests run with start_paused so `advance` controls the tokio
    // clock. The due instants are computed on the wall clock, so the
    // delays handed to the runtime are at most the advanced amount.

    fn ping(tx: &mpsc::UnboundedSender<()>) -> ScheduleCallback {
        let tx = tx.clone();
        Box::new(move || {
            let tx = tx.clone();
            Box::pin(async move {
                let _ = tx.send(());
            })
        })
    }

    #[tokio::test(start_paused = true)]
    async fn should_fire_once_at_the_instant() {
        let scheduler = TokioScheduler::new();
        let (tx, mut rx) = mpsc::unbounded_channel();

        let _handle = scheduler.schedule_at(plus_seconds(scheduler.now(), 5), ping(&tx));

        advance(Duration::from_secs(5)).await;
        assert_eq!(rx.recv().await, Some(()));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn should_fire_promptly_when_instant_already_passed() {
        let scheduler = TokioScheduler::new();
        let (tx, mut rx) = mpsc::unbounded_channel();

        let at = scheduler.now() - chrono::TimeDelta::seconds(30);
        let _handle = scheduler.schedule_at(at, ping(&tx));

        assert_eq!(rx.recv().await, Some(()));
    }

    #[tokio::test(start_paused = true)]
    async fn should_not_fire_after_cancel() {
        let scheduler = TokioScheduler::new();
        let (tx, mut rx) = mpsc::unbounded_channel();

        let handle = scheduler.schedule_at(plus_seconds(scheduler.now(), 5), ping(&tx));
        drop(tx);
        scheduler.cancel(handle);

        // The aborted task drops the callback and with it the only
        // remaining sender.
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn should_keep_running_when_handle_is_dropped() {
        let scheduler = TokioScheduler::new();
        let (tx, mut rx) = mpsc::unbounded_channel();

        let handle = scheduler.schedule_at(plus_seconds(scheduler.now(), 5), ping(&tx));
        drop(handle);

        advance(Duration::from_secs(5)).await;
        assert_eq!(rx.recv().await, Some(()));
    }

    #[tokio::test(start_paused = true)]
    async fn should_tick_once_per_period() {
        let scheduler = TokioScheduler::new();
        let (tx, mut rx) = mpsc::unbounded_channel();

        let _handle = scheduler.schedule_every(Duration::from_secs(1), ping(&tx));

        advance(Duration::from_secs(1)).await;
        assert_eq!(rx.recv().await, Some(()));
        advance(Duration::from_secs(1)).await;
        assert_eq!(rx.recv().await, Some(()));
    }

    #[tokio::test(start_paused = true)]
    async fn should_wait_one_full_period_before_first_tick() {
        let scheduler = TokioScheduler::new();
        let (tx, mut rx) = mpsc::unbounded_channel();

        let _handle = scheduler.schedule_every(Duration::from_secs(2), ping(&tx));

        advance(Duration::from_secs(1)).await;
        assert!(rx.try_recv().is_err());
        advance(Duration::from_secs(1)).await;
        assert_eq!(rx.recv().await, Some(()));
    }

    #[tokio::test(start_paused = true)]
    async fn should_stop_ticking_after_cancel() {
        let scheduler = TokioScheduler::new();
        let (tx, mut rx) = mpsc::unbounded_channel();

        let handle = scheduler.schedule_every(Duration::from_secs(1), ping(&tx));

        advance(Duration::from_secs(1)).await;
        assert_eq!(rx.recv().await, Some(()));

        scheduler.cancel(handle);
        drop(tx);
        assert_eq!(rx.recv().await, None);
    }
}
