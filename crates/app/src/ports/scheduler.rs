//! Scheduler port — point-in-time and interval callbacks.
//!
//! The timers never sleep or spawn themselves. They hand callbacks to an
//! implementation of [`TimerScheduler`] and keep the returned handles so
//! a pending callback can be revoked. This keeps the countdown logic
//! independent of any particular runtime and lets tests drive time by
//! hand.

use std::pin::Pin;
use std::time::Duration;

use autoff_domain::time::Timestamp;

/// Boxed future returned by schedule callbacks.
pub type BoxFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// A callback handed to the scheduler. Invoked once per due instant for
/// [`TimerScheduler::schedule_at`], once per period for
/// [`TimerScheduler::schedule_every`].
pub type ScheduleCallback = Box<dyn Fn() -> BoxFuture + Send + Sync + 'static>;

/// Runs callbacks at a UTC instant or on a fixed interval.
///
/// Implementations own the clock: [`now`](Self::now) is the single time
/// base the timers compare deadlines against.
///
/// Dropping a [`Handle`](Self::Handle) without calling
/// [`cancel`](Self::cancel) leaves the schedule running detached. Only
/// `cancel` revokes a pending callback, and revoking an already-fired or
/// already-cancelled handle is a no-op.
pub trait TimerScheduler {
    /// Opaque handle identifying one scheduled callback.
    type Handle: Send + Sync;

    /// Current time on the scheduler's clock.
    fn now(&self) -> Timestamp;

    /// Run `callback` once at instant `at`. An instant in the past fires
    /// as soon as possible.
    fn schedule_at(&self, at: Timestamp, callback: ScheduleCallback) -> Self::Handle;

    /// Run `callback` every `period`, first invocation one period from
    /// now.
    fn schedule_every(&self, period: Duration, callback: ScheduleCallback) -> Self::Handle;

    /// Revoke a pending callback.
    fn cancel(&self, handle: Self::Handle);
}
