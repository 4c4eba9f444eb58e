//! Shared application state for axum handlers.

use std::sync::Arc;

use autoff_app::ports::{EventPublisher, SnapshotStore, StateSource, Switchboard, TimerScheduler};
use autoff_app::registry::TimerRegistry;
use autoff_app::router::TimerRouter;

/// Application state shared across all axum handlers.
///
/// Generic over the adapter types behind the registry plus the
/// switchboard to avoid dynamic dispatch. `Clone` is implemented
/// manually so the underlying types themselves do not need to be
/// `Clone` — only the `Arc` wrappers are cloned.
pub struct AppState<S, T, P, B, V>
where
    S: TimerScheduler,
{
    /// Live timers keyed by target.
    pub registry: Arc<TimerRegistry<S, T, P, B>>,
    /// Batch start/restart/cancel operations.
    pub timers: Arc<TimerRouter<S, T, P, B>>,
    /// Device integration behind the targets endpoints.
    pub board: Arc<V>,
}

impl<S, T, P, B, V> Clone for AppState<S, T, P, B, V>
where
    S: TimerScheduler,
{
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            timers: Arc::clone(&self.timers),
            board: Arc::clone(&self.board),
        }
    }
}

impl<S, T, P, B, V> AppState<S, T, P, B, V>
where
    S: TimerScheduler + Send + Sync + 'static,
    T: StateSource + Send + Sync + 'static,
    P: SnapshotStore + Send + Sync + 'static,
    B: EventPublisher + Send + Sync + 'static,
    V: Switchboard + Send + Sync + 'static,
{
    /// Create the handler state from pre-wrapped `Arc` handles.
    ///
    /// The registry arrives already wrapped because it is shared with
    /// the event watcher running outside the HTTP stack.
    pub fn new(registry: Arc<TimerRegistry<S, T, P, B>>, board: Arc<V>) -> Self {
        Self {
            timers: Arc::new(TimerRouter::new(Arc::clone(&registry))),
            registry,
            board,
        }
    }
}
