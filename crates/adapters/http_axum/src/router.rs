//! Axum router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use autoff_app::ports::{EventPublisher, SnapshotStore, StateSource, Switchboard, TimerScheduler};

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Serves the JSON API under `/api`. Includes a [`TraceLayer`] that logs
/// each HTTP request/response at the `DEBUG` level using the `tracing`
/// ecosystem.
pub fn build<S, T, P, B, V>(state: AppState<S, T, P, B, V>) -> Router
where
    S: TimerScheduler + Send + Sync + 'static,
    T: StateSource + Send + Sync + 'static,
    P: SnapshotStore + Send + Sync + 'static,
    B: EventPublisher + Send + Sync + 'static,
    V: Switchboard + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", crate::api::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
