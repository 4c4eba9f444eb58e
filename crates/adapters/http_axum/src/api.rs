//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod targets;
#[allow(clippy::missing_errors_doc)]
pub mod timers;

use axum::Router;
use axum::routing::{get, post};

use autoff_app::ports::{EventPublisher, SnapshotStore, StateSource, Switchboard, TimerScheduler};

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<S, T, P, B, V>() -> Router<AppState<S, T, P, B, V>>
where
    S: TimerScheduler + Send + Sync + 'static,
    T: StateSource + Send + Sync + 'static,
    P: SnapshotStore + Send + Sync + 'static,
    B: EventPublisher + Send + Sync + 'static,
    V: Switchboard + Send + Sync + 'static,
{
    Router::new()
        // Timers
        .route("/timers", get(timers::list::<S, T, P, B, V>))
        .route("/timers/start", post(timers::start::<S, T, P, B, V>))
        .route("/timers/restart", post(timers::restart::<S, T, P, B, V>))
        .route("/timers/cancel", post(timers::cancel::<S, T, P, B, V>))
        .route("/timers/{target}", get(timers::get_one::<S, T, P, B, V>))
        // Targets
        .route("/targets", get(targets::list::<S, T, P, B, V>))
        .route(
            "/targets/{target}/turn_on",
            post(targets::turn_on::<S, T, P, B, V>),
        )
        .route(
            "/targets/{target}/turn_off",
            post(targets::turn_off::<S, T, P, B, V>),
        )
}
