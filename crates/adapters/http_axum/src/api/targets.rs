//! JSON REST handlers for the targets behind the timers.

use axum::Json;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use autoff_app::ports::{EventPublisher, SnapshotStore, StateSource, Switchboard, TimerScheduler};
use autoff_domain::error::AutoffError;
use autoff_domain::state::TargetState;
use autoff_domain::target::TargetId;

use crate::error::ApiError;
use crate::state::AppState;

/// One target with its current state.
#[derive(Serialize)]
pub struct TargetView {
    pub target: TargetId,
    pub state: TargetState,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<TargetView>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the turn-on and turn-off endpoints.
pub enum CommandResponse {
    Ok(Json<TargetView>),
}

impl IntoResponse for CommandResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

async fn flip<V: Switchboard>(
    board: &V,
    raw: &str,
    to: TargetState,
) -> Result<CommandResponse, ApiError> {
    let target = TargetId::parse(raw).map_err(AutoffError::from)?;
    board.set_target_state(&target, to).await?;
    Ok(CommandResponse::Ok(Json(TargetView { target, state: to })))
}

/// `GET /api/targets`
pub async fn list<S, T, P, B, V>(
    State(state): State<AppState<S, T, P, B, V>>,
) -> Result<ListResponse, ApiError>
where
    S: TimerScheduler + Send + Sync + 'static,
    T: StateSource + Send + Sync + 'static,
    P: SnapshotStore + Send + Sync + 'static,
    B: EventPublisher + Send + Sync + 'static,
    V: Switchboard + Send + Sync + 'static,
{
    let views = state
        .board
        .target_states()
        .await
        .into_iter()
        .map(|(target, target_state)| TargetView {
            target,
            state: target_state,
        })
        .collect();
    Ok(ListResponse::Ok(Json(views)))
}

/// `POST /api/targets/{target}/turn_on`
pub async fn turn_on<S, T, P, B, V>(
    State(state): State<AppState<S, T, P, B, V>>,
    Path(target): Path<String>,
) -> Result<CommandResponse, ApiError>
where
    S: TimerScheduler + Send + Sync + 'static,
    T: StateSource + Send + Sync + 'static,
    P: SnapshotStore + Send + Sync + 'static,
    B: EventPublisher + Send + Sync + 'static,
    V: Switchboard + Send + Sync + 'static,
{
    flip(state.board.as_ref(), &target, TargetState::On).await
}

/// `POST /api/targets/{target}/turn_off`
pub async fn turn_off<S, T, P, B, V>(
    State(state): State<AppState<S, T, P, B, V>>,
    Path(target): Path<String>,
) -> Result<CommandResponse, ApiError>
where
    S: TimerScheduler + Send + Sync + 'static,
    T: StateSource + Send + Sync + 'static,
    P: SnapshotStore + Send + Sync + 'static,
    B: EventPublisher + Send + Sync + 'static,
    V: Switchboard + Send + Sync + 'static,
{
    flip(state.board.as_ref(), &target, TargetState::Off).await
}
