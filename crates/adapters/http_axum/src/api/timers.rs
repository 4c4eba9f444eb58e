//! JSON REST handlers for timers.

use axum::Json;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use autoff_app::ports::{EventPublisher, SnapshotStore, StateSource, Switchboard, TimerScheduler};
use autoff_domain::error::{AutoffError, NotFoundError};
use autoff_domain::snapshot::TimerSnapshot;
use autoff_domain::target::TargetId;
use autoff_domain::time::Timestamp;
use autoff_domain::timer::RestartMode;

use crate::error::ApiError;
use crate::state::AppState;

/// One timer as returned by the API.
#[derive(Serialize)]
pub struct TimerView {
    pub target: TargetId,
    pub enabled: bool,
    pub duration_seconds: u32,
    pub restart_mode: RestartMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finishes_at: Option<Timestamp>,
    pub remaining_seconds: u32,
}

impl TimerView {
    fn of(snapshot: TimerSnapshot, now: Timestamp) -> Self {
        let remaining_seconds = snapshot.remaining_seconds(now);
        Self {
            target: snapshot.target,
            enabled: snapshot.enabled,
            duration_seconds: snapshot.duration_seconds,
            restart_mode: snapshot.restart_mode,
            finishes_at: snapshot.finishes_at,
            remaining_seconds,
        }
    }
}

/// Request body for the start and restart operations.
#[derive(Deserialize)]
pub struct StartRequest {
    pub targets: Vec<String>,
    #[serde(default)]
    pub duration_seconds: Option<u32>,
}

/// Request body for the cancel operation.
#[derive(Deserialize)]
pub struct CancelRequest {
    pub targets: Vec<String>,
}

/// Count of timers a batch operation reached.
#[derive(Serialize)]
pub struct DispatchedBody {
    pub dispatched: usize,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<TimerView>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get endpoint.
pub enum GetResponse {
    Ok(Json<TimerView>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the batch endpoints.
pub enum BatchResponse {
    Ok(Json<DispatchedBody>),
}

impl IntoResponse for BatchResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

fn parse_targets(raw: &[String]) -> Result<Vec<TargetId>, AutoffError> {
    raw.iter()
        .map(|id| TargetId::parse(id.as_str()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(AutoffError::from)
}

/// `GET /api/timers`
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
    let now = state.registry.now();
    let views = state
        .registry
        .snapshots()
        .await
        .into_iter()
        .map(|snapshot| TimerView::of(snapshot, now))
        .collect();
    Ok(ListResponse::Ok(Json(views)))
}

/// `GET /api/timers/{target}`
pub async fn get_one<S, T, P, B, V>(
    State(state): State<AppState<S, T, P, B, V>>,
    Path(target): Path<String>,
) -> Result<GetResponse, ApiError>
where
    S: TimerScheduler + Send + Sync + 'static,
    T: StateSource + Send + Sync + 'static,
    P: SnapshotStore + Send + Sync + 'static,
    B: EventPublisher + Send + Sync + 'static,
    V: Switchboard + Send + Sync + 'static,
{
    let target = TargetId::parse(target).map_err(AutoffError::from)?;
    let timer = state.registry.get(&target).await.ok_or_else(|| {
        AutoffError::from(NotFoundError {
            kind: "timer",
            id: target.to_string(),
        })
    })?;
    let view = TimerView::of(timer.snapshot().await, state.registry.now());
    Ok(GetResponse::Ok(Json(view)))
}

/// `POST /api/timers/start`
pub async fn start<S, T, P, B, V>(
    State(state): State<AppState<S, T, P, B, V>>,
    Json(req): Json<StartRequest>,
) -> Result<BatchResponse, ApiError>
where
    S: TimerScheduler + Send + Sync + 'static,
    T: StateSource + Send + Sync + 'static,
    P: SnapshotStore + Send + Sync + 'static,
    B: EventPublisher + Send + Sync + 'static,
    V: Switchboard + Send + Sync + 'static,
{
    let targets = parse_targets(&req.targets)?;
    let dispatched = state.timers.start(&targets, req.duration_seconds).await?;
    Ok(BatchResponse::Ok(Json(DispatchedBody { dispatched })))
}

/// `POST /api/timers/restart`
pub async fn restart<S, T, P, B, V>(
    State(state): State<AppState<S, T, P, B, V>>,
    Json(req): Json<StartRequest>,
) -> Result<BatchResponse, ApiError>
where
    S: TimerScheduler + Send + Sync + 'static,
    T: StateSource + Send + Sync + 'static,
    P: SnapshotStore + Send + Sync + 'static,
    B: EventPublisher + Send + Sync + 'static,
    V: Switchboard + Send + Sync + 'static,
{
    let targets = parse_targets(&req.targets)?;
    let dispatched = state.timers.restart(&targets, req.duration_seconds).await?;
    Ok(BatchResponse::Ok(Json(DispatchedBody { dispatched })))
}

/// `POST /api/timers/cancel`
pub async fn cancel<S, T, P, B, V>(
    State(state): State<AppState<S, T, P, B, V>>,
    Json(req): Json<CancelRequest>,
) -> Result<BatchResponse, ApiError>
where
    S: TimerScheduler + Send + Sync + 'static,
    T: StateSource + Send + Sync + 'static,
    P: SnapshotStore + Send + Sync + 'static,
    B: EventPublisher + Send + Sync + 'static,
    V: Switchboard + Send + Sync + 'static,
{
    let targets = parse_targets(&req.targets)?;
    let dispatched = state.timers.cancel(&targets).await?;
    Ok(BatchResponse::Ok(Json(DispatchedBody { dispatched })))
}
