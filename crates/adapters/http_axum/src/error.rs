//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use autoff_domain::error::AutoffError;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`AutoffError`] to an HTTP response with appropriate status code.
pub struct ApiError(AutoffError);

impl From<AutoffError> for ApiError {
    fn from(err: AutoffError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            AutoffError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            AutoffError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string()),
            AutoffError::Storage(err) => {
                tracing::error!(error = %err, "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
            AutoffError::Dispatch(err) => {
                tracing::error!(error = %err, "dispatch error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
