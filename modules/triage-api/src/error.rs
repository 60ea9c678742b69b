use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use tracing::warn;

use triage_common::TriageError;

/// Error response for every route: `{"detail": "..."}` with 422 for bad
/// input and 500 for anything that went wrong inside the service.
#[derive(Debug)]
pub struct ApiError(pub TriageError);

impl From<TriageError> for ApiError {
    fn from(err: TriageError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(TriageError::InvalidInput(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_invalid_input() {
            StatusCode::UNPROCESSABLE_ENTITY
        } else {
            warn!(error = %self.0, "Request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (status, Json(serde_json::json!({ "detail": self.0.to_string() }))).into_response()
    }
}
