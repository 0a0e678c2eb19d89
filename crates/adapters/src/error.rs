//! HTTP mapping for service errors

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use marquee_protocol::{IssueCode, MovieError, ValidationErrors};
use serde_json::json;

/// Error returned by movie handlers
#[derive(Debug)]
pub struct ApiError(pub MovieError);

impl From<MovieError> for ApiError {
    fn from(err: MovieError) -> Self {
        ApiError(err)
    }
}

/// Unparseable bodies are reported like any other validation failure.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(MovieError::ValidationFailed {
            errors: ValidationErrors::root(IssueCode::InvalidJson, rejection.body_text()),
        })
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0 {
            MovieError::ValidationFailed { errors } => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": errors }))).into_response()
            }
            MovieError::NotFound { .. } => (
                StatusCode::NOT_FOUND,
                Json(json!({ "message": MovieError::NOT_FOUND_MESSAGE })),
            )
                .into_response(),
        }
    }
}
