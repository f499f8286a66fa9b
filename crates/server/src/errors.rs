use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Wire-visible failures. Internal detail is logged by the handler and
/// never placed in the body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid journal entry: {0}")]
    Validation(String),
    #[error("{0}")]
    Internal(&'static str),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            Self::Validation(details) => serde_json::json!({"error": "Invalid journal entry", "details": details}),
            Self::Internal(msg) => serde_json::json!({"error": msg}),
        };
        (status, Json(body)).into_response()
    }
}
