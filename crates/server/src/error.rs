//! API error type and the JSON extractor that reports through it.

use axum::extract::FromRequest;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use zpl_labeler_print_client::PrintStatus;
use zpl_labeler_template::TemplateError;

/// Request-level failure, rendered as `{"status": "error", "message": ...}`.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// 400: the request body is missing a field or is not valid JSON.
    #[error("{0}")]
    BadRequest(String),

    /// 404: the requested resource does not exist.
    #[error("{0}")]
    NotFound(String),

    /// 500: the server could not complete a valid request.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    status: PrintStatus,
    message: &'a str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, %status, "request rejected");
        }
        let message = self.to_string();
        let body = ErrorBody {
            status: PrintStatus::Error,
            message: &message,
        };
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<TemplateError> for ApiError {
    fn from(err: TemplateError) -> Self {
        match err {
            TemplateError::NotFound(path) => {
                ApiError::Internal(format!("Template not found: {}", path.display()))
            }
            TemplateError::MissingField(name) => {
                ApiError::Internal(format!("Template references unknown field: {name}"))
            }
            other => ApiError::Internal(format!("Template error: {other}")),
        }
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::Internal(format!("Background task failed: {err}"))
    }
}

/// `axum::Json` whose rejections use the API error envelope.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Handler result alias.
pub type ApiResult<T> = Result<T, ApiError>;
