use crate::services::staging::StagingError;
use crate::services::upload_service::UploadError;
use crate::utils::auth::AuthError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Internal Server Error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        tracing::warn!("🔒 Rejected credential: {}", err);
        let message = match err {
            AuthError::MissingCredential | AuthError::MalformedHeader => "Couldn't find JWT",
            _ => "Couldn't validate JWT",
        };
        AppError::Unauthorized(message.to_string())
    }
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        let summary = err.summary().to_string();
        match err {
            UploadError::VideoNotFound(_) => AppError::NotFound(summary),
            UploadError::NotOwner { .. } => {
                tracing::warn!("🔒 Ownership check failed: {}", err);
                AppError::Unauthorized(summary)
            }
            UploadError::UnsupportedMediaType { .. }
            | UploadError::Staging(StagingError::LimitExceeded { .. }) => {
                tracing::info!("Rejected upload: {}", err);
                AppError::BadRequest(summary)
            }
            _ => {
                tracing::error!("Upload pipeline failed: {}", err);
                AppError::Internal(summary)
            }
        }
    }
}
