use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::coach::CoachError;
use crate::interview::session::InterviewError;
use crate::screens::FormError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// The session is busy with, or not in a state for, this request.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("LLM error: {0}")]
    Llm(String),
}

impl From<CoachError> for AppError {
    fn from(e: CoachError) -> Self {
        AppError::Llm(e.to_string())
    }
}

impl From<FormError> for AppError {
    fn from(e: FormError) -> Self {
        match e {
            FormError::Invalid(msg) => AppError::Validation(msg.to_string()),
            FormError::Failed(msg) => AppError::Llm(msg.to_string()),
            FormError::Busy | FormError::Stale => AppError::Conflict(e.to_string()),
        }
    }
}

impl From<InterviewError> for AppError {
    fn from(e: InterviewError) -> Self {
        match e {
            InterviewError::EmptyAnswer => AppError::Validation(e.to_string()),
            InterviewError::Coach(inner) => inner.into(),
            InterviewError::InvalidPhase(_)
            | InterviewError::EvaluationInProgress
            | InterviewError::VoiceUnavailable
            | InterviewError::Stale => AppError::Conflict(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, "LLM_ERROR", msg.clone())
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
