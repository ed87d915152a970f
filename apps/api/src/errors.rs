use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::conversation::machine::TransitionError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Component failures (extraction, model calls) never reach here: the
/// conversation turns them into transcript messages.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid action: {0}")]
    InvalidAction(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<TransitionError> for AppError {
    fn from(err: TransitionError) -> Self {
        match err {
            TransitionError::EmptyText | TransitionError::UnknownRole(_) => {
                AppError::Validation(err.to_string())
            }
            TransitionError::Unexpected { .. } | TransitionError::Concluded => {
                AppError::InvalidAction(err.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::InvalidAction(msg) => (StatusCode::CONFLICT, "INVALID_ACTION", msg.clone()),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_errors_map_to_status() {
        let cases = [
            (TransitionError::EmptyText, StatusCode::BAD_REQUEST),
            (
                TransitionError::UnknownRole("Astronaut".into()),
                StatusCode::BAD_REQUEST,
            ),
            (TransitionError::Concluded, StatusCode::CONFLICT),
            (
                TransitionError::Unexpected {
                    stage: "GREETING",
                    event: "submit_text",
                },
                StatusCode::CONFLICT,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(AppError::from(err).into_response().status(), status);
        }
    }

    #[test]
    fn test_internal_error_hides_details() {
        let response = AppError::Internal(anyhow::anyhow!("secret")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
