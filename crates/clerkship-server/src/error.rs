use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use clerkship_wizard::{ValidationError, WizardError};

/// Unified API error type for all route handlers.
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    Unauthorized(String),
    Conflict(String),
    Invalid(ValidationError),
    /// A store call failed in a way the learner can retry.
    Unavailable(String),
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    rule: Option<ValidationError>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, rule) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg, None),
            ApiError::Invalid(rule) => (StatusCode::UNPROCESSABLE_ENTITY, rule.to_string(), Some(rule)),
            ApiError::Unavailable(msg) => {
                tracing::warn!("store unavailable: {msg}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "your answers could not be saved; please submit again".to_string(),
                    None,
                )
            }
            ApiError::Internal(msg) => {
                tracing::error!("internal error: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_string(), None)
            }
        };

        (status, Json(ErrorBody { error: message, rule })).into_response()
    }
}

impl From<WizardError> for ApiError {
    fn from(e: WizardError) -> Self {
        match e {
            WizardError::Validation(rule) => ApiError::Invalid(rule),
            WizardError::UnknownCode => ApiError::Unauthorized(e.to_string()),
            WizardError::NotLoggedIn
            | WizardError::WrongPage { .. }
            | WizardError::Unavailable { .. }
            | WizardError::HistoryClosed => ApiError::Conflict(e.to_string()),
            WizardError::Store(ref storage) if storage.is_retryable() => {
                ApiError::Unavailable(e.to_string())
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<std::io::Error> for ApiError {
    fn from(e: std::io::Error) -> Self {
        ApiError::Internal(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clerkship_core::models::page::Page;
    use clerkship_storage::StorageError;

    fn status(e: WizardError) -> StatusCode {
        ApiError::from(e).into_response().status()
    }

    #[test]
    fn wizard_errors_map_to_statuses() {
        assert_eq!(
            status(ValidationError::duplicate("CBC").into()),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(status(WizardError::UnknownCode), StatusCode::UNAUTHORIZED);
        assert_eq!(
            status(WizardError::wrong_page(Page::Diagnoses, Page::IntakeForm)),
            StatusCode::CONFLICT
        );
        assert_eq!(status(WizardError::HistoryClosed), StatusCode::CONFLICT);
        assert_eq!(
            status(WizardError::Store(StorageError::WriteFailed {
                code: "A1".into(),
                reason: "timeout".into(),
            })),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status(WizardError::Store(StorageError::NotADocument {
                key: "responses/A1.json".into(),
            })),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
