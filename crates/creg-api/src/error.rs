//! API error type and its HTTP mapping.
//!
//! Every handler returns `Result<_, AppError>`; the [`IntoResponse`] impl
//! turns the error into a flat `{"error": "..."}` body with the matching
//! status code. Internal errors are logged with their detail and surfaced
//! to clients as a generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use creg_domain::guard::Blocked;
use creg_domain::registration::RegistrationError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Wire shape of every error response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed or incomplete input. 400.
    #[error("{0}")]
    Validation(String),

    /// A uniqueness or state conflict the client can resolve. 400.
    #[error("{0}")]
    Conflict(String),

    /// Entity lookup came up empty. 404.
    #[error("{0}")]
    NotFound(String),

    /// A soft-delete guard refused the deactivation. 400.
    #[error("{0}")]
    Blocked(&'static str),

    /// Unexpected failure. 500; the detail stays server-side.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Conflict(_) | AppError::Blocked(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message the client sees. Internal detail is swapped for a
    /// generic string here, not at the call site.
    fn client_message(&self) -> String {
        match self {
            AppError::Internal(_) => "An unexpected error occurred.".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Internal(detail) = &self {
            tracing::error!(detail = %detail, "internal error");
        }
        let status = self.status();
        let body = Json(ErrorBody {
            error: self.client_message(),
        });
        (status, body).into_response()
    }
}

impl From<RegistrationError> for AppError {
    fn from(err: RegistrationError) -> Self {
        match err {
            RegistrationError::AlreadyRegistered => AppError::Conflict(err.to_string()),
            RegistrationError::MissingPrerequisites(_) => AppError::Validation(err.to_string()),
            RegistrationError::NotRegistered => AppError::NotFound(err.to_string()),
            // Lookup failures inside the register path are unexpected:
            // the caller supplied an id that resolved nowhere.
            RegistrationError::StudentNotFound(_) | RegistrationError::CourseNotFound(_) => {
                AppError::Internal(err.to_string())
            }
        }
    }
}

impl From<Blocked> for AppError {
    fn from(err: Blocked) -> Self {
        AppError::Blocked(err.reason)
    }
}

impl From<creg_core::ValidationError> for AppError {
    fn from(err: creg_core::ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Internal(format!("database error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use creg_core::{CourseId, StudentId};
    use http_body_util::BodyExt;

    async fn response_parts(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn validation_maps_to_400_with_flat_body() {
        let (status, body) =
            response_parts(AppError::Validation("student_id and course_id are required.".into()))
                .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "student_id and course_id are required.");
    }

    #[tokio::test]
    async fn not_found_maps_to_404() {
        let (status, body) =
            response_parts(AppError::NotFound("Registration not found.".into())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Registration not found.");
    }

    #[tokio::test]
    async fn blocked_maps_to_400_with_guard_reason() {
        let (status, body) = response_parts(AppError::Blocked(
            "Cannot delete course with existing student registrations.",
        ))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"],
            "Cannot delete course with existing student registrations."
        );
    }

    #[tokio::test]
    async fn internal_hides_detail() {
        let (status, body) =
            response_parts(AppError::Internal("pool timed out after 30s".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "An unexpected error occurred.");
    }

    #[tokio::test]
    async fn registration_errors_carry_their_messages() {
        let (status, body) = response_parts(RegistrationError::AlreadyRegistered.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Student is already registered for this course.");

        let (status, body) = response_parts(
            RegistrationError::MissingPrerequisites(vec!["BASICS-101".into(), "BASICS-102".into()])
                .into(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"],
            "Student is missing required prerequisites: BASICS-101, BASICS-102"
        );

        let (status, _) = response_parts(RegistrationError::NotRegistered.into()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn registration_lookup_failures_are_internal() {
        let (status, body) =
            response_parts(RegistrationError::StudentNotFound(StudentId::new()).into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "An unexpected error occurred.");

        let (status, _) =
            response_parts(RegistrationError::CourseNotFound(CourseId::new()).into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
