//! # Registration API
//!
//! Read and soft-delete registration rows, plus the two enrollment
//! actions: `register` and `unregister`. Rows are created only through
//! the register action; the actions respond with a message envelope
//! rather than the row itself.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use creg_core::{
    CourseId, PaymentStatus, RegistrationId, RegistrationStatus, StudentId,
};
use creg_domain::entity::Registration;
use creg_domain::guard::can_deactivate_registration;
use creg_domain::registration::{register, unregister};
use creg_domain::repo::{CourseRepo, RegistrationRepo, StudentRepo};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AppError;
use crate::extractors::extract_json;
use crate::routes::PaginationParams;
use crate::state::AppState;

/// Body of the register / unregister actions. Ids arrive as strings;
/// presence is checked before UUID parsing so a missing field gets the
/// required-fields message rather than a parse error.
#[derive(Debug, Deserialize, ToSchema)]
pub struct EnrollmentActionRequest {
    #[serde(default)]
    pub student_id: Option<String>,
    #[serde(default)]
    pub course_id: Option<String>,
}

/// Success envelope for the enrollment actions.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Registration row enriched with student and course display fields.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegistrationView {
    pub id: RegistrationId,
    pub student_id: StudentId,
    /// Display name of the student, if still on record.
    pub student_name: Option<String>,
    pub course_id: CourseId,
    /// Title of the course, if still on record.
    pub course_title: Option<String>,
    pub registration_status: RegistrationStatus,
    pub payment_status: PaymentStatus,
    pub registered_at: DateTime<Utc>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub(crate) fn registration_view(state: &AppState, row: Registration) -> RegistrationView {
    let student_name =
        StudentRepo::find_by_id(&state.store, row.student_id).map(|s| s.full_name());
    let course_title =
        CourseRepo::find_by_id(&state.store, row.course_id).map(|c| c.title);
    RegistrationView {
        id: row.id,
        student_id: row.student_id,
        student_name,
        course_id: row.course_id,
        course_title,
        registration_status: row.registration_status,
        payment_status: row.payment_status,
        registered_at: row.registered_at,
        is_active: row.is_active,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

/// Build the registrations router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/registrations", get(list_registrations))
        .route(
            "/v1/registrations/:id",
            get(get_registration).delete(delete_registration),
        )
        .route("/v1/registrations/register", post(register_student))
        .route("/v1/registrations/unregister", post(unregister_student))
}

/// Extract both ids from the action body, rejecting missing or blank
/// fields before any parsing happens.
fn required_ids(req: &EnrollmentActionRequest) -> Result<(&str, &str), AppError> {
    match (req.student_id.as_deref(), req.course_id.as_deref()) {
        (Some(s), Some(c)) if !s.trim().is_empty() && !c.trim().is_empty() => Ok((s, c)),
        _ => Err(AppError::Validation(
            "student_id and course_id are required.".to_string(),
        )),
    }
}

/// POST /v1/registrations/register — Register a student for a course.
///
/// Checks run in order: duplicate live registration, unmet prerequisites.
/// The enrollment notification fires only after the row is committed.
#[utoipa::path(
    post,
    path = "/v1/registrations/register",
    request_body = EnrollmentActionRequest,
    responses(
        (status = 200, description = "Student registered", body = MessageResponse),
        (status = 400, description = "Missing ids, duplicate registration, or unmet prerequisites", body = crate::error::ErrorBody),
        (status = 500, description = "Unknown student or course id", body = crate::error::ErrorBody),
    ),
    tag = "registrations"
)]
pub async fn register_student(
    State(state): State<AppState>,
    body: Result<Json<EnrollmentActionRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let req = extract_json(body)?;
    let (student_raw, course_raw) = required_ids(&req)?;

    // Unparseable ids surface as unexpected errors on this path.
    let student_id: StudentId = student_raw
        .parse::<Uuid>()
        .map(Into::into)
        .map_err(|e| AppError::Internal(format!("invalid student_id {student_raw:?}: {e}")))?;
    let course_id: CourseId = course_raw
        .parse::<Uuid>()
        .map(Into::into)
        .map_err(|e| AppError::Internal(format!("invalid course_id {course_raw:?}: {e}")))?;

    let (row, event) = register(&state.store, student_id, course_id)?;

    if let Some(pool) = &state.db_pool {
        if let Err(e) = crate::db::registrations::insert(pool, &row).await {
            tracing::error!(registration_id = %row.id, error = %e, "failed to persist registration");
            return Err(AppError::Internal(
                "registration recorded in-memory but database persist failed".to_string(),
            ));
        }
    }

    // Post-commit: a notifier failure can no longer affect the outcome.
    state.notifier.notify(&event);
    tracing::info!(
        registration_id = %row.id,
        student_id = %student_id,
        course_id = %course_id,
        "student registered"
    );

    Ok(Json(MessageResponse {
        message: "Student registered successfully.".to_string(),
    }))
}

/// POST /v1/registrations/unregister — Cancel a student's registration.
///
/// Sets the live row's status to `cancelled`; the row stays active and
/// queryable.
#[utoipa::path(
    post,
    path = "/v1/registrations/unregister",
    request_body = EnrollmentActionRequest,
    responses(
        (status = 200, description = "Student unregistered", body = MessageResponse),
        (status = 400, description = "Missing ids", body = crate::error::ErrorBody),
        (status = 404, description = "No active registration for the pair", body = crate::error::ErrorBody),
    ),
    tag = "registrations"
)]
pub async fn unregister_student(
    State(state): State<AppState>,
    body: Result<Json<EnrollmentActionRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let req = extract_json(body)?;
    let (student_raw, course_raw) = required_ids(&req)?;

    // An unparseable id can never name a live registration.
    let not_found = || AppError::NotFound("Registration not found.".to_string());
    let student_id: StudentId = student_raw
        .parse::<Uuid>()
        .map(Into::into)
        .map_err(|_| not_found())?;
    let course_id: CourseId = course_raw
        .parse::<Uuid>()
        .map(Into::into)
        .map_err(|_| not_found())?;

    let (row, event) = unregister(&state.store, student_id, course_id)?;

    if let Some(pool) = &state.db_pool {
        if let Err(e) = crate::db::registrations::update(pool, &row).await {
            tracing::error!(registration_id = %row.id, error = %e, "failed to persist cancellation");
            return Err(AppError::Internal(
                "cancellation applied in-memory but database persist failed".to_string(),
            ));
        }
    }

    state.notifier.notify(&event);
    tracing::info!(
        registration_id = %row.id,
        student_id = %student_id,
        course_id = %course_id,
        "student unregistered"
    );

    Ok(Json(MessageResponse {
        message: "Student unregistered successfully.".to_string(),
    }))
}

/// GET /v1/registrations — List active registration rows, newest first.
#[utoipa::path(
    get,
    path = "/v1/registrations",
    params(
        ("limit" = Option<usize>, Query, description = "Max items to return (default 100, max 1000)"),
        ("offset" = Option<usize>, Query, description = "Items to skip (default 0)"),
    ),
    responses(
        (status = 200, description = "List of active registrations", body = Vec<RegistrationView>),
    ),
    tag = "registrations"
)]
pub async fn list_registrations(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> Json<Vec<RegistrationView>> {
    let rows = pagination.page(RegistrationRepo::find_active(&state.store));
    Json(
        rows.into_iter()
            .map(|r| registration_view(&state, r))
            .collect(),
    )
}

/// GET /v1/registrations/:id — Fetch a registration row.
#[utoipa::path(
    get,
    path = "/v1/registrations/{id}",
    params(("id" = String, Path, description = "Registration ID")),
    responses(
        (status = 200, description = "Registration found", body = RegistrationView),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "registrations"
)]
pub async fn get_registration(
    State(state): State<AppState>,
    Path(id): Path<RegistrationId>,
) -> Result<Json<RegistrationView>, AppError> {
    RegistrationRepo::find_by_id(&state.store, id)
        .map(|r| Json(registration_view(&state, r)))
        .ok_or_else(|| AppError::NotFound("Registration not found.".to_string()))
}

/// DELETE /v1/registrations/:id — Soft-delete a registration row.
///
/// Always permitted; this is a pure archive operation with no
/// status-change logic.
#[utoipa::path(
    delete,
    path = "/v1/registrations/{id}",
    params(("id" = String, Path, description = "Registration ID")),
    responses(
        (status = 204, description = "Registration deactivated"),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "registrations"
)]
pub async fn delete_registration(
    State(state): State<AppState>,
    Path(id): Path<RegistrationId>,
) -> Result<StatusCode, AppError> {
    if RegistrationRepo::find_by_id(&state.store, id).is_none() {
        return Err(AppError::NotFound("Registration not found.".to_string()));
    }

    can_deactivate_registration()?;

    let record = state
        .store
        .registrations
        .update(id.as_uuid(), |r| {
            r.is_active = false;
            r.updated_at = Utc::now();
        })
        .ok_or_else(|| AppError::NotFound("Registration not found.".to_string()))?;

    if let Some(pool) = &state.db_pool {
        if let Err(e) = crate::db::registrations::update(pool, &record).await {
            tracing::error!(registration_id = %record.id, error = %e, "failed to persist registration deactivation");
            return Err(AppError::Internal(
                "registration deactivated in-memory but database persist failed".to_string(),
            ));
        }
    }

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_ids_accepts_present_values() {
        let req = EnrollmentActionRequest {
            student_id: Some("abc".to_string()),
            course_id: Some("def".to_string()),
        };
        assert_eq!(required_ids(&req).unwrap(), ("abc", "def"));
    }

    #[test]
    fn required_ids_rejects_missing_or_blank() {
        let cases = [
            (None, Some("x".to_string())),
            (Some("x".to_string()), None),
            (None, None),
            (Some("  ".to_string()), Some("x".to_string())),
        ];
        for (student_id, course_id) in cases {
            let req = EnrollmentActionRequest {
                student_id,
                course_id,
            };
            let err = required_ids(&req).unwrap_err();
            assert!(
                matches!(&err, AppError::Validation(msg) if msg == "student_id and course_id are required."),
                "unexpected error: {err:?}"
            );
        }
    }

    #[test]
    fn router_builds() {
        let _router = router();
    }
}
