//! # Instructor CRUD API
//!
//! Create, list, fetch, update, and soft-delete instructors. Deletion is
//! guarded: an instructor with active or upcoming courses cannot be
//! deactivated.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use creg_core::{validate_email, AddressId, DepartmentId, InstructorId};
use creg_domain::entity::Instructor;
use creg_domain::guard::can_deactivate_instructor;
use creg_domain::repo::InstructorRepo;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::routes::PaginationParams;
use crate::state::AppState;

/// Request to create or fully update an instructor.
#[derive(Debug, Deserialize, ToSchema)]
pub struct InstructorRequest {
    pub name_first: String,
    pub name_last: String,
    pub email: String,
    pub bio: Option<String>,
    pub department_id: Option<DepartmentId>,
    pub address_id: Option<AddressId>,
}

impl Validate for InstructorRequest {
    fn validate(&self) -> Result<(), String> {
        if self.name_first.trim().is_empty() {
            return Err("name_first must not be empty".to_string());
        }
        if self.name_last.trim().is_empty() {
            return Err("name_last must not be empty".to_string());
        }
        validate_email(&self.email).map_err(|e| e.to_string())?;
        Ok(())
    }
}

/// Build the instructors router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/instructors", get(list_instructors).post(create_instructor))
        .route(
            "/v1/instructors/:id",
            get(get_instructor)
                .put(update_instructor)
                .delete(delete_instructor),
        )
}

/// POST /v1/instructors — Create an instructor.
#[utoipa::path(
    post,
    path = "/v1/instructors",
    request_body = InstructorRequest,
    responses(
        (status = 201, description = "Instructor created", body = Instructor),
        (status = 400, description = "Validation failure or duplicate email", body = crate::error::ErrorBody),
    ),
    tag = "instructors"
)]
pub async fn create_instructor(
    State(state): State<AppState>,
    body: Result<Json<InstructorRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Instructor>), AppError> {
    let req = extract_validated_json(body)?;

    if state.store.email_taken(&req.email, None) {
        return Err(AppError::Conflict(
            "Instructor with this email already exists.".to_string(),
        ));
    }

    let now = Utc::now();
    let record = Instructor {
        id: InstructorId::new(),
        department_id: req.department_id,
        address_id: req.address_id,
        name_first: req.name_first,
        name_last: req.name_last,
        email: req.email,
        bio: req.bio,
        is_active: true,
        created_at: now,
        updated_at: now,
    };
    let record = state.store.save(record);

    if let Some(pool) = &state.db_pool {
        if let Err(e) = crate::db::instructors::insert(pool, &record).await {
            tracing::error!(instructor_id = %record.id, error = %e, "failed to persist instructor");
            return Err(AppError::Internal(
                "instructor recorded in-memory but database persist failed".to_string(),
            ));
        }
    }

    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /v1/instructors — List active instructors, newest first.
#[utoipa::path(
    get,
    path = "/v1/instructors",
    params(
        ("limit" = Option<usize>, Query, description = "Max items to return (default 100, max 1000)"),
        ("offset" = Option<usize>, Query, description = "Items to skip (default 0)"),
    ),
    responses(
        (status = 200, description = "List of active instructors", body = Vec<Instructor>),
    ),
    tag = "instructors"
)]
pub async fn list_instructors(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> Json<Vec<Instructor>> {
    Json(pagination.page(state.store.find_active()))
}

/// GET /v1/instructors/:id — Fetch an instructor.
#[utoipa::path(
    get,
    path = "/v1/instructors/{id}",
    params(("id" = String, Path, description = "Instructor ID")),
    responses(
        (status = 200, description = "Instructor found", body = Instructor),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "instructors"
)]
pub async fn get_instructor(
    State(state): State<AppState>,
    Path(id): Path<InstructorId>,
) -> Result<Json<Instructor>, AppError> {
    state
        .store
        .find_by_id(id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Instructor not found.".to_string()))
}

/// PUT /v1/instructors/:id — Fully update an instructor.
#[utoipa::path(
    put,
    path = "/v1/instructors/{id}",
    params(("id" = String, Path, description = "Instructor ID")),
    request_body = InstructorRequest,
    responses(
        (status = 200, description = "Instructor updated", body = Instructor),
        (status = 400, description = "Validation failure or duplicate email", body = crate::error::ErrorBody),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "instructors"
)]
pub async fn update_instructor(
    State(state): State<AppState>,
    Path(id): Path<InstructorId>,
    body: Result<Json<InstructorRequest>, JsonRejection>,
) -> Result<Json<Instructor>, AppError> {
    let req = extract_validated_json(body)?;

    if state.store.find_by_id(id).is_none() {
        return Err(AppError::NotFound("Instructor not found.".to_string()));
    }
    if state.store.email_taken(&req.email, Some(id)) {
        return Err(AppError::Conflict(
            "Instructor with this email already exists.".to_string(),
        ));
    }

    let record = state
        .store
        .instructors
        .update(id.as_uuid(), |i| {
            i.name_first = req.name_first.clone();
            i.name_last = req.name_last.clone();
            i.email = req.email.clone();
            i.bio = req.bio.clone();
            i.department_id = req.department_id;
            i.address_id = req.address_id;
            i.updated_at = Utc::now();
        })
        .ok_or_else(|| AppError::NotFound("Instructor not found.".to_string()))?;

    if let Some(pool) = &state.db_pool {
        if let Err(e) = crate::db::instructors::update(pool, &record).await {
            tracing::error!(instructor_id = %record.id, error = %e, "failed to persist instructor update");
            return Err(AppError::Internal(
                "instructor updated in-memory but database persist failed".to_string(),
            ));
        }
    }

    Ok(Json(record))
}

/// DELETE /v1/instructors/:id — Soft-delete an instructor.
///
/// Refused while the instructor owns any active course that is still
/// running or upcoming.
#[utoipa::path(
    delete,
    path = "/v1/instructors/{id}",
    params(("id" = String, Path, description = "Instructor ID")),
    responses(
        (status = 204, description = "Instructor deactivated"),
        (status = 400, description = "Deletion blocked by guard", body = crate::error::ErrorBody),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "instructors"
)]
pub async fn delete_instructor(
    State(state): State<AppState>,
    Path(id): Path<InstructorId>,
) -> Result<StatusCode, AppError> {
    if state.store.find_by_id(id).is_none() {
        return Err(AppError::NotFound("Instructor not found.".to_string()));
    }

    can_deactivate_instructor(&state.store, id, Utc::now().date_naive())?;

    let record = state
        .store
        .instructors
        .update(id.as_uuid(), |i| {
            i.is_active = false;
            i.updated_at = Utc::now();
        })
        .ok_or_else(|| AppError::NotFound("Instructor not found.".to_string()))?;

    if let Some(pool) = &state.db_pool {
        if let Err(e) = crate::db::instructors::update(pool, &record).await {
            tracing::error!(instructor_id = %record.id, error = %e, "failed to persist instructor deactivation");
            return Err(AppError::Internal(
                "instructor deactivated in-memory but database persist failed".to_string(),
            ));
        }
    }

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> InstructorRequest {
        InstructorRequest {
            name_first: "Samuel".to_string(),
            name_last: "Oak".to_string(),
            email: "oak@pallet.edu".to_string(),
            bio: None,
            department_id: None,
            address_id: None,
        }
    }

    #[test]
    fn request_valid() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn request_rejects_blank_names() {
        let mut req = valid_request();
        req.name_first = "  ".to_string();
        assert!(req.validate().is_err());

        let mut req = valid_request();
        req.name_last = String::new();
        assert!(req.validate().is_err());
    }

    #[test]
    fn request_rejects_malformed_email() {
        let mut req = valid_request();
        req.email = "not-an-email".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn router_builds() {
        let _router = router();
    }
}
