//! # Student CRUD API
//!
//! Create, list, fetch, update, and soft-delete students. The list
//! endpoint supports enrollment filters: by course, by instructor, and an
//! `eligible` flag that inverts the enrollment filter to find students who
//! could still register.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use creg_core::{validate_email, AddressId, CourseId, InstructorId, StudentId};
use creg_domain::entity::Student;
use creg_domain::guard::can_deactivate_student;
use creg_domain::repo::{CourseRepo, RegistrationRepo, StudentRepo};
use serde::Deserialize;
use std::collections::HashSet;
use utoipa::ToSchema;

use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::routes::PaginationParams;
use crate::state::AppState;

/// Request to create or fully update a student.
#[derive(Debug, Deserialize, ToSchema)]
pub struct StudentRequest {
    pub name_first: String,
    pub name_last: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub notes: Option<String>,
    pub address_id: Option<AddressId>,
}

impl Validate for StudentRequest {
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

/// Enrollment filters for the student list.
#[derive(Debug, Deserialize, Default, ToSchema)]
pub struct StudentListParams {
    /// Restrict to students enrolled in this course.
    pub course_id: Option<CourseId>,
    /// Restrict to students enrolled in any course taught by this
    /// instructor.
    pub instructor_id: Option<InstructorId>,
    /// Invert the enrollment filter: return students NOT currently
    /// enrolled (who could still register).
    pub eligible: Option<bool>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

/// Build the students router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/students", get(list_students).post(create_student))
        .route(
            "/v1/students/:id",
            get(get_student).put(update_student).delete(delete_student),
        )
}

/// POST /v1/students — Create a student.
#[utoipa::path(
    post,
    path = "/v1/students",
    request_body = StudentRequest,
    responses(
        (status = 201, description = "Student created", body = Student),
        (status = 400, description = "Validation failure or duplicate email", body = crate::error::ErrorBody),
    ),
    tag = "students"
)]
pub async fn create_student(
    State(state): State<AppState>,
    body: Result<Json<StudentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Student>), AppError> {
    let req = extract_validated_json(body)?;

    if StudentRepo::email_taken(&state.store, &req.email, None) {
        return Err(AppError::Conflict(
            "Student with this email already exists.".to_string(),
        ));
    }

    let now = Utc::now();
    let record = Student {
        id: StudentId::new(),
        name_first: req.name_first,
        name_last: req.name_last,
        email: req.email,
        phone: req.phone,
        company: req.company,
        notes: req.notes,
        address_id: req.address_id,
        is_active: true,
        created_at: now,
        updated_at: now,
    };
    let record = StudentRepo::save(&state.store, record);

    if let Some(pool) = &state.db_pool {
        if let Err(e) = crate::db::students::insert(pool, &record).await {
            tracing::error!(student_id = %record.id, error = %e, "failed to persist student");
            return Err(AppError::Internal(
                "student recorded in-memory but database persist failed".to_string(),
            ));
        }
    }

    Ok((StatusCode::CREATED, Json(record)))
}

/// The set of student ids with a live enrollment matching the filters.
fn enrolled_student_ids(state: &AppState, params: &StudentListParams) -> Option<HashSet<StudentId>> {
    if let Some(course_id) = params.course_id {
        let ids = state
            .store
            .active_for_course(course_id)
            .into_iter()
            .filter(|r| r.is_live())
            .map(|r| r.student_id)
            .collect();
        return Some(ids);
    }
    if let Some(instructor_id) = params.instructor_id {
        let ids = state
            .store
            .for_instructor(instructor_id)
            .into_iter()
            .flat_map(|course| {
                state
                    .store
                    .active_for_course(course.id)
                    .into_iter()
                    .filter(|r| r.is_live())
                    .map(|r| r.student_id)
            })
            .collect();
        return Some(ids);
    }
    None
}

/// GET /v1/students — List active students, newest first.
///
/// `?course_id=` narrows to students enrolled in that course;
/// `?instructor_id=` to students enrolled with that instructor.
/// Adding `&eligible=true` inverts the enrollment filter.
#[utoipa::path(
    get,
    path = "/v1/students",
    params(
        ("course_id" = Option<String>, Query, description = "Filter by enrollment in a course"),
        ("instructor_id" = Option<String>, Query, description = "Filter by enrollment with an instructor"),
        ("eligible" = Option<bool>, Query, description = "Invert the enrollment filter"),
        ("limit" = Option<usize>, Query, description = "Max items to return (default 100, max 1000)"),
        ("offset" = Option<usize>, Query, description = "Items to skip (default 0)"),
    ),
    responses(
        (status = 200, description = "List of active students", body = Vec<Student>),
    ),
    tag = "students"
)]
pub async fn list_students(
    State(state): State<AppState>,
    Query(params): Query<StudentListParams>,
) -> Json<Vec<Student>> {
    let mut rows = StudentRepo::find_active(&state.store);

    if let Some(enrolled) = enrolled_student_ids(&state, &params) {
        let eligible = params.eligible.unwrap_or(false);
        rows.retain(|s| enrolled.contains(&s.id) != eligible);
    }

    let pagination = PaginationParams {
        limit: params.limit,
        offset: params.offset,
    };
    Json(pagination.page(rows))
}

/// GET /v1/students/:id — Fetch a student.
#[utoipa::path(
    get,
    path = "/v1/students/{id}",
    params(("id" = String, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student found", body = Student),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "students"
)]
pub async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<StudentId>,
) -> Result<Json<Student>, AppError> {
    StudentRepo::find_by_id(&state.store, id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Student not found.".to_string()))
}

/// PUT /v1/students/:id — Fully update a student.
#[utoipa::path(
    put,
    path = "/v1/students/{id}",
    params(("id" = String, Path, description = "Student ID")),
    request_body = StudentRequest,
    responses(
        (status = 200, description = "Student updated", body = Student),
        (status = 400, description = "Validation failure or duplicate email", body = crate::error::ErrorBody),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "students"
)]
pub async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<StudentId>,
    body: Result<Json<StudentRequest>, JsonRejection>,
) -> Result<Json<Student>, AppError> {
    let req = extract_validated_json(body)?;

    if StudentRepo::find_by_id(&state.store, id).is_none() {
        return Err(AppError::NotFound("Student not found.".to_string()));
    }
    if StudentRepo::email_taken(&state.store, &req.email, Some(id)) {
        return Err(AppError::Conflict(
            "Student with this email already exists.".to_string(),
        ));
    }

    let record = state
        .store
        .students
        .update(id.as_uuid(), |s| {
            s.name_first = req.name_first.clone();
            s.name_last = req.name_last.clone();
            s.email = req.email.clone();
            s.phone = req.phone.clone();
            s.company = req.company.clone();
            s.notes = req.notes.clone();
            s.address_id = req.address_id;
            s.updated_at = Utc::now();
        })
        .ok_or_else(|| AppError::NotFound("Student not found.".to_string()))?;

    if let Some(pool) = &state.db_pool {
        if let Err(e) = crate::db::students::update(pool, &record).await {
            tracing::error!(student_id = %record.id, error = %e, "failed to persist student update");
            return Err(AppError::Internal(
                "student updated in-memory but database persist failed".to_string(),
            ));
        }
    }

    Ok(Json(record))
}

/// DELETE /v1/students/:id — Soft-delete a student.
///
/// Refused while any of the student's `registered` rows points at a
/// course that is still running or upcoming.
#[utoipa::path(
    delete,
    path = "/v1/students/{id}",
    params(("id" = String, Path, description = "Student ID")),
    responses(
        (status = 204, description = "Student deactivated"),
        (status = 400, description = "Deletion blocked by guard", body = crate::error::ErrorBody),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "students"
)]
pub async fn delete_student(
    State(state): State<AppState>,
    Path(id): Path<StudentId>,
) -> Result<StatusCode, AppError> {
    if StudentRepo::find_by_id(&state.store, id).is_none() {
        return Err(AppError::NotFound("Student not found.".to_string()));
    }

    can_deactivate_student(&state.store, id, Utc::now().date_naive())?;

    let record = state
        .store
        .students
        .update(id.as_uuid(), |s| {
            s.is_active = false;
            s.updated_at = Utc::now();
        })
        .ok_or_else(|| AppError::NotFound("Student not found.".to_string()))?;

    if let Some(pool) = &state.db_pool {
        if let Err(e) = crate::db::students::update(pool, &record).await {
            tracing::error!(student_id = %record.id, error = %e, "failed to persist student deactivation");
            return Err(AppError::Internal(
                "student deactivated in-memory but database persist failed".to_string(),
            ));
        }
    }

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> StudentRequest {
        StudentRequest {
            name_first: "Ash".to_string(),
            name_last: "Ketchum".to_string(),
            email: "ash@pallet.com".to_string(),
            phone: None,
            company: None,
            notes: None,
            address_id: None,
        }
    }

    #[test]
    fn request_valid() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn request_rejects_blank_names_and_bad_email() {
        let mut req = valid_request();
        req.name_first = String::new();
        assert!(req.validate().is_err());

        let mut req = valid_request();
        req.email = "nope".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn router_builds() {
        let _router = router();
    }
}
