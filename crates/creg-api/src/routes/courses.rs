//! # Course CRUD API
//!
//! Create, list, fetch, update, and soft-delete courses. Course responses
//! are enriched with the owning instructor's display name and the live
//! enrollment count. Deletion is guarded: a course with any active
//! registration row cannot be deactivated.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{NaiveDate, Utc};
use creg_core::{CourseId, InstructorId};
use creg_domain::entity::Course;
use creg_domain::guard::can_deactivate_course;
use creg_domain::repo::{CourseRepo, InstructorRepo, RegistrationRepo};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::routes::PaginationParams;
use crate::state::AppState;

/// Request to create a course. The owning instructor is fixed at
/// creation time.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCourseRequest {
    pub course_code: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub description_full: String,
    pub instructor_id: InstructorId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub course_fee: f64,
    pub syllabus_url: Option<String>,
    /// Ordered course codes that must be completed before enrolling.
    #[serde(default)]
    pub prerequisites: Vec<String>,
}

fn validate_course_fields(
    course_code: &str,
    title: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
    course_fee: f64,
) -> Result<(), String> {
    if course_code.trim().is_empty() {
        return Err("course_code must not be empty".to_string());
    }
    if title.trim().is_empty() {
        return Err("title must not be empty".to_string());
    }
    if end_date < start_date {
        return Err("end_date must not precede start_date".to_string());
    }
    if !course_fee.is_finite() || course_fee < 0.0 {
        return Err("course_fee must be a non-negative number".to_string());
    }
    Ok(())
}

impl Validate for CreateCourseRequest {
    fn validate(&self) -> Result<(), String> {
        validate_course_fields(
            &self.course_code,
            &self.title,
            self.start_date,
            self.end_date,
            self.course_fee,
        )
    }
}

/// Request to fully update a course. `instructor_id` is immutable and
/// absent here.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCourseRequest {
    pub course_code: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub description_full: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub course_fee: f64,
    pub syllabus_url: Option<String>,
    #[serde(default)]
    pub prerequisites: Vec<String>,
}

impl Validate for UpdateCourseRequest {
    fn validate(&self) -> Result<(), String> {
        validate_course_fields(
            &self.course_code,
            &self.title,
            self.start_date,
            self.end_date,
            self.course_fee,
        )
    }
}

/// Course response enriched with instructor name and live enrollment
/// count.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CourseView {
    #[serde(flatten)]
    pub course: Course,
    /// Display name of the owning instructor, if still on record.
    pub instructor_name: Option<String>,
    /// Number of live (`registered`, active) enrollments.
    pub enrollment_count: usize,
}

/// Filters for the course list.
#[derive(Debug, Deserialize, Default, ToSchema)]
pub struct CourseListParams {
    /// When true, restrict to courses currently running
    /// (`start_date <= today <= end_date`).
    pub active_courses: Option<bool>,
    /// Restrict to courses owned by this instructor.
    pub instructor_id: Option<InstructorId>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

/// Build the courses router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/courses", get(list_courses).post(create_course))
        .route(
            "/v1/courses/:id",
            get(get_course).put(update_course).delete(delete_course),
        )
}

pub(crate) fn course_view(state: &AppState, course: Course) -> CourseView {
    let instructor_name = InstructorRepo::find_by_id(&state.store, course.instructor_id)
        .map(|i| i.full_name());
    let enrollment_count = state
        .store
        .active_for_course(course.id)
        .iter()
        .filter(|r| r.is_live())
        .count();
    CourseView {
        course,
        instructor_name,
        enrollment_count,
    }
}

/// POST /v1/courses — Create a course.
#[utoipa::path(
    post,
    path = "/v1/courses",
    request_body = CreateCourseRequest,
    responses(
        (status = 201, description = "Course created", body = CourseView),
        (status = 400, description = "Validation failure or duplicate course_code", body = crate::error::ErrorBody),
    ),
    tag = "courses"
)]
pub async fn create_course(
    State(state): State<AppState>,
    body: Result<Json<CreateCourseRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CourseView>), AppError> {
    let req = extract_validated_json(body)?;

    if InstructorRepo::find_by_id(&state.store, req.instructor_id).is_none() {
        return Err(AppError::Validation(
            "instructor_id does not reference a known instructor".to_string(),
        ));
    }
    if state.store.code_taken(&req.course_code, None) {
        return Err(AppError::Conflict(
            "Course with this course_code already exists.".to_string(),
        ));
    }

    let now = Utc::now();
    let record = Course {
        id: CourseId::new(),
        course_code: req.course_code,
        title: req.title,
        description: req.description,
        description_full: req.description_full,
        instructor_id: req.instructor_id,
        start_date: req.start_date,
        end_date: req.end_date,
        course_fee: req.course_fee,
        syllabus_url: req.syllabus_url,
        prerequisites: req.prerequisites,
        is_active: true,
        created_at: now,
        updated_at: now,
    };
    let record = CourseRepo::save(&state.store, record);

    if let Some(pool) = &state.db_pool {
        if let Err(e) = crate::db::courses::insert(pool, &record).await {
            tracing::error!(course_id = %record.id, error = %e, "failed to persist course");
            return Err(AppError::Internal(
                "course recorded in-memory but database persist failed".to_string(),
            ));
        }
    }

    Ok((StatusCode::CREATED, Json(course_view(&state, record))))
}

/// GET /v1/courses — List active courses, newest first.
///
/// `?active_courses=true` restricts to courses running today;
/// `?instructor_id=` to courses owned by one instructor.
#[utoipa::path(
    get,
    path = "/v1/courses",
    params(
        ("active_courses" = Option<bool>, Query, description = "Only courses running today"),
        ("instructor_id" = Option<String>, Query, description = "Only courses owned by this instructor"),
        ("limit" = Option<usize>, Query, description = "Max items to return (default 100, max 1000)"),
        ("offset" = Option<usize>, Query, description = "Items to skip (default 0)"),
    ),
    responses(
        (status = 200, description = "List of active courses", body = Vec<CourseView>),
    ),
    tag = "courses"
)]
pub async fn list_courses(
    State(state): State<AppState>,
    Query(params): Query<CourseListParams>,
) -> Json<Vec<CourseView>> {
    let mut rows = CourseRepo::find_active(&state.store);

    if params.active_courses.unwrap_or(false) {
        let today = Utc::now().date_naive();
        rows.retain(|c| c.runs_on(today));
    }
    if let Some(instructor_id) = params.instructor_id {
        rows.retain(|c| c.instructor_id == instructor_id);
    }

    let pagination = PaginationParams {
        limit: params.limit,
        offset: params.offset,
    };
    let page = pagination
        .page(rows)
        .into_iter()
        .map(|c| course_view(&state, c))
        .collect();
    Json(page)
}

/// GET /v1/courses/:id — Fetch a course.
#[utoipa::path(
    get,
    path = "/v1/courses/{id}",
    params(("id" = String, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course found", body = CourseView),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "courses"
)]
pub async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<CourseId>,
) -> Result<Json<CourseView>, AppError> {
    CourseRepo::find_by_id(&state.store, id)
        .map(|c| Json(course_view(&state, c)))
        .ok_or_else(|| AppError::NotFound("Course not found.".to_string()))
}

/// PUT /v1/courses/:id — Fully update a course (except its instructor).
#[utoipa::path(
    put,
    path = "/v1/courses/{id}",
    params(("id" = String, Path, description = "Course ID")),
    request_body = UpdateCourseRequest,
    responses(
        (status = 200, description = "Course updated", body = CourseView),
        (status = 400, description = "Validation failure or duplicate course_code", body = crate::error::ErrorBody),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "courses"
)]
pub async fn update_course(
    State(state): State<AppState>,
    Path(id): Path<CourseId>,
    body: Result<Json<UpdateCourseRequest>, JsonRejection>,
) -> Result<Json<CourseView>, AppError> {
    let req = extract_validated_json(body)?;

    if CourseRepo::find_by_id(&state.store, id).is_none() {
        return Err(AppError::NotFound("Course not found.".to_string()));
    }
    if state.store.code_taken(&req.course_code, Some(id)) {
        return Err(AppError::Conflict(
            "Course with this course_code already exists.".to_string(),
        ));
    }

    let record = state
        .store
        .courses
        .update(id.as_uuid(), |c| {
            c.course_code = req.course_code.clone();
            c.title = req.title.clone();
            c.description = req.description.clone();
            c.description_full = req.description_full.clone();
            c.start_date = req.start_date;
            c.end_date = req.end_date;
            c.course_fee = req.course_fee;
            c.syllabus_url = req.syllabus_url.clone();
            c.prerequisites = req.prerequisites.clone();
            c.updated_at = Utc::now();
        })
        .ok_or_else(|| AppError::NotFound("Course not found.".to_string()))?;

    if let Some(pool) = &state.db_pool {
        if let Err(e) = crate::db::courses::update(pool, &record).await {
            tracing::error!(course_id = %record.id, error = %e, "failed to persist course update");
            return Err(AppError::Internal(
                "course updated in-memory but database persist failed".to_string(),
            ));
        }
    }

    Ok(Json(course_view(&state, record)))
}

/// DELETE /v1/courses/:id — Soft-delete a course.
///
/// Refused while any active registration row references the course,
/// whatever that row's status.
#[utoipa::path(
    delete,
    path = "/v1/courses/{id}",
    params(("id" = String, Path, description = "Course ID")),
    responses(
        (status = 204, description = "Course deactivated"),
        (status = 400, description = "Deletion blocked by guard", body = crate::error::ErrorBody),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "courses"
)]
pub async fn delete_course(
    State(state): State<AppState>,
    Path(id): Path<CourseId>,
) -> Result<StatusCode, AppError> {
    if CourseRepo::find_by_id(&state.store, id).is_none() {
        return Err(AppError::NotFound("Course not found.".to_string()));
    }

    can_deactivate_course(&state.store, id)?;

    let record = state
        .store
        .courses
        .update(id.as_uuid(), |c| {
            c.is_active = false;
            c.updated_at = Utc::now();
        })
        .ok_or_else(|| AppError::NotFound("Course not found.".to_string()))?;

    if let Some(pool) = &state.db_pool {
        if let Err(e) = crate::db::courses::update(pool, &record).await {
            tracing::error!(course_id = %record.id, error = %e, "failed to persist course deactivation");
            return Err(AppError::Internal(
                "course deactivated in-memory but database persist failed".to_string(),
            ));
        }
    }

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn valid_request() -> CreateCourseRequest {
        CreateCourseRequest {
            course_code: "BASICS-101".to_string(),
            title: "Basics".to_string(),
            description: "Intro".to_string(),
            description_full: "A full introduction.".to_string(),
            instructor_id: InstructorId::new(),
            start_date: date("2025-01-01"),
            end_date: date("2025-06-01"),
            course_fee: 199.0,
            syllabus_url: None,
            prerequisites: vec![],
        }
    }

    #[test]
    fn request_valid() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn request_rejects_inverted_date_range() {
        let mut req = valid_request();
        req.start_date = date("2025-06-01");
        req.end_date = date("2025-01-01");
        let err = req.validate().unwrap_err();
        assert!(err.contains("end_date"), "error should mention end_date: {err}");
    }

    #[test]
    fn request_allows_single_day_course() {
        let mut req = valid_request();
        req.start_date = date("2025-06-01");
        req.end_date = date("2025-06-01");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn request_rejects_negative_or_non_finite_fee() {
        let mut req = valid_request();
        req.course_fee = -1.0;
        assert!(req.validate().is_err());

        let mut req = valid_request();
        req.course_fee = f64::NAN;
        assert!(req.validate().is_err());
    }

    #[test]
    fn request_rejects_blank_code_and_title() {
        let mut req = valid_request();
        req.course_code = " ".to_string();
        assert!(req.validate().is_err());

        let mut req = valid_request();
        req.title = String::new();
        assert!(req.validate().is_err());
    }

    #[test]
    fn router_builds() {
        let _router = router();
    }
}
