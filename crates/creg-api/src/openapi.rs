//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI spec,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the entire API surface.
///
/// Registers all utoipa-documented routes, schemas, and tags. Serves as
/// the single source of truth for integrators.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "CREG API — Course Registration Backend",
        version = "0.3.2",
        description = "Axum API for the course registration stack.\n\nProvides:\n- **Instructor / Course / Student / Registration** CRUD with soft deletes and referential guards\n- **Enrollment actions** (register / unregister) with prerequisite gating\n- **Cross-entity search** over students, instructors, courses, and registrations\n- **Dashboard summary** of active entity counts\n\nHealth probes live at `/health/*`; Prometheus metrics at `/metrics`.",
        contact(name = "CREG")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server"),
    ),
    paths(
        // ── Instructors ─────────────────────────────────────────────────
        crate::routes::instructors::create_instructor,
        crate::routes::instructors::list_instructors,
        crate::routes::instructors::get_instructor,
        crate::routes::instructors::update_instructor,
        crate::routes::instructors::delete_instructor,
        // ── Courses ─────────────────────────────────────────────────────
        crate::routes::courses::create_course,
        crate::routes::courses::list_courses,
        crate::routes::courses::get_course,
        crate::routes::courses::update_course,
        crate::routes::courses::delete_course,
        // ── Students ────────────────────────────────────────────────────
        crate::routes::students::create_student,
        crate::routes::students::list_students,
        crate::routes::students::get_student,
        crate::routes::students::update_student,
        crate::routes::students::delete_student,
        // ── Registrations ───────────────────────────────────────────────
        crate::routes::registrations::register_student,
        crate::routes::registrations::unregister_student,
        crate::routes::registrations::list_registrations,
        crate::routes::registrations::get_registration,
        crate::routes::registrations::delete_registration,
        // ── Search / Dashboard ──────────────────────────────────────────
        crate::routes::search::search,
        crate::routes::dashboard::dashboard_summary,
    ),
    components(
        schemas(
            // ── Error types ─────────────────────────────────────────────
            crate::error::ErrorBody,
            // ── Entity records ──────────────────────────────────────────
            creg_domain::entity::Instructor,
            creg_domain::entity::Course,
            creg_domain::entity::Student,
            creg_domain::entity::Registration,
            creg_core::RegistrationStatus,
            creg_core::PaymentStatus,
            // ── Instructor DTOs ─────────────────────────────────────────
            crate::routes::instructors::InstructorRequest,
            // ── Course DTOs ─────────────────────────────────────────────
            crate::routes::courses::CreateCourseRequest,
            crate::routes::courses::UpdateCourseRequest,
            crate::routes::courses::CourseView,
            // ── Student DTOs ────────────────────────────────────────────
            crate::routes::students::StudentRequest,
            // ── Registration DTOs ───────────────────────────────────────
            crate::routes::registrations::EnrollmentActionRequest,
            crate::routes::registrations::MessageResponse,
            crate::routes::registrations::RegistrationView,
            // ── Search / Dashboard DTOs ─────────────────────────────────
            crate::routes::search::SearchResults,
            crate::routes::dashboard::DashboardSummary,
        ),
    ),
    tags(
        (name = "instructors", description = "Instructor CRUD with soft deletes and active-course guards"),
        (name = "courses", description = "Course CRUD — date-range validation, prerequisite codes, registration guards"),
        (name = "students", description = "Student CRUD with enrollment and eligibility filters"),
        (name = "registrations", description = "Registration rows and the register / unregister enrollment actions"),
        (name = "search", description = "Cross-entity substring search"),
        (name = "dashboard", description = "Active entity counts for the dashboard"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
///
/// Serves the OpenAPI JSON spec at `/openapi.json`.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json — Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
