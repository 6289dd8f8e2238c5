//! # Dashboard Summary API
//!
//! Aggregate counts of active rows per entity, in the camelCase shape
//! the admin dashboard consumes.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use creg_domain::repo::{CourseRepo, InstructorRepo, RegistrationRepo, StudentRepo};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::state::AppState;

/// Active-row counts per entity.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub student_count: usize,
    pub instructor_count: usize,
    pub course_count: usize,
    pub registration_count: usize,
}

/// Build the dashboard router.
pub fn router() -> Router<AppState> {
    Router::new().route("/v1/dashboard-summary", get(dashboard_summary))
}

/// GET /v1/dashboard-summary — Count active rows per entity.
///
/// Soft-deleted rows are excluded; cancelled-but-active registrations
/// still count.
#[utoipa::path(
    get,
    path = "/v1/dashboard-summary",
    responses(
        (status = 200, description = "Active-row counts", body = DashboardSummary),
    ),
    tag = "dashboard"
)]
pub async fn dashboard_summary(State(state): State<AppState>) -> Json<DashboardSummary> {
    Json(DashboardSummary {
        student_count: StudentRepo::find_active(&state.store).len(),
        instructor_count: InstructorRepo::find_active(&state.store).len(),
        course_count: CourseRepo::find_active(&state.store).len(),
        registration_count: RegistrationRepo::find_active(&state.store).len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_serializes_camel_case() {
        let summary = DashboardSummary {
            student_count: 1,
            instructor_count: 2,
            course_count: 3,
            registration_count: 4,
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["studentCount"], 1);
        assert_eq!(json["instructorCount"], 2);
        assert_eq!(json["courseCount"], 3);
        assert_eq!(json["registrationCount"], 4);
    }

    #[test]
    fn router_builds() {
        let _router = router();
    }
}
