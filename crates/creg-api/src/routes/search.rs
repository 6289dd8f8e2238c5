//! # Cross-Entity Search API
//!
//! Single-term, case-insensitive substring search across the four main
//! entities. Only active rows are searched; a term that matches nothing
//! returns four empty arrays, not an error.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use creg_domain::entity::{Instructor, Student};
use creg_domain::repo::{CourseRepo, InstructorRepo, RegistrationRepo, StudentRepo};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::routes::courses::{course_view, CourseView};
use crate::routes::registrations::{registration_view, RegistrationView};
use crate::state::AppState;

#[derive(Debug, Deserialize, Default, ToSchema)]
pub struct SearchParams {
    /// Search term. Required and non-empty.
    pub q: Option<String>,
}

/// Grouped search results, one array per entity.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SearchResults {
    pub students: Vec<Student>,
    pub instructors: Vec<Instructor>,
    pub courses: Vec<CourseView>,
    pub registrations: Vec<RegistrationView>,
}

/// Build the search router.
pub fn router() -> Router<AppState> {
    Router::new().route("/v1/search", get(search))
}

fn contains_term(haystack: &str, term: &str) -> bool {
    haystack.to_lowercase().contains(term)
}

/// GET /v1/search?q=term — Search students, instructors, courses, and
/// registrations.
///
/// Students and instructors match on first name, last name, or email;
/// courses on title, course code, or description; registrations on their
/// status string.
#[utoipa::path(
    get,
    path = "/v1/search",
    params(("q" = String, Query, description = "Case-insensitive search term")),
    responses(
        (status = 200, description = "Grouped search results", body = SearchResults),
        (status = 400, description = "Missing or empty search term", body = crate::error::ErrorBody),
    ),
    tag = "search"
)]
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResults>, AppError> {
    let term = params
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| {
            AppError::Validation("Missing search query parameter.".to_string())
        })?
        .to_lowercase();

    let students = StudentRepo::find_active(&state.store)
        .into_iter()
        .filter(|s| {
            contains_term(&s.name_first, &term)
                || contains_term(&s.name_last, &term)
                || contains_term(&s.email, &term)
        })
        .collect();

    let instructors = InstructorRepo::find_active(&state.store)
        .into_iter()
        .filter(|i| {
            contains_term(&i.name_first, &term)
                || contains_term(&i.name_last, &term)
                || contains_term(&i.email, &term)
        })
        .collect();

    let courses = CourseRepo::find_active(&state.store)
        .into_iter()
        .filter(|c| {
            contains_term(&c.title, &term)
                || contains_term(&c.course_code, &term)
                || contains_term(&c.description, &term)
        })
        .map(|c| course_view(&state, c))
        .collect();

    let registrations = RegistrationRepo::find_active(&state.store)
        .into_iter()
        .filter(|r| contains_term(r.registration_status.as_str(), &term))
        .map(|r| registration_view(&state, r))
        .collect();

    Ok(Json(SearchResults {
        students,
        instructors,
        courses,
        registrations,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_term_is_case_insensitive() {
        assert!(contains_term("Ash Ketchum", "ketch"));
        assert!(contains_term("BASICS-101", "basics"));
        assert!(!contains_term("Ash", "misty"));
    }

    #[test]
    fn router_builds() {
        let _router = router();
    }
}
