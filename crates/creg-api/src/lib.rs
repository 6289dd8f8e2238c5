//! # creg-api — Axum API for the Course Registration Stack
//!
//! HTTP surface over the `creg-domain` Entity Store: entity CRUD for
//! instructors, courses, students, and registrations, the register /
//! unregister enrollment actions, cross-entity search, and the dashboard
//! summary.
//!
//! ## API Surface
//!
//! | Prefix                   | Module                    |
//! |--------------------------|---------------------------|
//! | `/v1/instructors/*`      | [`routes::instructors`]   |
//! | `/v1/courses/*`          | [`routes::courses`]       |
//! | `/v1/students/*`         | [`routes::students`]      |
//! | `/v1/registrations/*`    | [`routes::registrations`] |
//! | `/v1/search`             | [`routes::search`]        |
//! | `/v1/dashboard-summary`  | [`routes::dashboard`]     |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → MetricsMiddleware → Handler
//! ```
//!
//! ## OpenAPI
//!
//! Auto-generated OpenAPI spec via utoipa derive macros at `/openapi.json`.

pub mod db;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::response::IntoResponse;
use axum::{Extension, Router};
use creg_core::RegistrationStatus;
use creg_domain::repo::{CourseRepo, InstructorRepo, RegistrationRepo, StudentRepo};
use tower_http::trace::TraceLayer;

use crate::middleware::metrics::ApiMetrics;
use crate::state::AppState;

/// Check if metrics are enabled via the `CREG_METRICS_ENABLED` env var.
/// Defaults to `true` when the variable is absent or set to anything
/// other than `"false"`.
fn metrics_enabled() -> bool {
    std::env::var("CREG_METRICS_ENABLED")
        .map(|v| v.to_lowercase() != "false")
        .unwrap_or(true)
}

/// Assemble the full application router with all routes and middleware.
///
/// Health probes (`/health/*`) and `/metrics` sit outside the metrics
/// middleware so probe traffic does not pollute request counters.
pub fn app(state: AppState) -> Router {
    let metrics = ApiMetrics::new();
    let metrics_on = metrics_enabled();

    // Body size limit: 2 MiB. Prevents OOM from oversized request bodies.
    let mut api = Router::new()
        .merge(routes::instructors::router())
        .merge(routes::courses::router())
        .merge(routes::students::router())
        .merge(routes::registrations::router())
        .merge(routes::search::router())
        .merge(routes::dashboard::router())
        .merge(openapi::router())
        .layer(DefaultBodyLimit::max(2 * 1024 * 1024));

    if metrics_on {
        api = api
            .layer(from_fn(middleware::metrics::metrics_middleware))
            .layer(Extension(metrics.clone()));
    }

    let api = api.layer(TraceLayer::new_for_http()).with_state(state.clone());

    let mut probes = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness));

    if metrics_on {
        probes = probes
            .route("/metrics", axum::routing::get(prometheus_metrics))
            .layer(Extension(metrics));
    }

    let probes = probes.with_state(state);

    Router::new().merge(probes).merge(api)
}

/// GET /metrics — Prometheus metrics scrape endpoint.
///
/// Updates domain gauges from the current store contents on each scrape
/// (pull model), then encodes everything in Prometheus text format.
async fn prometheus_metrics(
    State(state): State<AppState>,
    Extension(metrics): Extension<ApiMetrics>,
) -> impl IntoResponse {
    metrics
        .students_active()
        .set(StudentRepo::find_active(&state.store).len() as f64);
    metrics
        .instructors_active()
        .set(InstructorRepo::find_active(&state.store).len() as f64);
    metrics
        .courses_active()
        .set(CourseRepo::find_active(&state.store).len() as f64);

    let registrations = RegistrationRepo::find_active(&state.store);
    metrics
        .registrations_active()
        .set(registrations.len() as f64);

    metrics.registrations_by_status().reset();
    for status in [
        RegistrationStatus::Registered,
        RegistrationStatus::Waitlisted,
        RegistrationStatus::Cancelled,
    ] {
        let count = registrations
            .iter()
            .filter(|r| r.registration_status == status)
            .count();
        metrics
            .registrations_by_status()
            .with_label_values(&[status.as_str()])
            .set(count as f64);
    }

    match metrics.gather_and_encode() {
        Ok(body) => (
            StatusCode::OK,
            [(
                axum::http::header::CONTENT_TYPE,
                "text/plain; version=0.0.4; charset=utf-8",
            )],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to encode Prometheus metrics: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, e).into_response()
        }
    }
}

/// Liveness probe — always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe — verifies the application is ready to serve traffic.
///
/// Checks that the in-memory stores are accessible and, when a pool is
/// configured, that the database answers a trivial query. Returns 200
/// "ready" or 503 with a diagnostic message.
async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    let _ = state.store.instructors.len();
    let _ = state.store.courses.len();
    let _ = state.store.students.len();
    let _ = state.store.registrations.len();

    if let Some(pool) = &state.db_pool {
        if let Err(e) = sqlx::query("SELECT 1").execute(pool).await {
            tracing::warn!("Database health check failed: {e}");
            return (StatusCode::SERVICE_UNAVAILABLE, "database unreachable").into_response();
        }
    }

    (StatusCode::OK, "ready").into_response()
}
