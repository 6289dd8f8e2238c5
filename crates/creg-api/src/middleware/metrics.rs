//! # Prometheus Metrics
//!
//! HTTP-level metrics (request counts, latency, errors) are recorded in
//! middleware. Domain-level gauges (active entity counts, registrations
//! by status) are updated on each `/metrics` scrape (pull model) — see
//! the metrics handler in `lib.rs`.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use prometheus::{
    core::Collector, Encoder, Gauge, GaugeVec, HistogramVec, IntCounterVec, Opts, Registry,
    TextEncoder,
};

/// Shared metrics state backed by a Prometheus registry.
#[derive(Clone)]
pub struct ApiMetrics {
    inner: Arc<Inner>,
}

struct Inner {
    registry: Registry,

    // -- HTTP middleware metrics (push model) --
    http_requests_total: IntCounterVec,
    http_request_duration_seconds: HistogramVec,
    http_errors_total: IntCounterVec,

    // -- Domain gauges (pull model, updated on /metrics scrape) --
    students_active: Gauge,
    instructors_active: Gauge,
    courses_active: Gauge,
    registrations_active: Gauge,
    registrations_by_status: GaugeVec,
}

impl std::fmt::Debug for ApiMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiMetrics")
            .field("requests", &self.requests())
            .field("errors", &self.errors())
            .finish()
    }
}

impl ApiMetrics {
    /// Create a new metrics instance with a fresh Prometheus registry.
    pub fn new() -> Self {
        let registry = Registry::new();

        let http_requests_total = IntCounterVec::new(
            Opts::new("creg_http_requests_total", "Total HTTP requests"),
            &["method", "path", "status"],
        )
        .expect("metric can be created");

        let http_request_duration_seconds = HistogramVec::new(
            prometheus::HistogramOpts::new(
                "creg_http_request_duration_seconds",
                "HTTP request duration in seconds",
            )
            .buckets(vec![
                0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ]),
            &["method", "path"],
        )
        .expect("metric can be created");

        let http_errors_total = IntCounterVec::new(
            Opts::new("creg_http_errors_total", "Total HTTP errors (4xx and 5xx)"),
            &["method", "path", "status"],
        )
        .expect("metric can be created");

        let students_active = Gauge::new("creg_students_active", "Active students")
            .expect("metric can be created");
        let instructors_active = Gauge::new("creg_instructors_active", "Active instructors")
            .expect("metric can be created");
        let courses_active =
            Gauge::new("creg_courses_active", "Active courses").expect("metric can be created");
        let registrations_active = Gauge::new(
            "creg_registrations_active",
            "Active registration rows",
        )
        .expect("metric can be created");
        let registrations_by_status = GaugeVec::new(
            Opts::new(
                "creg_registrations_by_status",
                "Active registration rows by status",
            ),
            &["status"],
        )
        .expect("metric can be created");

        registry
            .register(Box::new(http_requests_total.clone()))
            .expect("metric can be registered");
        registry
            .register(Box::new(http_request_duration_seconds.clone()))
            .expect("metric can be registered");
        registry
            .register(Box::new(http_errors_total.clone()))
            .expect("metric can be registered");
        registry
            .register(Box::new(students_active.clone()))
            .expect("metric can be registered");
        registry
            .register(Box::new(instructors_active.clone()))
            .expect("metric can be registered");
        registry
            .register(Box::new(courses_active.clone()))
            .expect("metric can be registered");
        registry
            .register(Box::new(registrations_active.clone()))
            .expect("metric can be registered");
        registry
            .register(Box::new(registrations_by_status.clone()))
            .expect("metric can be registered");

        Self {
            inner: Arc::new(Inner {
                registry,
                http_requests_total,
                http_request_duration_seconds,
                http_errors_total,
                students_active,
                instructors_active,
                courses_active,
                registrations_active,
                registrations_by_status,
            }),
        }
    }

    /// Current total request count (sum across all labels).
    pub fn requests(&self) -> u64 {
        let mut total = 0u64;
        let families = self.inner.http_requests_total.collect();
        for mf in &families {
            for m in mf.get_metric() {
                total += m.get_counter().get_value() as u64;
            }
        }
        total
    }

    /// Current total error count (sum across all labels).
    pub fn errors(&self) -> u64 {
        let mut total = 0u64;
        let families = self.inner.http_errors_total.collect();
        for mf in &families {
            for m in mf.get_metric() {
                total += m.get_counter().get_value() as u64;
            }
        }
        total
    }

    /// Record an HTTP request (called by the middleware).
    fn record_request(&self, method: &str, path: &str, status: u16, duration_secs: f64) {
        let status_str = status.to_string();
        self.inner
            .http_requests_total
            .with_label_values(&[method, path, &status_str])
            .inc();

        self.inner
            .http_request_duration_seconds
            .with_label_values(&[method, path])
            .observe(duration_secs);

        if status >= 400 {
            self.inner
                .http_errors_total
                .with_label_values(&[method, path, &status_str])
                .inc();
        }
    }

    // -- Domain gauge accessors (used by the /metrics handler) --

    pub fn students_active(&self) -> &Gauge {
        &self.inner.students_active
    }

    pub fn instructors_active(&self) -> &Gauge {
        &self.inner.instructors_active
    }

    pub fn courses_active(&self) -> &Gauge {
        &self.inner.courses_active
    }

    pub fn registrations_active(&self) -> &Gauge {
        &self.inner.registrations_active
    }

    pub fn registrations_by_status(&self) -> &GaugeVec {
        &self.inner.registrations_by_status
    }

    /// Gather all metrics and encode to Prometheus text format.
    pub fn gather_and_encode(&self) -> Result<String, String> {
        let encoder = TextEncoder::new();
        let metric_families = self.inner.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(|e| format!("failed to encode metrics: {e}"))?;
        String::from_utf8(buffer)
            .map_err(|e| format!("metrics encoding produced invalid UTF-8: {e}"))
    }
}

impl Default for ApiMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalize a request path by replacing UUID segments with `{id}`.
///
/// Prevents cardinality explosion in Prometheus labels. UUIDs are
/// detected as 32-hex-char strings with optional hyphens.
fn normalize_path(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            if segment.len() == 36
                && segment.chars().enumerate().all(|(i, c)| {
                    if i == 8 || i == 13 || i == 18 || i == 23 {
                        c == '-'
                    } else {
                        c.is_ascii_hexdigit()
                    }
                })
            {
                "{id}"
            } else if segment.len() == 32 && segment.chars().all(|c| c.is_ascii_hexdigit()) {
                "{id}"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Middleware that records HTTP request metrics via Prometheus.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let metrics = request.extensions().get::<ApiMetrics>().cloned();
    let method = request.method().to_string();
    let path = normalize_path(request.uri().path());
    let start = Instant::now();

    let response = next.run(request).await;

    if let Some(m) = metrics {
        let duration = start.elapsed().as_secs_f64();
        let status = response.status().as_u16();
        m.record_request(&method, &path, status, duration);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_start_at_zero() {
        let m = ApiMetrics::new();
        assert_eq!(m.requests(), 0);
        assert_eq!(m.errors(), 0);
    }

    #[test]
    fn requests_and_errors_increment_independently() {
        let m = ApiMetrics::new();
        for _ in 0..5 {
            m.record_request("GET", "/v1/students", 200, 0.01);
        }
        m.record_request("POST", "/v1/registrations/register", 400, 0.05);
        m.record_request("GET", "/v1/courses", 500, 0.1);
        assert_eq!(m.requests(), 7);
        assert_eq!(m.errors(), 2);
    }

    #[test]
    fn clone_shares_underlying_counters() {
        let m = ApiMetrics::new();
        let clone = m.clone();

        m.record_request("GET", "/v1/students", 200, 0.01);
        assert_eq!(clone.requests(), 1, "clone should see the same counter");

        clone.record_request("GET", "/v1/courses", 500, 0.01);
        assert_eq!(m.errors(), 1, "original should see clone's increment");
    }

    #[test]
    fn gather_and_encode_produces_text() {
        let m = ApiMetrics::new();
        m.record_request("GET", "/v1/students", 200, 0.01);
        m.students_active().set(3.0);
        m.registrations_by_status()
            .with_label_values(&["registered"])
            .set(2.0);

        let output = m.gather_and_encode().unwrap();
        assert!(output.contains("creg_http_requests_total"));
        assert!(output.contains("creg_students_active"));
        assert!(output.contains("creg_registrations_by_status"));
    }

    #[test]
    fn normalize_path_replaces_uuid_segments() {
        let path = "/v1/students/550e8400-e29b-41d4-a716-446655440000";
        assert_eq!(normalize_path(path), "/v1/students/{id}");

        let path = "/v1/courses/550e8400e29b41d4a716446655440000";
        assert_eq!(normalize_path(path), "/v1/courses/{id}");
    }

    #[test]
    fn normalize_path_preserves_plain_segments() {
        assert_eq!(
            normalize_path("/v1/dashboard-summary"),
            "/v1/dashboard-summary"
        );
        assert_eq!(
            normalize_path("/v1/registrations/register"),
            "/v1/registrations/register"
        );
    }
}
