//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor.
//!
//! AppState wraps the in-memory [`EntityStore`] (the system of record for
//! request handling), an optional PostgreSQL pool for durable write-through
//! persistence, and the notification collaborator invoked after committed
//! register / unregister transitions.

use std::sync::Arc;

use creg_domain::notify::{EmailStubNotifier, Notifier};
use creg_domain::store::EntityStore;
use sqlx::PgPool;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

/// Shared application state accessible to all route handlers.
///
/// Clone-friendly: the store shares its maps via `Arc` internals, and the
/// pool and notifier are reference-counted handles.
#[derive(Clone)]
pub struct AppState {
    /// In-memory entity stores. All reads and the authoritative
    /// registration-uniqueness check run against these.
    pub store: EntityStore,

    /// PostgreSQL connection pool for durable persistence.
    /// When `Some`, mutations are written through to Postgres in addition
    /// to the in-memory stores. When `None`, the API runs in-memory only.
    pub db_pool: Option<PgPool>,

    /// Enrollment notification collaborator. Invoked post-commit;
    /// failures never affect the request outcome.
    pub notifier: Arc<dyn Notifier>,

    pub config: AppConfig,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("store", &self.store)
            .field("db_pool", &self.db_pool.as_ref().map(|_| "PgPool"))
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Create a new application state with default configuration, no
    /// database, and the logging email stub as notifier.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default(), None)
    }

    /// Create a new application state with the given configuration and
    /// optional database pool.
    pub fn with_config(config: AppConfig, db_pool: Option<PgPool>) -> Self {
        Self {
            store: EntityStore::new(),
            db_pool,
            notifier: Arc::new(EmailStubNotifier),
            config,
        }
    }

    /// Replace the notification collaborator. Used by tests to observe
    /// post-commit notifications.
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Hydrate in-memory stores from the database.
    ///
    /// Called once on startup when a database pool is available, so that
    /// read operations stay fast and synchronous afterwards.
    pub async fn hydrate_from_db(&self) -> Result<(), String> {
        let pool = match &self.db_pool {
            Some(pool) => pool,
            None => return Ok(()),
        };

        let instructors = crate::db::instructors::load_all(pool)
            .await
            .map_err(|e| format!("failed to load instructors: {e}"))?;
        let instructor_count = instructors.len();
        for record in instructors {
            self.store.instructors.insert(*record.id.as_uuid(), record);
        }

        let students = crate::db::students::load_all(pool)
            .await
            .map_err(|e| format!("failed to load students: {e}"))?;
        let student_count = students.len();
        for record in students {
            self.store.students.insert(*record.id.as_uuid(), record);
        }

        let courses = crate::db::courses::load_all(pool)
            .await
            .map_err(|e| format!("failed to load courses: {e}"))?;
        let course_count = courses.len();
        for record in courses {
            self.store.courses.insert(*record.id.as_uuid(), record);
        }

        let registrations = crate::db::registrations::load_all(pool)
            .await
            .map_err(|e| format!("failed to load registrations: {e}"))?;
        let registration_count = registrations.len();
        for record in registrations {
            self.store
                .registrations
                .insert(*record.id.as_uuid(), record);
        }

        tracing::info!(
            instructors = instructor_count,
            students = student_count,
            courses = course_count,
            registrations = registration_count,
            "Hydrated in-memory stores from database"
        );

        Ok(())
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
