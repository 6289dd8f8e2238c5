//! # Database Persistence Layer
//!
//! PostgreSQL persistence via SQLx. The layer is **optional**: when
//! `DATABASE_URL` is set, every mutation is written through to Postgres
//! and the in-memory stores are hydrated from it on startup. When absent,
//! the API runs in-memory only (suitable for development and testing).
//!
//! The in-memory Entity Store remains the system of record for request
//! handling; Postgres exists to survive restarts.

pub mod courses;
pub mod instructors;
pub mod registrations;
pub mod students;

use sqlx::postgres::{PgPool, PgPoolOptions};

/// Initialize the database connection pool and run migrations.
///
/// Returns `None` if `DATABASE_URL` is not set (in-memory-only mode).
/// Returns `Err` if the URL is set but the connection or migration fails.
pub async fn init_pool() -> Result<Option<PgPool>, sqlx::Error> {
    let url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            tracing::warn!(
                "DATABASE_URL not set — running in-memory only mode. \
                 State will not survive restarts."
            );
            return Ok(None);
        }
    };

    let pool = PgPoolOptions::new()
        .max_connections(20)
        .min_connections(2)
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect(&url)
        .await?;

    tracing::info!("Connected to PostgreSQL");

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    Ok(Some(pool))
}
