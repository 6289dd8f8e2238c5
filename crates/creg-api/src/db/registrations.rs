//! Registration persistence operations.
//!
//! Status columns store the lowercase wire strings. A partial unique
//! index (`0001_init.sql`) mirrors the in-memory uniqueness invariant:
//! at most one `registered`, active row per (student, course) pair.

use chrono::{DateTime, Utc};
use creg_core::{PaymentStatus, RegistrationStatus};
use creg_domain::entity::Registration;
use sqlx::PgPool;
use uuid::Uuid;

/// Insert a new registration row.
pub async fn insert(pool: &PgPool, record: &Registration) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO registrations
            (id, student_id, course_id, registration_status, payment_status,
             registered_at, is_active, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
    )
    .bind(*record.id.as_uuid())
    .bind(*record.student_id.as_uuid())
    .bind(*record.course_id.as_uuid())
    .bind(record.registration_status.as_str())
    .bind(record.payment_status.as_str())
    .bind(record.registered_at)
    .bind(record.is_active)
    .bind(record.created_at)
    .bind(record.updated_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Persist the full current state of a registration row.
pub async fn update(pool: &PgPool, record: &Registration) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE registrations
         SET registration_status = $1, payment_status = $2, is_active = $3,
             updated_at = $4
         WHERE id = $5",
    )
    .bind(record.registration_status.as_str())
    .bind(record.payment_status.as_str())
    .bind(record.is_active)
    .bind(record.updated_at)
    .bind(*record.id.as_uuid())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Load all registration rows on startup.
pub async fn load_all(pool: &PgPool) -> Result<Vec<Registration>, sqlx::Error> {
    let rows = sqlx::query_as::<_, RegistrationRow>(
        "SELECT id, student_id, course_id, registration_status, payment_status,
                registered_at, is_active, created_at, updated_at
         FROM registrations ORDER BY created_at",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(RegistrationRow::into_record).collect())
}

fn parse_status<T: serde::de::DeserializeOwned>(id: Uuid, column: &str, raw: &str) -> Option<T> {
    match serde_json::from_value(serde_json::Value::String(raw.to_string())) {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!(%id, column, raw, error = %e, "unknown status value in database");
            None
        }
    }
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct RegistrationRow {
    id: Uuid,
    student_id: Uuid,
    course_id: Uuid,
    registration_status: String,
    payment_status: String,
    registered_at: DateTime<Utc>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl RegistrationRow {
    fn into_record(self) -> Registration {
        let registration_status =
            parse_status(self.id, "registration_status", &self.registration_status)
                .unwrap_or(RegistrationStatus::Cancelled);
        let payment_status = parse_status(self.id, "payment_status", &self.payment_status)
            .unwrap_or(PaymentStatus::Pending);

        Registration {
            id: self.id.into(),
            student_id: self.student_id.into(),
            course_id: self.course_id.into(),
            registration_status,
            payment_status,
            registered_at: self.registered_at,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
