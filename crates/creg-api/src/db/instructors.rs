//! Instructor persistence operations.

use chrono::{DateTime, Utc};
use creg_domain::entity::Instructor;
use sqlx::PgPool;
use uuid::Uuid;

/// Insert a new instructor record.
pub async fn insert(pool: &PgPool, record: &Instructor) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO instructors
            (id, department_id, address_id, name_first, name_last, email, bio,
             is_active, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
    )
    .bind(*record.id.as_uuid())
    .bind(record.department_id.map(|d| *d.as_uuid()))
    .bind(record.address_id.map(|a| *a.as_uuid()))
    .bind(&record.name_first)
    .bind(&record.name_last)
    .bind(&record.email)
    .bind(&record.bio)
    .bind(record.is_active)
    .bind(record.created_at)
    .bind(record.updated_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Persist the full current state of an instructor row.
pub async fn update(pool: &PgPool, record: &Instructor) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE instructors
         SET department_id = $1, address_id = $2, name_first = $3,
             name_last = $4, email = $5, bio = $6, is_active = $7,
             updated_at = $8
         WHERE id = $9",
    )
    .bind(record.department_id.map(|d| *d.as_uuid()))
    .bind(record.address_id.map(|a| *a.as_uuid()))
    .bind(&record.name_first)
    .bind(&record.name_last)
    .bind(&record.email)
    .bind(&record.bio)
    .bind(record.is_active)
    .bind(record.updated_at)
    .bind(*record.id.as_uuid())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Load all instructors on startup.
pub async fn load_all(pool: &PgPool) -> Result<Vec<Instructor>, sqlx::Error> {
    let rows = sqlx::query_as::<_, InstructorRow>(
        "SELECT id, department_id, address_id, name_first, name_last, email,
                bio, is_active, created_at, updated_at
         FROM instructors ORDER BY created_at",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(InstructorRow::into_record).collect())
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct InstructorRow {
    id: Uuid,
    department_id: Option<Uuid>,
    address_id: Option<Uuid>,
    name_first: String,
    name_last: String,
    email: String,
    bio: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl InstructorRow {
    fn into_record(self) -> Instructor {
        Instructor {
            id: self.id.into(),
            department_id: self.department_id.map(Into::into),
            address_id: self.address_id.map(Into::into),
            name_first: self.name_first,
            name_last: self.name_last,
            email: self.email,
            bio: self.bio,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
