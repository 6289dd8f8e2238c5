//! Student persistence operations.

use chrono::{DateTime, Utc};
use creg_domain::entity::Student;
use sqlx::PgPool;
use uuid::Uuid;

/// Insert a new student record.
pub async fn insert(pool: &PgPool, record: &Student) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO students
            (id, name_first, name_last, email, phone, company, notes,
             address_id, is_active, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
    )
    .bind(*record.id.as_uuid())
    .bind(&record.name_first)
    .bind(&record.name_last)
    .bind(&record.email)
    .bind(&record.phone)
    .bind(&record.company)
    .bind(&record.notes)
    .bind(record.address_id.map(|a| *a.as_uuid()))
    .bind(record.is_active)
    .bind(record.created_at)
    .bind(record.updated_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Persist the full current state of a student row.
pub async fn update(pool: &PgPool, record: &Student) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE students
         SET name_first = $1, name_last = $2, email = $3, phone = $4,
             company = $5, notes = $6, address_id = $7, is_active = $8,
             updated_at = $9
         WHERE id = $10",
    )
    .bind(&record.name_first)
    .bind(&record.name_last)
    .bind(&record.email)
    .bind(&record.phone)
    .bind(&record.company)
    .bind(&record.notes)
    .bind(record.address_id.map(|a| *a.as_uuid()))
    .bind(record.is_active)
    .bind(record.updated_at)
    .bind(*record.id.as_uuid())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Load all students on startup.
pub async fn load_all(pool: &PgPool) -> Result<Vec<Student>, sqlx::Error> {
    let rows = sqlx::query_as::<_, StudentRow>(
        "SELECT id, name_first, name_last, email, phone, company, notes,
                address_id, is_active, created_at, updated_at
         FROM students ORDER BY created_at",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(StudentRow::into_record).collect())
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct StudentRow {
    id: Uuid,
    name_first: String,
    name_last: String,
    email: String,
    phone: Option<String>,
    company: Option<String>,
    notes: Option<String>,
    address_id: Option<Uuid>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl StudentRow {
    fn into_record(self) -> Student {
        Student {
            id: self.id.into(),
            name_first: self.name_first,
            name_last: self.name_last,
            email: self.email,
            phone: self.phone,
            company: self.company,
            notes: self.notes,
            address_id: self.address_id.map(Into::into),
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
