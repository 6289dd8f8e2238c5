//! Course persistence operations.
//!
//! Prerequisite codes are stored as a JSONB array; a malformed value in
//! the database degrades to an empty list rather than failing startup.

use chrono::{DateTime, NaiveDate, Utc};
use creg_domain::entity::Course;
use sqlx::PgPool;
use uuid::Uuid;

fn prerequisites_json(record: &Course) -> Result<serde_json::Value, sqlx::Error> {
    serde_json::to_value(&record.prerequisites)
        .map_err(|e| sqlx::Error::Protocol(format!("failed to serialize prerequisites: {e}")))
}

/// Insert a new course record.
pub async fn insert(pool: &PgPool, record: &Course) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO courses
            (id, course_code, title, description, description_full,
             instructor_id, start_date, end_date, course_fee, syllabus_url,
             prerequisites, is_active, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)",
    )
    .bind(*record.id.as_uuid())
    .bind(&record.course_code)
    .bind(&record.title)
    .bind(&record.description)
    .bind(&record.description_full)
    .bind(*record.instructor_id.as_uuid())
    .bind(record.start_date)
    .bind(record.end_date)
    .bind(record.course_fee)
    .bind(&record.syllabus_url)
    .bind(prerequisites_json(record)?)
    .bind(record.is_active)
    .bind(record.created_at)
    .bind(record.updated_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Persist the full current state of a course row. The owning
/// instructor column is never rewritten.
pub async fn update(pool: &PgPool, record: &Course) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE courses
         SET course_code = $1, title = $2, description = $3,
             description_full = $4, start_date = $5, end_date = $6,
             course_fee = $7, syllabus_url = $8, prerequisites = $9,
             is_active = $10, updated_at = $11
         WHERE id = $12",
    )
    .bind(&record.course_code)
    .bind(&record.title)
    .bind(&record.description)
    .bind(&record.description_full)
    .bind(record.start_date)
    .bind(record.end_date)
    .bind(record.course_fee)
    .bind(&record.syllabus_url)
    .bind(prerequisites_json(record)?)
    .bind(record.is_active)
    .bind(record.updated_at)
    .bind(*record.id.as_uuid())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Load all courses on startup.
pub async fn load_all(pool: &PgPool) -> Result<Vec<Course>, sqlx::Error> {
    let rows = sqlx::query_as::<_, CourseRow>(
        "SELECT id, course_code, title, description, description_full,
                instructor_id, start_date, end_date, course_fee, syllabus_url,
                prerequisites, is_active, created_at, updated_at
         FROM courses ORDER BY created_at",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(CourseRow::into_record).collect())
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct CourseRow {
    id: Uuid,
    course_code: String,
    title: String,
    description: String,
    description_full: String,
    instructor_id: Uuid,
    start_date: NaiveDate,
    end_date: NaiveDate,
    course_fee: f64,
    syllabus_url: Option<String>,
    prerequisites: serde_json::Value,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CourseRow {
    fn into_record(self) -> Course {
        let prerequisites: Vec<String> = serde_json::from_value(self.prerequisites.clone())
            .unwrap_or_else(|e| {
                tracing::warn!(
                    id = %self.id,
                    error = %e,
                    "failed to deserialize course prerequisites, defaulting to empty"
                );
                Vec::new()
            });

        Course {
            id: self.id.into(),
            course_code: self.course_code,
            title: self.title,
            description: self.description,
            description_full: self.description_full,
            instructor_id: self.instructor_id.into(),
            start_date: self.start_date,
            end_date: self.end_date,
            course_fee: self.course_fee,
            syllabus_url: self.syllabus_url,
            prerequisites,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
