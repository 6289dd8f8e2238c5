//! # Entity Records
//!
//! Persisted record types for the Entity Store. Every record carries an
//! `is_active` flag (soft delete — never a physical row removal) and
//! `created_at` / `updated_at` timestamps.

use chrono::{DateTime, NaiveDate, Utc};
use creg_core::{
    AddressId, CourseId, DepartmentId, InstructorId, PaymentStatus, RegistrationId,
    RegistrationStatus, StudentId,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// An academic department. Stored for instructor affiliation; has no
/// routes of its own.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Department {
    pub id: DepartmentId,
    /// Unique department name.
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A postal address referenced by instructors and students.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Address {
    pub id: AddressId,
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An instructor. Owns zero or more courses; deactivation is gated on
/// those courses by the Soft-Delete Guard.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Instructor {
    pub id: InstructorId,
    pub department_id: Option<DepartmentId>,
    pub address_id: Option<AddressId>,
    pub name_first: String,
    pub name_last: String,
    /// Unique across instructors.
    pub email: String,
    pub bio: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Instructor {
    /// Display name, `"First Last"`.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name_first, self.name_last)
    }
}

/// A course offering.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Course {
    pub id: CourseId,
    /// Unique course code, e.g. `"BASICS-101"`. Prerequisites reference
    /// courses by this string, not by id.
    pub course_code: String,
    pub title: String,
    pub description: String,
    pub description_full: String,
    /// Owning instructor. Required; immutable after creation.
    pub instructor_id: InstructorId,
    pub start_date: NaiveDate,
    /// Always `>= start_date`.
    pub end_date: NaiveDate,
    /// Non-negative.
    pub course_fee: f64,
    pub syllabus_url: Option<String>,
    /// Ordered course codes that must be completed before enrolling.
    /// Entries may reference codes that no longer (or never did) exist;
    /// such entries always count as unsatisfied.
    #[serde(default)]
    pub prerequisites: Vec<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Course {
    /// Whether the course is running on the given date (inclusive range).
    pub fn runs_on(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// Whether the course is still active or upcoming as of `today`.
    pub fn active_or_upcoming(&self, today: NaiveDate) -> bool {
        self.end_date >= today
    }
}

/// A student.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Student {
    pub id: StudentId,
    pub name_first: String,
    pub name_last: String,
    /// Unique across students.
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub notes: Option<String>,
    pub address_id: Option<AddressId>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Student {
    /// Display name, `"First Last"`.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name_first, self.name_last)
    }
}

/// One registration row for a (student, course) pair.
///
/// A pair may accumulate many rows over time — each successful register
/// action creates a fresh row, and cancellation mutates only
/// `registration_status`. At most one row per pair may be
/// `registered` and `is_active` at once; the store enforces this
/// atomically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Registration {
    pub id: RegistrationId,
    pub student_id: StudentId,
    pub course_id: CourseId,
    pub registration_status: RegistrationStatus,
    pub payment_status: PaymentStatus,
    pub registered_at: DateTime<Utc>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Registration {
    /// Create a fresh `registered` / `pending` / active row for the pair.
    pub fn new_registered(student_id: StudentId, course_id: CourseId) -> Self {
        let now = Utc::now();
        Self {
            id: RegistrationId::new(),
            student_id,
            course_id,
            registration_status: RegistrationStatus::Registered,
            payment_status: PaymentStatus::Pending,
            registered_at: now,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether this row is a live enrollment: active and `registered`.
    pub fn is_live(&self) -> bool {
        self.is_active && self.registration_status == RegistrationStatus::Registered
    }
}
