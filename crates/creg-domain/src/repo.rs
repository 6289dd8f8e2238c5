//! # Repository Traits
//!
//! Per-entity repository abstractions injected into the Prerequisite
//! Resolver, the Registration State Machine, and the Soft-Delete Guard.
//! Keeping the seams here means the domain logic never touches a concrete
//! store — the in-memory [`crate::store::EntityStore`] implements all of
//! them, and tests can substitute fixtures.
//!
//! `find_active` filters on `is_active = true`; `find_by_id` does not, so
//! soft-deleted rows remain addressable where an explicit override is
//! wanted.

use creg_core::{CourseId, InstructorId, RegistrationId, StudentId};

use crate::entity::{Course, Instructor, Registration, Student};

/// Raised by [`RegistrationRepo::insert_live`] when an active `registered`
/// row for the pair already exists. The check-and-insert is atomic in the
/// store, making the at-most-one-live-row rule a storage invariant rather
/// than only an application-level check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuplicateRegistration;

pub trait InstructorRepo {
    fn find_by_id(&self, id: InstructorId) -> Option<Instructor>;
    fn find_active(&self) -> Vec<Instructor>;
    /// Whether another active instructor already uses this email.
    fn email_taken(&self, email: &str, exclude: Option<InstructorId>) -> bool;
    /// Insert or replace, returning the stored record.
    fn save(&self, instructor: Instructor) -> Instructor;
}

pub trait StudentRepo {
    fn find_by_id(&self, id: StudentId) -> Option<Student>;
    fn find_active(&self) -> Vec<Student>;
    fn email_taken(&self, email: &str, exclude: Option<StudentId>) -> bool;
    fn save(&self, student: Student) -> Student;
}

pub trait CourseRepo {
    fn find_by_id(&self, id: CourseId) -> Option<Course>;
    fn find_active(&self) -> Vec<Course>;
    /// Look up a course by its course_code. Deliberately ignores the
    /// active flag — prerequisite resolution matches any instance of the
    /// code (preserved source behavior).
    fn find_by_code(&self, code: &str) -> Option<Course>;
    /// All courses owned by the instructor, regardless of active flag.
    fn for_instructor(&self, id: InstructorId) -> Vec<Course>;
    fn code_taken(&self, code: &str, exclude: Option<CourseId>) -> bool;
    fn save(&self, course: Course) -> Course;
}

pub trait RegistrationRepo {
    fn find_by_id(&self, id: RegistrationId) -> Option<Registration>;
    fn find_active(&self) -> Vec<Registration>;
    /// All rows for the student, regardless of active flag or status.
    fn for_student(&self, id: StudentId) -> Vec<Registration>;
    /// Active rows referencing the course, regardless of status.
    fn active_for_course(&self, id: CourseId) -> Vec<Registration>;
    /// Whether an active `registered` row exists for the pair.
    fn has_live(&self, student: StudentId, course: CourseId) -> bool;
    /// Atomically verify no live row exists for the pair and insert a
    /// fresh `registered` row.
    fn insert_live(
        &self,
        student: StudentId,
        course: CourseId,
    ) -> Result<Registration, DuplicateRegistration>;
    /// Atomically find the live row for the pair and set its status to
    /// `cancelled`. The row stays `is_active`. Returns `None` when no live
    /// row exists (cancelled and missing are indistinguishable).
    fn cancel_live(&self, student: StudentId, course: CourseId) -> Option<Registration>;
    fn save(&self, registration: Registration) -> Registration;
}
