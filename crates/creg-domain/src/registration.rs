//! # Registration State Machine
//!
//! Governs the register / unregister transitions for a (student, course)
//! pair. The pair's state is derived from its latest-intent row — rows are
//! historical, so a pair accumulates one row per successful register action
//! and cancellation mutates only the row's status.
//!
//! Handlers invoke these operations against the repository traits and emit
//! the returned [`RegistrationEvent`] to the notification collaborator
//! *after* the store commit (deferred callback — a notification failure can
//! never affect the transaction result).

use creg_core::{CourseId, StudentId};
use thiserror::Error;

use crate::entity::{Course, Registration, Student};
use crate::prereq::unmet_prerequisites;
use crate::repo::{CourseRepo, RegistrationRepo, StudentRepo};

/// Why a register / unregister transition was refused.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistrationError {
    /// An active `registered` row already exists for the pair.
    #[error("Student is already registered for this course.")]
    AlreadyRegistered,

    /// One or more prerequisite codes are unsatisfied, in course order.
    #[error("Student is missing required prerequisites: {}", .0.join(", "))]
    MissingPrerequisites(Vec<String>),

    /// The student id did not resolve to a stored record. Surfaced as an
    /// unexpected error by the API layer (preserved source behavior).
    #[error("student {0} not found")]
    StudentNotFound(StudentId),

    /// The course id did not resolve to a stored record. Surfaced as an
    /// unexpected error by the API layer (preserved source behavior).
    #[error("course {0} not found")]
    CourseNotFound(CourseId),

    /// No active `registered` row exists for the pair — a cancelled row
    /// and a missing row are indistinguishable here.
    #[error("Registration not found.")]
    NotRegistered,
}

/// A committed transition, handed to the notification collaborator after
/// the store write. Carries snapshots of the student and course so the
/// notifier needs no further reads.
#[derive(Debug, Clone)]
pub enum RegistrationEvent {
    Registered { student: Student, course: Course },
    Unregistered { student: Student, course: Course },
}

/// Register `student` for `course`.
///
/// Checks run in order: duplicate live row, unmet prerequisites. On
/// success a fresh `registered` / `pending` / active row is inserted; the
/// duplicate check is re-run atomically inside the insert, so two racing
/// register calls cannot both commit.
pub fn register<R>(
    repos: &R,
    student_id: StudentId,
    course_id: CourseId,
) -> Result<(Registration, RegistrationEvent), RegistrationError>
where
    R: StudentRepo + CourseRepo + RegistrationRepo,
{
    let student = StudentRepo::find_by_id(repos, student_id)
        .ok_or(RegistrationError::StudentNotFound(student_id))?;
    let course = CourseRepo::find_by_id(repos, course_id)
        .ok_or(RegistrationError::CourseNotFound(course_id))?;

    if repos.has_live(student_id, course_id) {
        return Err(RegistrationError::AlreadyRegistered);
    }

    let unmet = unmet_prerequisites(repos, student_id, &course);
    if !unmet.is_empty() {
        return Err(RegistrationError::MissingPrerequisites(unmet));
    }

    let row = repos
        .insert_live(student_id, course_id)
        .map_err(|_| RegistrationError::AlreadyRegistered)?;

    let event = RegistrationEvent::Registered { student, course };
    Ok((row, event))
}

/// Unregister `student` from `course`.
///
/// Sets the pair's live row to `cancelled`; the row stays `is_active` and
/// queryable. Fails with [`RegistrationError::NotRegistered`] when no live
/// row exists.
pub fn unregister<R>(
    repos: &R,
    student_id: StudentId,
    course_id: CourseId,
) -> Result<(Registration, RegistrationEvent), RegistrationError>
where
    R: StudentRepo + CourseRepo + RegistrationRepo,
{
    let row = repos
        .cancel_live(student_id, course_id)
        .ok_or(RegistrationError::NotRegistered)?;

    // Lookups after the cancel: a pair can only hold a live row if both
    // entities existed when it was created.
    let student = StudentRepo::find_by_id(repos, student_id)
        .ok_or(RegistrationError::StudentNotFound(student_id))?;
    let course = CourseRepo::find_by_id(repos, course_id)
        .ok_or(RegistrationError::CourseNotFound(course_id))?;

    let event = RegistrationEvent::Unregistered { student, course };
    Ok((row, event))
}
