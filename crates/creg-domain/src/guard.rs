//! # Soft-Delete Guard
//!
//! Referential-safety checks that run before an entity may be marked
//! inactive. Deletion at the domain layer always means `is_active = false`;
//! the guard decides whether that flip is allowed right now.

use chrono::NaiveDate;
use creg_core::{CourseId, InstructorId, RegistrationStatus, StudentId};
use thiserror::Error;

use crate::repo::{CourseRepo, RegistrationRepo};

/// A guard rejection with a user-facing reason. The caller maps it to an
/// error response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct Blocked {
    pub reason: &'static str,
}

impl Blocked {
    const INSTRUCTOR: Self = Self {
        reason: "Cannot delete instructor with active or upcoming courses.",
    };
    const STUDENT: Self = Self {
        reason: "Cannot delete student with active or upcoming course registrations.",
    };
    const COURSE: Self = Self {
        reason: "Cannot delete course with existing student registrations.",
    };
}

/// An instructor may be deactivated unless any active course they own is
/// still running or upcoming (`end_date >= today`).
pub fn can_deactivate_instructor<R>(
    repos: &R,
    instructor: InstructorId,
    today: NaiveDate,
) -> Result<(), Blocked>
where
    R: CourseRepo,
{
    let blocked = repos
        .for_instructor(instructor)
        .iter()
        .any(|c| c.is_active && c.active_or_upcoming(today));
    if blocked {
        Err(Blocked::INSTRUCTOR)
    } else {
        Ok(())
    }
}

/// A student may be deactivated unless any of their `registered` rows
/// points at a course that is still running or upcoming.
pub fn can_deactivate_student<R>(
    repos: &R,
    student: StudentId,
    today: NaiveDate,
) -> Result<(), Blocked>
where
    R: CourseRepo + RegistrationRepo,
{
    let blocked = repos
        .for_student(student)
        .iter()
        .filter(|r| r.registration_status == RegistrationStatus::Registered)
        .filter_map(|r| CourseRepo::find_by_id(repos, r.course_id))
        .any(|c| c.active_or_upcoming(today));
    if blocked {
        Err(Blocked::STUDENT)
    } else {
        Ok(())
    }
}

/// A course may be deactivated unless any active registration references
/// it — regardless of the registration's status.
pub fn can_deactivate_course<R>(repos: &R, course: CourseId) -> Result<(), Blocked>
where
    R: RegistrationRepo,
{
    if repos.active_for_course(course).is_empty() {
        Ok(())
    } else {
        Err(Blocked::COURSE)
    }
}

/// Registrations are always deactivatable: pure soft delete, no
/// status-change logic.
pub fn can_deactivate_registration() -> Result<(), Blocked> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Course, Registration};
    use crate::store::EntityStore;
    use chrono::Utc;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn seed_course(
        store: &EntityStore,
        instructor: InstructorId,
        code: &str,
        end_date: &str,
        is_active: bool,
    ) -> Course {
        let now = Utc::now();
        CourseRepo::save(
            store,
            Course {
                id: CourseId::new(),
                course_code: code.into(),
                title: code.into(),
                description: String::new(),
                description_full: String::new(),
                instructor_id: instructor,
                start_date: date("2025-01-01"),
                end_date: date(end_date),
                course_fee: 100.0,
                syllabus_url: None,
                prerequisites: vec![],
                is_active,
                created_at: now,
                updated_at: now,
            },
        )
    }

    #[test]
    fn instructor_blocked_by_upcoming_active_course() {
        let store = EntityStore::new();
        let instructor = InstructorId::new();
        seed_course(&store, instructor, "NINJA-101", "2025-12-31", true);

        let err = can_deactivate_instructor(&store, instructor, date("2025-06-01")).unwrap_err();
        assert_eq!(
            err.reason,
            "Cannot delete instructor with active or upcoming courses."
        );
    }

    #[test]
    fn instructor_free_once_courses_ended_or_inactive() {
        let store = EntityStore::new();
        let instructor = InstructorId::new();
        seed_course(&store, instructor, "PAST-101", "2022-06-01", true);
        seed_course(&store, instructor, "DEAD-101", "2025-12-31", false);

        assert!(can_deactivate_instructor(&store, instructor, date("2025-06-01")).is_ok());
    }

    #[test]
    fn instructor_end_date_today_still_blocks() {
        let store = EntityStore::new();
        let instructor = InstructorId::new();
        seed_course(&store, instructor, "EDGE-101", "2025-06-01", true);
        assert!(can_deactivate_instructor(&store, instructor, date("2025-06-01")).is_err());
        assert!(can_deactivate_instructor(&store, instructor, date("2025-06-02")).is_ok());
    }

    #[test]
    fn student_blocked_by_registered_row_on_running_course() {
        let store = EntityStore::new();
        let course = seed_course(&store, InstructorId::new(), "ELEC-101", "2025-10-01", true);
        let student = StudentId::new();
        store.insert_live(student, course.id).unwrap();

        let err = can_deactivate_student(&store, student, date("2025-06-01")).unwrap_err();
        assert_eq!(
            err.reason,
            "Cannot delete student with active or upcoming course registrations."
        );
    }

    #[test]
    fn student_free_after_cancellation_or_course_end() {
        let store = EntityStore::new();
        let course = seed_course(&store, InstructorId::new(), "ELEC-101", "2025-10-01", true);
        let student = StudentId::new();
        store.insert_live(student, course.id).unwrap();
        store.cancel_live(student, course.id).unwrap();
        assert!(can_deactivate_student(&store, student, date("2025-06-01")).is_ok());

        let past = seed_course(&store, InstructorId::new(), "PAST-101", "2022-06-01", true);
        store.insert_live(student, past.id).unwrap();
        assert!(can_deactivate_student(&store, student, date("2025-06-01")).is_ok());
    }

    #[test]
    fn course_blocked_by_any_active_registration() {
        let store = EntityStore::new();
        let course = seed_course(&store, InstructorId::new(), "NINJA-101", "2025-12-31", true);
        let student = StudentId::new();
        store.insert_live(student, course.id).unwrap();
        // Even a cancelled registration blocks, as long as the row is active.
        store.cancel_live(student, course.id).unwrap();

        let err = can_deactivate_course(&store, course.id).unwrap_err();
        assert_eq!(
            err.reason,
            "Cannot delete course with existing student registrations."
        );
    }

    #[test]
    fn course_free_when_registrations_soft_deleted() {
        let store = EntityStore::new();
        let course = seed_course(&store, InstructorId::new(), "NINJA-101", "2025-12-31", true);
        let row = store.insert_live(StudentId::new(), course.id).unwrap();

        let mut dead: Registration = row;
        dead.is_active = false;
        RegistrationRepo::save(&store, dead);

        assert!(can_deactivate_course(&store, course.id).is_ok());
    }

    #[test]
    fn registration_is_always_deactivatable() {
        assert!(can_deactivate_registration().is_ok());
    }
}
