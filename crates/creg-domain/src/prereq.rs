//! # Prerequisite Resolver
//!
//! Determines which of a course's prerequisite codes a student has not yet
//! satisfied. Pure reads, no side effects.

use creg_core::StudentId;

use crate::entity::Course;
use crate::repo::{CourseRepo, RegistrationRepo};

/// Return the ordered sequence of unmet prerequisite codes for
/// `(student, course)`. An empty result means all prerequisites are
/// satisfied.
///
/// For each code in `course.prerequisites`, in order:
/// 1. Look up a course with that course_code — any instance, regardless of
///    active flag. No such course means the code is unmet.
/// 2. Otherwise the code is met only if the student holds an active
///    `registered` row for that course.
pub fn unmet_prerequisites<R>(repos: &R, student: StudentId, course: &Course) -> Vec<String>
where
    R: CourseRepo + RegistrationRepo,
{
    course
        .prerequisites
        .iter()
        .filter(|code| match repos.find_by_code(code) {
            Some(prereq) => !repos.has_live(student, prereq.id),
            None => true,
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Course;
    use crate::store::EntityStore;
    use chrono::Utc;
    use creg_core::{CourseId, InstructorId};

    fn course_with_code(code: &str, prerequisites: Vec<String>) -> Course {
        let now = Utc::now();
        Course {
            id: CourseId::new(),
            course_code: code.into(),
            title: code.into(),
            description: String::new(),
            description_full: String::new(),
            instructor_id: InstructorId::new(),
            start_date: "2025-01-01".parse().unwrap(),
            end_date: "2025-06-01".parse().unwrap(),
            course_fee: 100.0,
            syllabus_url: None,
            prerequisites,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn empty_prerequisites_are_satisfied() {
        let store = EntityStore::new();
        let course = course_with_code("ADV-202", vec![]);
        assert!(unmet_prerequisites(&store, StudentId::new(), &course).is_empty());
    }

    #[test]
    fn nonexistent_code_is_always_unmet() {
        let store = EntityStore::new();
        let course = course_with_code("ADV-202", vec!["GHOST-999".into()]);
        assert_eq!(
            unmet_prerequisites(&store, StudentId::new(), &course),
            vec!["GHOST-999".to_string()]
        );
    }

    #[test]
    fn unregistered_prerequisite_is_unmet() {
        let store = EntityStore::new();
        CourseRepo::save(&store, course_with_code("BASICS-101", vec![]));
        let course = course_with_code("ADV-202", vec!["BASICS-101".into()]);
        assert_eq!(
            unmet_prerequisites(&store, StudentId::new(), &course),
            vec!["BASICS-101".to_string()]
        );
    }

    #[test]
    fn live_registration_satisfies_prerequisite() {
        let store = EntityStore::new();
        let basics = CourseRepo::save(&store, course_with_code("BASICS-101", vec![]));
        let student = StudentId::new();
        store.insert_live(student, basics.id).unwrap();

        let course = course_with_code("ADV-202", vec!["BASICS-101".into()]);
        assert!(unmet_prerequisites(&store, student, &course).is_empty());
    }

    #[test]
    fn cancelled_registration_does_not_satisfy() {
        let store = EntityStore::new();
        let basics = CourseRepo::save(&store, course_with_code("BASICS-101", vec![]));
        let student = StudentId::new();
        store.insert_live(student, basics.id).unwrap();
        store.cancel_live(student, basics.id).unwrap();

        let course = course_with_code("ADV-202", vec!["BASICS-101".into()]);
        assert_eq!(
            unmet_prerequisites(&store, student, &course),
            vec!["BASICS-101".to_string()]
        );
    }

    #[test]
    fn partial_satisfaction_preserves_order() {
        let store = EntityStore::new();
        let a = CourseRepo::save(&store, course_with_code("A-101", vec![]));
        CourseRepo::save(&store, course_with_code("B-102", vec![]));
        CourseRepo::save(&store, course_with_code("C-103", vec![]));
        let student = StudentId::new();
        store.insert_live(student, a.id).unwrap();

        let course = course_with_code(
            "ADV-202",
            vec!["A-101".into(), "B-102".into(), "C-103".into()],
        );
        assert_eq!(
            unmet_prerequisites(&store, student, &course),
            vec!["B-102".to_string(), "C-103".to_string()]
        );
    }

    #[test]
    fn soft_deleted_prerequisite_course_still_resolves_by_code() {
        // Preserved source behavior: the code lookup ignores the course's
        // active flag.
        let store = EntityStore::new();
        let mut basics = course_with_code("BASICS-101", vec![]);
        basics.is_active = false;
        let basics = CourseRepo::save(&store, basics);
        let student = StudentId::new();
        store.insert_live(student, basics.id).unwrap();

        let course = course_with_code("ADV-202", vec!["BASICS-101".into()]);
        assert!(unmet_prerequisites(&store, student, &course).is_empty());
    }
}
