//! # Notification Collaborator
//!
//! Two-method fire-and-forget contract for enrollment emails. Handlers
//! invoke the notifier after the store commit with the event returned by
//! the state machine; a notifier failure is observed via logs only and
//! never rolls back the transition.

use crate::entity::{Course, Student};
use crate::registration::RegistrationEvent;

/// Best-effort enrollment notifications. No return value is consumed.
pub trait Notifier: Send + Sync {
    fn notify_registered(&self, student: &Student, course: &Course);
    fn notify_unregistered(&self, student: &Student, course: &Course);

    /// Dispatch a committed state-machine event to the matching method.
    fn notify(&self, event: &RegistrationEvent) {
        match event {
            RegistrationEvent::Registered { student, course } => {
                self.notify_registered(student, course)
            }
            RegistrationEvent::Unregistered { student, course } => {
                self.notify_unregistered(student, course)
            }
        }
    }
}

/// Email stub: logs what a real mailer would send.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmailStubNotifier;

impl Notifier for EmailStubNotifier {
    fn notify_registered(&self, student: &Student, course: &Course) {
        tracing::info!(
            student_email = %student.email,
            course_title = %course.title,
            "email stub: sent registration email"
        );
    }

    fn notify_unregistered(&self, student: &Student, course: &Course) {
        tracing::info!(
            student_email = %student.email,
            course_title = %course.title,
            "email stub: sent unregistration email"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use creg_core::{CourseId, InstructorId, StudentId};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingNotifier {
        registered: AtomicUsize,
        unregistered: AtomicUsize,
    }

    impl Notifier for CountingNotifier {
        fn notify_registered(&self, _: &Student, _: &Course) {
            self.registered.fetch_add(1, Ordering::SeqCst);
        }
        fn notify_unregistered(&self, _: &Student, _: &Course) {
            self.unregistered.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn fixtures() -> (Student, Course) {
        let now = Utc::now();
        let student = Student {
            id: StudentId::new(),
            name_first: "Ash".into(),
            name_last: "Ketchum".into(),
            email: "ash@pallet.com".into(),
            phone: None,
            company: None,
            notes: None,
            address_id: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        let course = Course {
            id: CourseId::new(),
            course_code: "BASICS-101".into(),
            title: "Basics".into(),
            description: String::new(),
            description_full: String::new(),
            instructor_id: InstructorId::new(),
            start_date: "2025-01-01".parse().unwrap(),
            end_date: "2025-06-01".parse().unwrap(),
            course_fee: 100.0,
            syllabus_url: None,
            prerequisites: vec![],
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        (student, course)
    }

    #[test]
    fn notify_dispatches_by_event_kind() {
        let notifier = CountingNotifier::default();
        let (student, course) = fixtures();

        notifier.notify(&RegistrationEvent::Registered {
            student: student.clone(),
            course: course.clone(),
        });
        notifier.notify(&RegistrationEvent::Unregistered { student, course });

        assert_eq!(notifier.registered.load(Ordering::SeqCst), 1);
        assert_eq!(notifier.unregistered.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn email_stub_does_not_panic() {
        let (student, course) = fixtures();
        EmailStubNotifier.notify_registered(&student, &course);
        EmailStubNotifier.notify_unregistered(&student, &course);
    }
}
