//! # In-Memory Entity Store
//!
//! Thread-safe, cloneable stores backing the repository traits. All
//! operations are synchronous (`parking_lot::RwLock`, never held across an
//! `.await` point); the lock is non-poisonable so a panicking writer does
//! not permanently corrupt the store.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use creg_core::{CourseId, InstructorId, RegistrationId, RegistrationStatus, StudentId};
use parking_lot::RwLock;
use uuid::Uuid;

use crate::entity::{Address, Course, Department, Instructor, Registration, Student};
use crate::repo::{
    CourseRepo, DuplicateRegistration, InstructorRepo, RegistrationRepo, StudentRepo,
};

/// Generic keyed store. Cloning shares the underlying map.
#[derive(Debug)]
pub struct Store<T: Clone + Send + Sync> {
    data: Arc<RwLock<HashMap<Uuid, T>>>,
}

impl<T: Clone + Send + Sync> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
        }
    }
}

impl<T: Clone + Send + Sync> Store<T> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Insert a record, returning the previous value if the key existed.
    pub fn insert(&self, id: Uuid, value: T) -> Option<T> {
        self.data.write().insert(id, value)
    }

    /// Retrieve a record by ID.
    pub fn get(&self, id: &Uuid) -> Option<T> {
        self.data.read().get(id).cloned()
    }

    /// List all records.
    pub fn list(&self) -> Vec<T> {
        self.data.read().values().cloned().collect()
    }

    /// Update a record in place. Returns the updated record, or `None` if
    /// not found.
    pub fn update(&self, id: &Uuid, f: impl FnOnce(&mut T)) -> Option<T> {
        let mut guard = self.data.write();
        if let Some(entry) = guard.get_mut(id) {
            f(entry);
            Some(entry.clone())
        } else {
            None
        }
    }

    /// Run a closure with read access to the whole map. Used for scans
    /// that must observe a consistent snapshot.
    pub fn with_read<R>(&self, f: impl FnOnce(&HashMap<Uuid, T>) -> R) -> R {
        f(&self.data.read())
    }

    /// Run a closure with write access to the whole map under a single
    /// lock. Used for read-validate-insert sequences that must be atomic,
    /// eliminating TOCTOU races between the validation scan and the write.
    pub fn with_write<R>(&self, f: impl FnOnce(&mut HashMap<Uuid, T>) -> R) -> R {
        f(&mut self.data.write())
    }

    /// Return the number of records.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone + Send + Sync> Default for Store<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// The aggregate Entity Store: one keyed store per entity, implementing
/// every repository trait. Clone-friendly via `Arc` internals.
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    pub departments: Store<Department>,
    pub addresses: Store<Address>,
    pub instructors: Store<Instructor>,
    pub courses: Store<Course>,
    pub students: Store<Student>,
    pub registrations: Store<Registration>,
}

impl EntityStore {
    /// Create an empty entity store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl InstructorRepo for EntityStore {
    fn find_by_id(&self, id: InstructorId) -> Option<Instructor> {
        self.instructors.get(id.as_uuid())
    }

    fn find_active(&self) -> Vec<Instructor> {
        let mut rows: Vec<_> = self
            .instructors
            .list()
            .into_iter()
            .filter(|i| i.is_active)
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows
    }

    fn email_taken(&self, email: &str, exclude: Option<InstructorId>) -> bool {
        self.instructors.with_read(|map| {
            map.values()
                .any(|i| i.email.eq_ignore_ascii_case(email) && Some(i.id) != exclude)
        })
    }

    fn save(&self, instructor: Instructor) -> Instructor {
        self.instructors
            .insert(*instructor.id.as_uuid(), instructor.clone());
        instructor
    }
}

impl StudentRepo for EntityStore {
    fn find_by_id(&self, id: StudentId) -> Option<Student> {
        self.students.get(id.as_uuid())
    }

    fn find_active(&self) -> Vec<Student> {
        let mut rows: Vec<_> = self
            .students
            .list()
            .into_iter()
            .filter(|s| s.is_active)
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows
    }

    fn email_taken(&self, email: &str, exclude: Option<StudentId>) -> bool {
        self.students.with_read(|map| {
            map.values()
                .any(|s| s.email.eq_ignore_ascii_case(email) && Some(s.id) != exclude)
        })
    }

    fn save(&self, student: Student) -> Student {
        self.students.insert(*student.id.as_uuid(), student.clone());
        student
    }
}

impl CourseRepo for EntityStore {
    fn find_by_id(&self, id: CourseId) -> Option<Course> {
        self.courses.get(id.as_uuid())
    }

    fn find_active(&self) -> Vec<Course> {
        let mut rows: Vec<_> = self
            .courses
            .list()
            .into_iter()
            .filter(|c| c.is_active)
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows
    }

    fn find_by_code(&self, code: &str) -> Option<Course> {
        self.courses
            .with_read(|map| map.values().find(|c| c.course_code == code).cloned())
    }

    fn for_instructor(&self, id: InstructorId) -> Vec<Course> {
        self.courses.with_read(|map| {
            map.values()
                .filter(|c| c.instructor_id == id)
                .cloned()
                .collect()
        })
    }

    fn code_taken(&self, code: &str, exclude: Option<CourseId>) -> bool {
        self.courses.with_read(|map| {
            map.values()
                .any(|c| c.course_code == code && Some(c.id) != exclude)
        })
    }

    fn save(&self, course: Course) -> Course {
        self.courses.insert(*course.id.as_uuid(), course.clone());
        course
    }
}

impl RegistrationRepo for EntityStore {
    fn find_by_id(&self, id: RegistrationId) -> Option<Registration> {
        self.registrations.get(id.as_uuid())
    }

    fn find_active(&self) -> Vec<Registration> {
        let mut rows: Vec<_> = self
            .registrations
            .list()
            .into_iter()
            .filter(|r| r.is_active)
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows
    }

    fn for_student(&self, id: StudentId) -> Vec<Registration> {
        self.registrations.with_read(|map| {
            map.values()
                .filter(|r| r.student_id == id)
                .cloned()
                .collect()
        })
    }

    fn active_for_course(&self, id: CourseId) -> Vec<Registration> {
        self.registrations.with_read(|map| {
            map.values()
                .filter(|r| r.course_id == id && r.is_active)
                .cloned()
                .collect()
        })
    }

    fn has_live(&self, student: StudentId, course: CourseId) -> bool {
        self.registrations.with_read(|map| {
            map.values()
                .any(|r| r.student_id == student && r.course_id == course && r.is_live())
        })
    }

    fn insert_live(
        &self,
        student: StudentId,
        course: CourseId,
    ) -> Result<Registration, DuplicateRegistration> {
        // Duplicate scan and insert under one write lock.
        self.registrations.with_write(|map| {
            let duplicate = map
                .values()
                .any(|r| r.student_id == student && r.course_id == course && r.is_live());
            if duplicate {
                return Err(DuplicateRegistration);
            }
            let row = Registration::new_registered(student, course);
            map.insert(*row.id.as_uuid(), row.clone());
            Ok(row)
        })
    }

    fn cancel_live(&self, student: StudentId, course: CourseId) -> Option<Registration> {
        self.registrations.with_write(|map| {
            let row = map
                .values_mut()
                .find(|r| r.student_id == student && r.course_id == course && r.is_live())?;
            row.registration_status = RegistrationStatus::Cancelled;
            row.updated_at = Utc::now();
            Some(row.clone())
        })
    }

    fn save(&self, registration: Registration) -> Registration {
        self.registrations
            .insert(*registration.id.as_uuid(), registration.clone());
        registration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Registration;

    #[test]
    fn store_insert_and_get_roundtrip() {
        let store: Store<u32> = Store::new();
        let id = Uuid::new_v4();
        assert!(store.insert(id, 7).is_none());
        assert_eq!(store.get(&id), Some(7));
        assert!(store.insert(id, 8).is_some());
    }

    #[test]
    fn store_update_returns_none_for_missing_key() {
        let store: Store<u32> = Store::new();
        assert!(store.update(&Uuid::new_v4(), |v| *v += 1).is_none());
    }

    #[test]
    fn store_clone_shares_underlying_data() {
        let store: Store<u32> = Store::new();
        let clone = store.clone();
        clone.insert(Uuid::new_v4(), 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn insert_live_rejects_second_live_row() {
        let store = EntityStore::new();
        let student = StudentId::new();
        let course = CourseId::new();

        store.insert_live(student, course).unwrap();
        assert_eq!(
            store.insert_live(student, course),
            Err(DuplicateRegistration)
        );
        assert_eq!(store.registrations.len(), 1);
    }

    #[test]
    fn insert_live_allows_other_pairs() {
        let store = EntityStore::new();
        let student = StudentId::new();
        store.insert_live(student, CourseId::new()).unwrap();
        store.insert_live(student, CourseId::new()).unwrap();
        store.insert_live(StudentId::new(), CourseId::new()).unwrap();
        assert_eq!(store.registrations.len(), 3);
    }

    #[test]
    fn cancel_live_flips_status_not_active_flag() {
        let store = EntityStore::new();
        let student = StudentId::new();
        let course = CourseId::new();
        store.insert_live(student, course).unwrap();

        let cancelled = store.cancel_live(student, course).unwrap();
        assert_eq!(
            cancelled.registration_status,
            RegistrationStatus::Cancelled
        );
        assert!(cancelled.is_active);

        // A second cancel finds no live row.
        assert!(store.cancel_live(student, course).is_none());
    }

    #[test]
    fn reregister_after_cancel_creates_new_row() {
        let store = EntityStore::new();
        let student = StudentId::new();
        let course = CourseId::new();

        let first = store.insert_live(student, course).unwrap();
        store.cancel_live(student, course).unwrap();
        let second = store.insert_live(student, course).unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(store.registrations.len(), 2);
        // The old cancelled row is untouched.
        let old = RegistrationRepo::find_by_id(&store, first.id).unwrap();
        assert_eq!(old.registration_status, RegistrationStatus::Cancelled);
        assert!(store.has_live(student, course));
    }

    #[test]
    fn has_live_ignores_inactive_rows() {
        let store = EntityStore::new();
        let student = StudentId::new();
        let course = CourseId::new();
        let mut row = Registration::new_registered(student, course);
        row.is_active = false;
        RegistrationRepo::save(&store, row);
        assert!(!store.has_live(student, course));
    }

    #[test]
    fn find_active_filters_soft_deleted_rows() {
        let store = EntityStore::new();
        let student = StudentId::new();
        let course = CourseId::new();
        let live = store.insert_live(student, course).unwrap();
        let mut dead = Registration::new_registered(StudentId::new(), course);
        dead.is_active = false;
        RegistrationRepo::save(&store, dead);

        let active = RegistrationRepo::find_active(&store);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, live.id);
        // But active_for_course sees every active row regardless of status.
        assert_eq!(store.active_for_course(course).len(), 1);
    }

    #[test]
    fn email_taken_is_case_insensitive_and_respects_exclude() {
        let store = EntityStore::new();
        let mut student = Student {
            id: StudentId::new(),
            name_first: "Ash".into(),
            name_last: "Ketchum".into(),
            email: "ash@pallet.com".into(),
            phone: None,
            company: None,
            notes: None,
            address_id: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        student = StudentRepo::save(&store, student);
        assert!(StudentRepo::email_taken(&store, "ASH@pallet.com", None));
        assert!(!StudentRepo::email_taken(
            &store,
            "ash@pallet.com",
            Some(student.id)
        ));
    }
}
