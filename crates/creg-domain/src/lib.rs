//! # creg-domain — Registration Domain
//!
//! The domain layer of the course registration stack:
//!
//! - [`entity`] — persisted record types (Department, Address, Instructor,
//!   Course, Student, Registration).
//! - [`repo`] — repository traits injected into the state machine and the
//!   guard, keeping them free of any concrete storage.
//! - [`store`] — thread-safe in-memory Entity Store implementing the
//!   repository traits.
//! - [`prereq`] — the Prerequisite Resolver.
//! - [`registration`] — the Registration State Machine
//!   (register / unregister).
//! - [`guard`] — the Soft-Delete Guard enforcing referential safety before
//!   an entity may be deactivated.
//! - [`notify`] — the fire-and-forget notification collaborator contract.
//!
//! All operations are synchronous; the HTTP layer in `creg-api` drives them
//! and never holds a store lock across an `.await` point.

pub mod entity;
pub mod guard;
pub mod notify;
pub mod prereq;
pub mod registration;
pub mod repo;
pub mod store;

pub use entity::{Address, Course, Department, Instructor, Registration, Student};
pub use guard::Blocked;
pub use notify::{EmailStubNotifier, Notifier};
pub use registration::{RegistrationError, RegistrationEvent};
pub use repo::{CourseRepo, InstructorRepo, RegistrationRepo, StudentRepo};
pub use store::{EntityStore, Store};
