//! # creg-core — Domain Primitives
//!
//! Identifier newtypes and status enums shared by every crate in the
//! course registration stack. Each identifier is a distinct type — you
//! cannot pass a [`StudentId`] where a [`CourseId`] is expected.

pub mod error;
pub mod id;
pub mod status;

pub use error::{validate_email, ValidationError};
pub use id::{AddressId, CourseId, DepartmentId, InstructorId, RegistrationId, StudentId};
pub use status::{PaymentStatus, RegistrationStatus};
