//! # Identifier Newtypes
//!
//! UUID-based identifiers for every entity in the registration domain.
//! Always valid by construction; serialize as plain UUID strings.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Implement the shared surface of a UUID identifier newtype:
/// constructors, accessors, `Display`, `FromStr`, and conversions.
macro_rules! uuid_id {
    ($(#[$doc:meta])* $ty:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema,
        )]
        #[serde(transparent)]
        #[schema(value_type = String, format = Uuid)]
        pub struct $ty(Uuid);

        impl $ty {
            /// Create a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Create an identifier from an existing UUID.
            pub fn from_uuid(id: Uuid) -> Self {
                Self(id)
            }

            /// Access the underlying UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $ty {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<Uuid> for $ty {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $ty {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::from_str(s).map(Self)
            }
        }
    };
}

uuid_id! {
    /// A unique identifier for a department.
    DepartmentId
}

uuid_id! {
    /// A unique identifier for a postal address.
    AddressId
}

uuid_id! {
    /// A unique identifier for an instructor.
    InstructorId
}

uuid_id! {
    /// A unique identifier for a course offering.
    CourseId
}

uuid_id! {
    /// A unique identifier for a student.
    StudentId
}

uuid_id! {
    /// A unique identifier for a registration row. Each register action
    /// creates a fresh row, so a (student, course) pair accumulates ids
    /// over its history.
    RegistrationId
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn ids_are_distinct_types() {
        // Compile-time property; exercised here for documentation value.
        fn takes_student(_: StudentId) {}
        takes_student(StudentId::new());
    }

    #[test]
    fn new_ids_are_unique() {
        assert_ne!(CourseId::new(), CourseId::new());
    }

    #[test]
    fn from_uuid_roundtrip() {
        let raw = uuid::Uuid::new_v4();
        let id = StudentId::from_uuid(raw);
        assert_eq!(*id.as_uuid(), raw);
    }

    #[test]
    fn display_matches_uuid() {
        let raw = uuid::Uuid::new_v4();
        let id = RegistrationId::from_uuid(raw);
        assert_eq!(id.to_string(), raw.to_string());
    }

    #[test]
    fn from_str_parses_canonical_form() {
        let id = CourseId::from_str("550e8400-e29b-41d4-a716-446655440000").unwrap();
        assert_eq!(id.to_string(), "550e8400-e29b-41d4-a716-446655440000");
    }

    #[test]
    fn from_str_rejects_garbage() {
        assert!(InstructorId::from_str("not-a-uuid").is_err());
    }

    #[test]
    fn serializes_as_plain_string() {
        let raw = uuid::Uuid::new_v4();
        let id = StudentId::from_uuid(raw);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{raw}\""));
    }
}
