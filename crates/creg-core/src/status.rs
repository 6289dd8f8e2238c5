//! # Status Enums
//!
//! Lifecycle statuses for registration rows. Serialized as lowercase
//! strings to match the wire contract (`"registered"`, `"pending"`, ...).
//! Using enums rather than free strings prevents defective values from
//! ever being stored.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The registration-status of a (student, course) row.
///
/// A pair's current state is derived from its latest-intent row; cancelled
/// rows are historical and are never flipped back to `Registered`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStatus {
    /// The student holds a seat in the course.
    Registered,
    /// The student is queued for a seat.
    Waitlisted,
    /// The registration was withdrawn. The row stays active (soft-delete
    /// is a separate axis) but no longer counts as an enrollment.
    Cancelled,
}

impl RegistrationStatus {
    /// Return the wire representation of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Registered => "registered",
            Self::Waitlisted => "waitlisted",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment progress for a registration row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Payment has not been collected yet. Initial state on registration.
    Pending,
    /// Payment settled.
    Completed,
    /// Payment attempt failed.
    Failed,
}

impl PaymentStatus {
    /// Return the wire representation of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&RegistrationStatus::Registered).unwrap(),
            "\"registered\""
        );
        assert_eq!(
            serde_json::to_string(&RegistrationStatus::Cancelled).unwrap(),
            "\"cancelled\""
        );
    }

    #[test]
    fn registration_status_deserializes() {
        let status: RegistrationStatus = serde_json::from_str("\"waitlisted\"").unwrap();
        assert_eq!(status, RegistrationStatus::Waitlisted);
    }

    #[test]
    fn registration_status_rejects_unknown_values() {
        assert!(serde_json::from_str::<RegistrationStatus>("\"enrolled\"").is_err());
    }

    #[test]
    fn payment_status_roundtrip() {
        for status in [
            PaymentStatus::Pending,
            PaymentStatus::Completed,
            PaymentStatus::Failed,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            let back: PaymentStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(back, status);
        }
    }

    #[test]
    fn as_str_matches_serde() {
        let json = serde_json::to_string(&RegistrationStatus::Registered).unwrap();
        assert_eq!(json, format!("\"{}\"", RegistrationStatus::Registered.as_str()));
    }
}
