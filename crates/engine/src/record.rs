//! Boundary view of an upstream booking record.
//!
//! The booking API drifted across backend rewrites and the JSON field names
//! with it (`createdAt`, `CreatedAt`, `createAt`, `CreateAt`). All accepted
//! aliases are absorbed here, once, so the calculation modules never see
//! them.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::payment::{normalize_payment_status, PaymentStatus};
use crate::status::{normalize_status, BookingStatus};
use crate::time::parse_timestamp;

/// One booking as the upstream store hands it over. Read-only here: this
/// crate derives views from it and never writes anything back.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingRecord {
    /// Opaque upstream identifier.
    #[serde(default)]
    pub id: String,

    /// Free-form status string exactly as the upstream sent it.
    #[serde(default, rename = "status", alias = "Status", alias = "bookingStatus")]
    pub raw_status: Option<String>,

    #[serde(
        default,
        rename = "paymentStatus",
        alias = "PaymentStatus",
        alias = "payment_status"
    )]
    pub payment_status: Option<String>,

    /// Creation time under any of its historical field names.
    #[serde(
        default,
        rename = "createdAt",
        alias = "CreatedAt",
        alias = "createAt",
        alias = "CreateAt",
        alias = "created_at"
    )]
    pub created_at: Option<String>,

    /// Present when a "find opponent" request exists for this booking.
    #[serde(
        default,
        rename = "matchRequestId",
        alias = "matchRequestID",
        alias = "MatchRequestID",
        alias = "match_request_id"
    )]
    pub match_request_id: Option<String>,
}

impl BookingRecord {
    /// Canonical status (a pure function of the raw status).
    pub fn status(&self) -> BookingStatus {
        normalize_status(self.raw_status.as_deref())
    }

    /// Canonical payment state.
    pub fn payment(&self) -> PaymentStatus {
        normalize_payment_status(self.payment_status.as_deref())
    }

    /// Creation time in UTC, when present and parseable.
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        self.created_at.as_deref().and_then(parse_timestamp)
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_camel_case() {
        let b: BookingRecord = serde_json::from_str(
            r#"{"id":"b1","status":"Confirmed","paymentStatus":"paid","createdAt":"2026-03-01T10:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(b.id, "b1");
        assert_eq!(b.status(), BookingStatus::Confirmed);
        assert!(b.payment().is_paid());
        assert!(b.created_at_utc().is_some());
    }

    #[test]
    fn test_deserialize_legacy_created_at_aliases() {
        for field in ["CreatedAt", "createAt", "CreateAt", "created_at"] {
            let json = format!(r#"{{"id":"b1","{}":"2026-03-01T10:00:00Z"}}"#, field);
            let b: BookingRecord = serde_json::from_str(&json).unwrap();
            assert!(b.created_at_utc().is_some(), "alias {} not accepted", field);
        }
    }

    #[test]
    fn test_deserialize_match_request_aliases() {
        for field in ["matchRequestId", "matchRequestID", "MatchRequestID"] {
            let json = format!(r#"{{"id":"b1","{}":"mr-9"}}"#, field);
            let b: BookingRecord = serde_json::from_str(&json).unwrap();
            assert_eq!(b.match_request_id.as_deref(), Some("mr-9"), "alias {}", field);
        }
    }

    #[test]
    fn test_deserialize_empty_object() {
        let b: BookingRecord = serde_json::from_str("{}").unwrap();
        assert_eq!(b.id, "");
        // No status at all still normalizes to a defined state
        assert_eq!(b.status(), BookingStatus::Confirmed);
        assert!(b.created_at_utc().is_none());
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let b: BookingRecord = serde_json::from_str(
            r#"{"id":"b1","fieldName":"Sân 5 Thanh Xuân","latitude":21.0}"#,
        )
        .unwrap();
        assert_eq!(b.id, "b1");
    }
}
