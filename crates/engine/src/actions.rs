//! Which booking actions each surface may expose.
//!
//! List views, detail views and the booking widget all gate their buttons
//! through these functions so a booking never shows "cancel" on one screen
//! and hides it on another.

use std::collections::HashMap;

use serde::{Serialize, Serializer};

use crate::record::BookingRecord;
use crate::status::BookingStatus;

/// Whether the owner may cancel: any pending booking, or a confirmed one
/// that has been paid. An unpaid confirmed booking resolves through the
/// payment hold instead of cancellation.
pub fn can_cancel(booking: &BookingRecord) -> bool {
    match booking.status() {
        BookingStatus::Pending => true,
        BookingStatus::Confirmed => booking.payment().is_paid(),
        _ => false,
    }
}

/// Whether "find opponent" may be offered: the slot must be secured
/// (confirmed or already played) and paid for.
pub fn can_find_opponent(booking: &BookingRecord) -> bool {
    matches!(
        booking.status(),
        BookingStatus::Confirmed | BookingStatus::Completed
    ) && booking.payment().is_paid()
}

/// True when a match request already exists for this booking, either in
/// the caller-supplied lookup or recorded on the booking itself.
pub fn has_existing_match_request(
    booking: &BookingRecord,
    requests: &HashMap<String, bool>,
) -> bool {
    if requests.get(&booking.id).copied().unwrap_or(false) {
        return true;
    }
    booking
        .match_request_id
        .as_deref()
        .is_some_and(|id| !id.trim().is_empty())
}

// ── Recurring group aggregation ──

/// Aggregate status of a recurring booking series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupStatus {
    Cancelled,
    Completed,
    Partial,
    Active,
}

impl GroupStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupStatus::Cancelled => "cancelled",
            GroupStatus::Completed => "completed",
            GroupStatus::Partial => "partial",
            GroupStatus::Active => "active",
        }
    }
}

impl Serialize for GroupStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Fold per-session statuses into one status for the whole series: fully
/// cancelled, fully completed, partially cancelled, or still active.
pub fn group_status(bookings: &[BookingRecord]) -> GroupStatus {
    if bookings.is_empty() {
        return GroupStatus::Active;
    }

    let cancelled = bookings
        .iter()
        .filter(|b| b.status() == BookingStatus::Cancelled)
        .count();
    let completed = bookings
        .iter()
        .filter(|b| b.status() == BookingStatus::Completed)
        .count();

    if cancelled == bookings.len() {
        GroupStatus::Cancelled
    } else if completed == bookings.len() {
        GroupStatus::Completed
    } else if cancelled > 0 {
        GroupStatus::Partial
    } else {
        GroupStatus::Active
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper: build a record with just status and payment status.
    fn make_record(id: &str, status: &str, payment: &str) -> BookingRecord {
        BookingRecord {
            id: id.into(),
            raw_status: Some(status.to_string()),
            payment_status: Some(payment.to_string()),
            created_at: None,
            match_request_id: None,
        }
    }

    // ── can_cancel ──

    #[test]
    fn test_cancel_pending_unpaid() {
        assert!(can_cancel(&make_record("b1", "pending", "unpaid")));
    }

    #[test]
    fn test_cancel_pending_paid() {
        assert!(can_cancel(&make_record("b1", "pending", "paid")));
    }

    #[test]
    fn test_cancel_confirmed_paid() {
        assert!(can_cancel(&make_record("b1", "confirmed", "paid")));
    }

    #[test]
    fn test_no_cancel_confirmed_unpaid() {
        assert!(!can_cancel(&make_record("b1", "confirmed", "unpaid")));
    }

    #[test]
    fn test_no_cancel_cancelled() {
        assert!(!can_cancel(&make_record("b1", "cancelled", "paid")));
    }

    #[test]
    fn test_no_cancel_completed() {
        assert!(!can_cancel(&make_record("b1", "completed", "paid")));
    }

    #[test]
    fn test_no_cancel_expired() {
        // "expired" normalizes to an unknown status and stays uncancellable
        assert!(!can_cancel(&make_record("b1", "expired", "paid")));
    }

    // ── can_find_opponent ──

    #[test]
    fn test_find_opponent_confirmed_paid() {
        assert!(can_find_opponent(&make_record("b1", "confirmed", "paid")));
    }

    #[test]
    fn test_find_opponent_completed_paid() {
        assert!(can_find_opponent(&make_record("b1", "completed", "paid")));
    }

    #[test]
    fn test_no_find_opponent_pending_even_if_paid() {
        assert!(!can_find_opponent(&make_record("b1", "pending", "paid")));
    }

    #[test]
    fn test_no_find_opponent_confirmed_unpaid() {
        assert!(!can_find_opponent(&make_record("b1", "confirmed", "unpaid")));
    }

    #[test]
    fn test_no_find_opponent_cancelled() {
        assert!(!can_find_opponent(&make_record("b1", "cancelled", "paid")));
    }

    // ── has_existing_match_request ──

    #[test]
    fn test_match_request_from_map() {
        let mut map = HashMap::new();
        map.insert("b1".to_string(), true);
        assert!(has_existing_match_request(
            &make_record("b1", "confirmed", "paid"),
            &map
        ));
    }

    #[test]
    fn test_match_request_false_map_entry() {
        let mut map = HashMap::new();
        map.insert("b1".to_string(), false);
        assert!(!has_existing_match_request(
            &make_record("b1", "confirmed", "paid"),
            &map
        ));
    }

    #[test]
    fn test_match_request_from_record_field() {
        let mut b = make_record("b1", "confirmed", "paid");
        b.match_request_id = Some("mr-9".into());
        assert!(has_existing_match_request(&b, &HashMap::new()));
    }

    #[test]
    fn test_match_request_blank_id_ignored() {
        let mut b = make_record("b1", "confirmed", "paid");
        b.match_request_id = Some("   ".into());
        assert!(!has_existing_match_request(&b, &HashMap::new()));
    }

    #[test]
    fn test_no_match_request_anywhere() {
        assert!(!has_existing_match_request(
            &make_record("b1", "confirmed", "paid"),
            &HashMap::new()
        ));
    }

    // ── group_status ──

    #[test]
    fn test_group_all_cancelled() {
        let group = vec![
            make_record("b1", "cancelled", "paid"),
            make_record("b2", "cancelled", "paid"),
        ];
        assert_eq!(group_status(&group), GroupStatus::Cancelled);
    }

    #[test]
    fn test_group_all_completed() {
        let group = vec![
            make_record("b1", "completed", "paid"),
            make_record("b2", "done", "paid"),
        ];
        assert_eq!(group_status(&group), GroupStatus::Completed);
    }

    #[test]
    fn test_group_partially_cancelled() {
        let group = vec![
            make_record("b1", "cancelled", "paid"),
            make_record("b2", "confirmed", "paid"),
        ];
        assert_eq!(group_status(&group), GroupStatus::Partial);
    }

    #[test]
    fn test_group_active() {
        let group = vec![
            make_record("b1", "confirmed", "paid"),
            make_record("b2", "pending", "unpaid"),
        ];
        assert_eq!(group_status(&group), GroupStatus::Active);
    }

    #[test]
    fn test_group_completed_and_confirmed_is_active() {
        // Not all completed, none cancelled
        let group = vec![
            make_record("b1", "completed", "paid"),
            make_record("b2", "confirmed", "paid"),
        ];
        assert_eq!(group_status(&group), GroupStatus::Active);
    }

    #[test]
    fn test_group_empty_is_active() {
        assert_eq!(group_status(&[]), GroupStatus::Active);
    }

    #[test]
    fn test_group_status_serializes_as_string() {
        let json = serde_json::to_string(&GroupStatus::Partial).unwrap();
        assert_eq!(json, "\"partial\"");
    }
}
