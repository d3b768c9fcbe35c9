//! Canonical booking status derivation.
//!
//! The booking API has passed through several backends and each one spelled
//! statuses differently ("CANCELLED", "cancel_by_user", "0", "Rejected").
//! Every surface that renders or gates on a booking goes through
//! [`normalize_status`] so list views, detail views and the booking widget
//! always agree.

use serde::{Serialize, Serializer};

/// Canonical booking state, with an escape hatch for values the upstream
/// introduces before this code learns about them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
    /// Unrecognized non-empty status, lower-cased and passed through.
    /// Callers must treat this as "unknown" rather than matching on it.
    Other(String),
}

impl BookingStatus {
    pub fn as_str(&self) -> &str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
            BookingStatus::Other(raw) => raw,
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for BookingStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Map an arbitrary upstream status string to a canonical state.
///
/// Case-insensitive substring match, first rule wins: cancellation markers,
/// then completion, then pending, then confirmation. A missing or empty
/// status is a freshly created booking, which this domain treats as
/// confirmed awaiting payment.
pub fn normalize_status(raw: Option<&str>) -> BookingStatus {
    let s = raw.unwrap_or("").trim().to_lowercase();

    if s.contains("cancel") || s == "0" || s.contains("reject") {
        BookingStatus::Cancelled
    } else if s.contains("complete") || s.contains("done") {
        BookingStatus::Completed
    } else if s.contains("pending") || s.contains("wait") {
        BookingStatus::Pending
    } else if s.contains("confirm") {
        BookingStatus::Confirmed
    } else if s.is_empty() {
        BookingStatus::Confirmed
    } else {
        BookingStatus::Other(s)
    }
}

// ── Tests ──
