//! Payment hold window tracking.
//!
//! A new booking reserves its slot for a fixed 10-minute hold. If payment
//! has not arrived by then the booking expires and the slot frees up. The
//! countdown is recomputed from `created_at` on every call; `now` is always
//! passed in so repeated calls within one render and the unit tests stay
//! deterministic.

use chrono::{DateTime, Duration, Utc};

use crate::record::BookingRecord;
use crate::status::BookingStatus;

/// Fixed payment hold after booking creation (minutes).
pub const PAYMENT_WINDOW_MIN: i64 = 10;

// ── Payment status ──

/// Canonical payment state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentStatus {
    Paid,
    Unpaid,
    /// Unrecognized non-empty value, lower-cased.
    Other(String),
}

impl PaymentStatus {
    pub fn is_paid(&self) -> bool {
        matches!(self, PaymentStatus::Paid)
    }

    pub fn is_unpaid(&self) -> bool {
        matches!(self, PaymentStatus::Unpaid)
    }
}

/// Map an upstream payment status to a canonical state.
///
/// The legacy store wrote localized Vietnamese values, the gateway writes
/// `paid`/`unpaid`. A missing value or a hold marker ("pending") counts as
/// unpaid: the money has not arrived yet.
pub fn normalize_payment_status(raw: Option<&str>) -> PaymentStatus {
    let s = raw.unwrap_or("").trim().to_lowercase();

    if s == "unpaid" || s.contains("chưa thanh toán") {
        return PaymentStatus::Unpaid;
    }
    if s == "paid" || s.contains("đã thanh toán") {
        return PaymentStatus::Paid;
    }
    if s.is_empty() || s == "none" || s.contains("pending") || s.contains("wait") {
        return PaymentStatus::Unpaid;
    }

    PaymentStatus::Other(s)
}

// ── Window tracking ──

/// Milliseconds left on the payment hold.
///
/// 0 when the hold has elapsed or the record has no usable creation time.
pub fn remaining_payment_ms(booking: &BookingRecord, now: DateTime<Utc>) -> i64 {
    let Some(created) = booking.created_at_utc() else {
        return 0;
    };
    let deadline = created + Duration::minutes(PAYMENT_WINDOW_MIN);
    (deadline - now).num_milliseconds().max(0)
}

/// Render a countdown as zero-padded `mm:ss`, truncating to whole seconds.
pub fn format_countdown(ms: i64) -> String {
    if ms <= 0 {
        return "00:00".into();
    }
    let secs = ms / 1000;
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Whether the booking is still inside its unpaid hold: status pending,
/// payment outstanding, and time left on the clock.
pub fn is_within_payment_window(booking: &BookingRecord, now: DateTime<Utc>) -> bool {
    booking.status() == BookingStatus::Pending
        && booking.payment().is_unpaid()
        && remaining_payment_ms(booking, now) > 0
}

// ── Tests ──
