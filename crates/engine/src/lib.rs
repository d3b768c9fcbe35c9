//! fieldbook-engine — booking lifecycle and money calculations for the
//! field booking platform.
//!
//! Raw booking records from the store go in; display-ready values and
//! action decisions come out. Every function is pure and synchronous, and
//! wall-clock time is an explicit parameter wherever it matters, so the
//! same inputs produce the same outputs on every surface that calls in.

pub mod actions;
pub mod currency;
pub mod payment;
pub mod record;
pub mod recurring;
pub mod refund;
pub mod status;
pub mod time;

pub use actions::{
    can_cancel, can_find_opponent, group_status, has_existing_match_request, GroupStatus,
};
pub use currency::format_vnd;
pub use payment::{
    format_countdown, is_within_payment_window, normalize_payment_status, remaining_payment_ms,
    PaymentStatus, PAYMENT_WINDOW_MIN,
};
pub use record::BookingRecord;
pub use recurring::{compute_discount, plan_recurring, DiscountTier, RecurringPlan};
pub use refund::{
    cancellation_policy_ranges, quote_cancellation, quote_cancellation_str, CancellationQuote,
    PolicyRange, PAST_BOOKING_LABEL,
};
pub use status::{normalize_status, BookingStatus};
