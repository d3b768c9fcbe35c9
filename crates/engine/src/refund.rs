//! Tiered cancellation refund policy.
//!
//! The deposit split depends only on how close to kickoff the cancellation
//! happens, measured against wall-clock "now". Quotes are derived views:
//! recomputed on demand, never persisted.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::time::parse_timestamp;

/// Label shown when the booking start has already passed.
pub const PAST_BOOKING_LABEL: &str = "Đã quá giờ";

/// Refund/penalty split for one cancellation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CancellationQuote {
    pub refund_rate: u32,
    pub penalty_rate: u32,
    pub refund_amount: i64,
    pub penalty_amount: i64,
    pub time_range: String,
    pub hours_until_booking: f64,
    pub is_past_booking: bool,
}

/// One row of the static policy table.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PolicyRange {
    pub range: &'static str,
    pub label: &'static str,
    pub refund_rate: u32,
    pub penalty_rate: u32,
}

/// The five refund tiers, closest to kickoff first. A boundary value falls
/// into the later tier: exactly 2h before kickoff refunds 70%, not 100%.
const POLICY: [PolicyRange; 5] = [
    PolicyRange {
        range: "0-2h",
        label: "Hủy trước giờ đá 0-2 giờ",
        refund_rate: 100,
        penalty_rate: 0,
    },
    PolicyRange {
        range: "2-3h",
        label: "Hủy trước giờ đá 2-3 giờ",
        refund_rate: 70,
        penalty_rate: 30,
    },
    PolicyRange {
        range: "3-4h",
        label: "Hủy trước giờ đá 3-4 giờ",
        refund_rate: 40,
        penalty_rate: 60,
    },
    PolicyRange {
        range: "4-5h",
        label: "Hủy trước giờ đá 4-5 giờ",
        refund_rate: 10,
        penalty_rate: 90,
    },
    PolicyRange {
        range: "> 5h",
        label: "Hủy trước giờ đá trên 5 giờ",
        refund_rate: 0,
        penalty_rate: 100,
    },
];

/// Static policy metadata for rendering the cancellation terms, so the UI
/// never re-derives the tiers from the calculator.
pub fn cancellation_policy_ranges() -> &'static [PolicyRange; 5] {
    &POLICY
}

/// Quote the refund/penalty split for cancelling a booking that starts at
/// `booking_start` with `deposit_amount` already put down.
///
/// `confirmed_at` is part of the upstream contract but does not influence
/// the split: the tiers key off time remaining until kickoff, not off when
/// the booking was confirmed.
pub fn quote_cancellation(
    _confirmed_at: Option<DateTime<Utc>>,
    booking_start: DateTime<Utc>,
    deposit_amount: i64,
    now: DateTime<Utc>,
) -> CancellationQuote {
    let deposit = deposit_amount.max(0);
    let ms_until = (booking_start - now).num_milliseconds();

    if ms_until <= 0 {
        return CancellationQuote {
            refund_rate: 0,
            penalty_rate: 100,
            refund_amount: 0,
            penalty_amount: deposit,
            time_range: PAST_BOOKING_LABEL.into(),
            hours_until_booking: 0.0,
            is_past_booking: true,
        };
    }

    let hours = ms_until as f64 / 3_600_000.0;
    let tier = if hours < 2.0 {
        &POLICY[0]
    } else if hours < 3.0 {
        &POLICY[1]
    } else if hours < 4.0 {
        &POLICY[2]
    } else if hours < 5.0 {
        &POLICY[3]
    } else {
        &POLICY[4]
    };

    let refund_amount = (deposit as f64 * tier.refund_rate as f64 / 100.0).round() as i64;

    CancellationQuote {
        refund_rate: tier.refund_rate,
        penalty_rate: tier.penalty_rate,
        refund_amount,
        penalty_amount: deposit - refund_amount,
        time_range: tier.range.to_string(),
        hours_until_booking: hours,
        is_past_booking: false,
    }
}

/// [`quote_cancellation`] for string timestamps straight from the store.
///
/// An unparseable booking start quotes as already past (no refund), the
/// conservative default for a read-model view.
pub fn quote_cancellation_str(
    confirmed_at: Option<&str>,
    booking_start: &str,
    deposit_amount: i64,
    now: DateTime<Utc>,
) -> CancellationQuote {
    let confirmed = confirmed_at.and_then(parse_timestamp);
    match parse_timestamp(booking_start) {
        Some(start) => quote_cancellation(confirmed, start, deposit_amount, now),
        None => quote_cancellation(confirmed, now, deposit_amount, now),
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    fn quote_hours_out(hours_out: f64, deposit: i64) -> CancellationQuote {
        let start = fixed_now() + Duration::milliseconds((hours_out * 3_600_000.0) as i64);
        quote_cancellation(None, start, deposit, fixed_now())
    }

    #[test]
    fn test_one_hour_out_full_refund() {
        let q = quote_hours_out(1.0, 100_000);
        assert_eq!(q.refund_rate, 100);
        assert_eq!(q.refund_amount, 100_000);
        assert_eq!(q.penalty_amount, 0);
        assert_eq!(q.time_range, "0-2h");
        assert!(!q.is_past_booking);
    }

    #[test]
    fn test_two_and_a_half_hours_out() {
        let q = quote_hours_out(2.5, 100_000);
        assert_eq!(q.refund_rate, 70);
        assert_eq!(q.refund_amount, 70_000);
        assert_eq!(q.penalty_amount, 30_000);
        assert_eq!(q.time_range, "2-3h");
    }

    #[test]
    fn test_exactly_two_hours_belongs_to_lower_tier() {
        let q = quote_hours_out(2.0, 100_000);
        assert_eq!(q.refund_rate, 70);
        assert_eq!(q.time_range, "2-3h");
    }

    #[test]
    fn test_three_and_a_half_hours_out() {
        let q = quote_hours_out(3.5, 100_000);
        assert_eq!(q.refund_rate, 40);
        assert_eq!(q.refund_amount, 40_000);
    }

    #[test]
    fn test_four_and_a_half_hours_out() {
        let q = quote_hours_out(4.5, 100_000);
        assert_eq!(q.refund_rate, 10);
        assert_eq!(q.refund_amount, 10_000);
    }

    #[test]
    fn test_six_hours_out_no_refund() {
        let q = quote_hours_out(6.0, 100_000);
        assert_eq!(q.refund_rate, 0);
        assert_eq!(q.penalty_amount, 100_000);
        assert_eq!(q.time_range, "> 5h");
    }

    #[test]
    fn test_past_booking() {
        let start = fixed_now() - Duration::hours(1);
        let q = quote_cancellation(None, start, 100_000, fixed_now());
        assert_eq!(q.refund_rate, 0);
        assert!(q.is_past_booking);
        assert_eq!(q.time_range, PAST_BOOKING_LABEL);
        assert_eq!(q.hours_until_booking, 0.0);
    }

    #[test]
    fn test_booking_starting_right_now_is_past() {
        let q = quote_cancellation(None, fixed_now(), 100_000, fixed_now());
        assert!(q.is_past_booking);
    }

    #[test]
    fn test_zero_deposit_all_amounts_zero() {
        let q = quote_hours_out(2.5, 0);
        assert_eq!(q.refund_amount, 0);
        assert_eq!(q.penalty_amount, 0);
        assert_eq!(q.refund_rate, 70); // rate still reported
    }

    #[test]
    fn test_rounded_split_adds_up() {
        let q = quote_hours_out(2.5, 99_999);
        assert_eq!(q.refund_amount, 69_999); // round(69999.3)
        assert_eq!(q.refund_amount + q.penalty_amount, 99_999);
    }

    #[test]
    fn test_confirmed_at_does_not_change_quote() {
        let confirmed = Some(fixed_now() - Duration::hours(48));
        let start = fixed_now() + Duration::hours(1);
        let a = quote_cancellation(confirmed, start, 100_000, fixed_now());
        let b = quote_cancellation(None, start, 100_000, fixed_now());
        assert_eq!(a, b);
    }

    #[test]
    fn test_idempotent_with_pinned_now() {
        let start = fixed_now() + Duration::hours(3);
        let a = quote_cancellation(None, start, 50_000, fixed_now());
        let b = quote_cancellation(None, start, 50_000, fixed_now());
        assert_eq!(a, b);
    }

    #[test]
    fn test_policy_ranges_are_complete() {
        let ranges = cancellation_policy_ranges();
        assert_eq!(ranges.len(), 5);
        for r in ranges {
            assert_eq!(r.refund_rate + r.penalty_rate, 100, "tier {}", r.range);
        }
    }

    #[test]
    fn test_string_inputs() {
        let q = quote_cancellation_str(
            Some("2026-03-01T08:00:00Z"),
            "2026-03-01T13:00:00Z",
            100_000,
            fixed_now(),
        );
        assert_eq!(q.refund_rate, 100);
        assert_eq!(q.time_range, "0-2h");
    }

    #[test]
    fn test_unparseable_start_quotes_as_past() {
        let q = quote_cancellation_str(None, "soon", 100_000, fixed_now());
        assert!(q.is_past_booking);
        assert_eq!(q.refund_amount, 0);
    }
}
