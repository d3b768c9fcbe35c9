//! Recurring booking schedule and volume pricing.
//!
//! The planner turns a date range plus a weekday selection into the
//! concrete session dates and a volume-discounted total. Discount rates are
//! pricing policy owned by the caller and injected as a table; this module
//! only does the scheduling math. Availability of the produced dates is the
//! store's concern, not the planner's.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// One step of the volume discount table: plans with at least
/// `min_sessions` sessions get `discount_percent` off.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DiscountTier {
    pub min_sessions: u32,
    pub discount_percent: u32,
}

/// A computed recurring plan. The session count and money fields are
/// derived from the range and weekday selection, never mutated separately.
#[derive(Debug, Clone, Serialize)]
pub struct RecurringPlan {
    pub range_start: NaiveDate,
    pub range_end: NaiveDate,
    /// Selected weekdays after validation, 0 = Sunday .. 6 = Saturday.
    pub weekdays: Vec<u8>,
    pub min_weeks: u32,
    pub session_price: i64,
    pub total_sessions: u32,
    pub discount_percent: u32,
    pub discounted_total: i64,
    /// Concrete candidate dates for the store to persist and conflict-check.
    pub session_dates: Vec<NaiveDate>,
}

/// Discount for a session count: the highest tier the count satisfies,
/// 0 when none match or the plan is empty.
pub fn compute_discount(total_sessions: u32, table: &[DiscountTier]) -> u32 {
    if total_sessions == 0 {
        return 0;
    }
    table
        .iter()
        .filter(|tier| total_sessions >= tier.min_sessions)
        .map(|tier| tier.discount_percent)
        .max()
        .unwrap_or(0)
}

/// Build a recurring plan over the inclusive range.
///
/// Weekday selection only counts once the range spans at least `min_weeks`
/// weeks; below that the selection is dropped and the plan comes back empty
/// rather than rejected. The UI disables the control at the same threshold,
/// this is the backstop.
pub fn plan_recurring(
    range_start: NaiveDate,
    range_end: NaiveDate,
    selected_weekdays: &BTreeSet<u8>,
    min_weeks: u32,
    session_price: i64,
    discount_table: &[DiscountTier],
) -> RecurringPlan {
    let span_days = (range_end - range_start).num_days();
    let long_enough = span_days >= min_weeks as i64 * 7;

    let weekdays: Vec<u8> = if long_enough {
        selected_weekdays
            .iter()
            .copied()
            .filter(|day| *day <= 6)
            .collect()
    } else {
        Vec::new()
    };

    let mut session_dates = Vec::new();
    if !weekdays.is_empty() {
        let mut date = range_start;
        while date <= range_end {
            let weekday = date.weekday().num_days_from_sunday() as u8;
            if weekdays.contains(&weekday) {
                session_dates.push(date);
            }
            match date.succ_opt() {
                Some(next) => date = next,
                None => break,
            }
        }
    }

    let total_sessions = session_dates.len() as u32;
    let discount_percent = compute_discount(total_sessions, discount_table);
    let gross = total_sessions as i64 * session_price;
    let discounted_total = (gross as f64 * (1.0 - discount_percent as f64 / 100.0)).round() as i64;

    RecurringPlan {
        range_start,
        range_end,
        weekdays,
        min_weeks,
        session_price,
        total_sessions,
        discount_percent,
        discounted_total,
        session_dates,
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn weekdays(days: &[u8]) -> BTreeSet<u8> {
        days.iter().copied().collect()
    }

    const TABLE: &[DiscountTier] = &[
        DiscountTier { min_sessions: 4, discount_percent: 5 },
        DiscountTier { min_sessions: 8, discount_percent: 10 },
        DiscountTier { min_sessions: 12, discount_percent: 15 },
    ];

    // 2026-03-01 is a Sunday; 01..28 is exactly four full weeks.

    #[test]
    fn test_four_weeks_two_days_per_week() {
        // Sundays + Wednesdays over four weeks: 8 sessions
        let plan = plan_recurring(
            date(2026, 3, 1),
            date(2026, 3, 28),
            &weekdays(&[0, 3]),
            2,
            200_000,
            TABLE,
        );
        assert_eq!(plan.total_sessions, 8);
        assert_eq!(plan.discount_percent, 10);
        // 8 × 200 000 = 1 600 000, minus 10%
        assert_eq!(plan.discounted_total, 1_440_000);
        assert_eq!(plan.session_dates.len(), 8);
        assert_eq!(plan.session_dates[0], date(2026, 3, 1));
        assert_eq!(plan.session_dates[1], date(2026, 3, 4));
    }

    #[test]
    fn test_single_weekday() {
        let plan = plan_recurring(
            date(2026, 3, 1),
            date(2026, 3, 28),
            &weekdays(&[0]),
            2,
            150_000,
            TABLE,
        );
        // Sundays: 1, 8, 15, 22 (28 is a Saturday)
        assert_eq!(plan.total_sessions, 4);
        assert_eq!(plan.discount_percent, 5);
    }

    #[test]
    fn test_range_too_short_forces_empty_selection() {
        let plan = plan_recurring(
            date(2026, 3, 1),
            date(2026, 3, 7),
            &weekdays(&[0, 3]),
            2,
            200_000,
            TABLE,
        );
        assert!(plan.weekdays.is_empty());
        assert_eq!(plan.total_sessions, 0);
        assert_eq!(plan.discounted_total, 0);
        assert!(plan.session_dates.is_empty());
    }

    #[test]
    fn test_range_exactly_min_weeks() {
        // 14-day span with min_weeks = 2 passes the threshold
        let plan = plan_recurring(
            date(2026, 3, 1),
            date(2026, 3, 15),
            &weekdays(&[0]),
            2,
            100_000,
            TABLE,
        );
        assert_eq!(plan.total_sessions, 3); // 1, 8, 15
    }

    #[test]
    fn test_no_weekdays_selected() {
        let plan = plan_recurring(
            date(2026, 3, 1),
            date(2026, 3, 28),
            &weekdays(&[]),
            2,
            200_000,
            TABLE,
        );
        assert_eq!(plan.total_sessions, 0);
        assert_eq!(plan.discounted_total, 0);
    }

    #[test]
    fn test_out_of_range_weekdays_filtered() {
        let plan = plan_recurring(
            date(2026, 3, 1),
            date(2026, 3, 28),
            &weekdays(&[7, 12]),
            2,
            200_000,
            TABLE,
        );
        assert!(plan.weekdays.is_empty());
        assert_eq!(plan.total_sessions, 0);
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let plan = plan_recurring(
            date(2026, 3, 28),
            date(2026, 3, 1),
            &weekdays(&[0]),
            0,
            200_000,
            TABLE,
        );
        assert_eq!(plan.total_sessions, 0);
    }

    #[test]
    fn test_no_discount_below_first_tier() {
        let plan = plan_recurring(
            date(2026, 3, 1),
            date(2026, 3, 15),
            &weekdays(&[0]),
            2,
            100_000,
            TABLE,
        );
        // 3 sessions, first tier starts at 4
        assert_eq!(plan.discount_percent, 0);
        assert_eq!(plan.discounted_total, 300_000);
    }

    // ── compute_discount ──

    #[test]
    fn test_discount_zero_sessions() {
        assert_eq!(compute_discount(0, TABLE), 0);
    }

    #[test]
    fn test_discount_below_threshold() {
        assert_eq!(compute_discount(3, TABLE), 0);
    }

    #[test]
    fn test_discount_exact_threshold() {
        assert_eq!(compute_discount(4, TABLE), 5);
    }

    #[test]
    fn test_discount_middle_tier() {
        assert_eq!(compute_discount(9, TABLE), 10);
    }

    #[test]
    fn test_discount_top_tier() {
        assert_eq!(compute_discount(40, TABLE), 15);
    }

    #[test]
    fn test_discount_empty_table() {
        assert_eq!(compute_discount(10, &[]), 0);
    }

    #[test]
    fn test_discount_monotone_in_volume() {
        let mut last = 0;
        for n in 0..30 {
            let d = compute_discount(n, TABLE);
            assert!(d >= last, "discount dropped at {} sessions", n);
            last = d;
        }
    }
}
