//! Currency display helpers.

/// Format an amount as Vietnamese đồng: dot thousands separators and the
/// ₫ symbol, sign preserved for negative amounts.
pub fn format_vnd(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 4);

    if amount < 0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i != 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    grouped.push_str(" ₫");
    grouped
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero() {
        assert_eq!(format_vnd(0), "0 ₫");
    }

    #[test]
    fn test_under_a_thousand() {
        assert_eq!(format_vnd(999), "999 ₫");
    }

    #[test]
    fn test_exact_thousand() {
        assert_eq!(format_vnd(1_000), "1.000 ₫");
    }

    #[test]
    fn test_typical_deposit() {
        assert_eq!(format_vnd(150_000), "150.000 ₫");
    }

    #[test]
    fn test_millions() {
        assert_eq!(format_vnd(1_440_000), "1.440.000 ₫");
    }

    #[test]
    fn test_negative_preserves_sign() {
        assert_eq!(format_vnd(-100_000), "-100.000 ₫");
    }

    #[test]
    fn test_uneven_grouping() {
        assert_eq!(format_vnd(12_345_678), "12.345.678 ₫");
    }
}
