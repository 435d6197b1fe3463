//! Rounding and ratio helpers shared by the aggregators.
//!
//! Every ratio here is total: a zero denominator yields zero and decimal
//! overflow saturates instead of panicking.

use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places used for money averages.
pub const MONEY_DP: u32 = 2;
/// Decimal places used for percentage shares.
pub const PERCENT_DP: u32 = 1;

/// Rounds half away from zero and pins the scale to `dp` places.
///
/// ```
/// use school_reports::aggregation::round_to;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_to(Decimal::from_str("2.25").unwrap(), 1).to_string(), "2.3");
/// assert_eq!(round_to(Decimal::from(75), 1).to_string(), "75.0");
/// ```
pub fn round_to(value: Decimal, dp: u32) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(dp);
    rounded
}

/// `part / whole * 100`, rounded to `dp` places; zero when `whole` is zero.
pub fn percentage(part: Decimal, whole: Decimal, dp: u32) -> Decimal {
    if whole.is_zero() {
        return round_to(Decimal::ZERO, dp);
    }
    let ratio = part
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|scaled| scaled.checked_div(whole))
        .unwrap_or(Decimal::ZERO);
    round_to(ratio, dp)
}

/// `part / whole * 100` rounded half up to a whole percent, clamped to
/// 0-100; zero when `whole` is zero.
///
/// ```
/// use school_reports::aggregation::whole_percent;
///
/// assert_eq!(whole_percent(1, 8), 13);
/// assert_eq!(whole_percent(1, 3), 33);
/// assert_eq!(whole_percent(0, 0), 0);
/// ```
pub fn whole_percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    let part = part.min(whole) as u128;
    let whole = whole as u128;
    ((part * 200 + whole) / (whole * 2)) as u32
}

/// `total / count` rounded to `dp` places; zero when `count` is zero.
pub fn average(total: Decimal, count: usize, dp: u32) -> Decimal {
    if count == 0 {
        return round_to(Decimal::ZERO, dp);
    }
    let mean = total
        .checked_div(Decimal::from(count))
        .unwrap_or(Decimal::ZERO);
    round_to(mean, dp)
}

/// Sums amounts, saturating at the decimal bounds.
pub fn sum_amounts<I>(amounts: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    amounts
        .into_iter()
        .fold(Decimal::ZERO, |acc, amount| acc.saturating_add(amount))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_whole_percent_rounds_half_up() {
        assert_eq!(whole_percent(1, 2), 50);
        assert_eq!(whole_percent(2, 3), 67);
        assert_eq!(whole_percent(1, 200), 1);
        assert_eq!(whole_percent(1, 201), 0);
    }

    #[test]
    fn test_whole_percent_bounds() {
        assert_eq!(whole_percent(0, 5), 0);
        assert_eq!(whole_percent(5, 5), 100);
        assert_eq!(whole_percent(7, 5), 100);
        assert_eq!(whole_percent(3, 0), 0);
    }

    #[test]
    fn test_percentage_one_decimal() {
        assert_eq!(percentage(dec("300"), dec("400"), PERCENT_DP), dec("75.0"));
        assert_eq!(percentage(dec("1"), dec("3"), PERCENT_DP), dec("33.3"));
        assert_eq!(percentage(dec("2"), dec("3"), PERCENT_DP), dec("66.7"));
        assert_eq!(percentage(dec("1"), dec("16"), PERCENT_DP), dec("6.3"));
    }

    #[test]
    fn test_percentage_zero_whole_is_zero() {
        let result = percentage(dec("10"), Decimal::ZERO, PERCENT_DP);
        assert_eq!(result, Decimal::ZERO);
        assert_eq!(result.to_string(), "0.0");
    }

    #[test]
    fn test_percentage_scale_is_pinned() {
        assert_eq!(
            percentage(dec("1"), dec("4"), PERCENT_DP).to_string(),
            "25.0"
        );
    }

    #[test]
    fn test_average_rounds_to_cents() {
        assert_eq!(average(dec("100"), 3, MONEY_DP), dec("33.33"));
        assert_eq!(average(dec("200"), 3, MONEY_DP), dec("66.67"));
        assert_eq!(average(dec("100"), 0, MONEY_DP), Decimal::ZERO);
    }

    #[test]
    fn test_sum_amounts_saturates() {
        let total = sum_amounts([Decimal::MAX, dec("1")]);
        assert_eq!(total, Decimal::MAX);
        assert_eq!(sum_amounts([dec("1.50"), dec("2.25")]), dec("3.75"));
        assert_eq!(sum_amounts(Vec::new()), Decimal::ZERO);
    }
}
