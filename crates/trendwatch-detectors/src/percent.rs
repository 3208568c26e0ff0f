//! Percentage rounding shared by the detectors.

use rust_decimal::{Decimal, RoundingStrategy};

/// Round a percentage to one decimal place, halves away from zero.
///
/// Thresholds are compared against the rounded value, so 9.95 counts as 10.0.
/// The result always carries one decimal place, so 12 displays as "12.0".
pub fn round_pct(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(1);
    rounded
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_pct() {
        assert_eq!(round_pct(dec!(9.95)), dec!(10.0));
        assert_eq!(round_pct(dec!(9.94999)), dec!(9.9));
        assert_eq!(round_pct(dec!(-2.25)), dec!(-2.3));
        assert_eq!(round_pct(dec!(12)), dec!(12));
    }

    #[test]
    fn test_round_pct_keeps_one_decimal_place() {
        assert_eq!(round_pct(dec!(12)).to_string(), "12.0");
        assert_eq!(round_pct(Decimal::ZERO).to_string(), "0.0");
        assert_eq!(round_pct(dec!(9.95)).to_string(), "10.0");
    }
}
