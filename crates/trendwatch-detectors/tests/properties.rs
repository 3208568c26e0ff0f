//! Property and scenario tests for the breach detectors.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use trendwatch_core::types::{CrossDirection, PriceSeries};
use trendwatch_detectors::{CrossoverDetector, CrossoverOutcome, DrawdownDetector};
use trendwatch_indicators::Sma;

fn arb_price() -> impl Strategy<Value = Decimal> {
    (1u32..1_000_000u32).prop_map(|p| Decimal::new(p as i64, 2))
}

/// Replay the detector once per day over every prefix of `closes`.
fn daily_fires(closes: &[Decimal]) -> Vec<u32> {
    let detector = DrawdownDetector::new();
    (1..=closes.len())
        .filter_map(|n| detector.detect(&closes[..n]).unwrap().level)
        .collect()
}

proptest! {
    /// Crossover depends on the close/MA ratio, not the magnitude.
    #[test]
    fn crossover_scale_invariant(
        prev_close in arb_price(),
        prev_ma in arb_price(),
        last_close in arb_price(),
        last_ma in arb_price(),
        factor in 1u32..10_000u32,
    ) {
        let detector = CrossoverDetector::new();
        let k = Decimal::new(factor as i64, 2);

        let base = detector.detect_pair((prev_close, Some(prev_ma)), (last_close, Some(last_ma)));
        let scaled = detector.detect_pair(
            (prev_close * k, Some(prev_ma * k)),
            (last_close * k, Some(last_ma * k)),
        );
        prop_assert_eq!(base, scaled);
    }

    /// A series that never falls has no drawdown.
    #[test]
    fn drawdown_silent_on_non_decreasing(steps in prop::collection::vec(0u32..500u32, 1..200)) {
        let mut price = dec!(100);
        let closes: Vec<Decimal> = steps
            .into_iter()
            .map(|s| {
                price += Decimal::new(s as i64, 2);
                price
            })
            .collect();

        let report = DrawdownDetector::new().detect(&closes).unwrap();
        prop_assert!(!report.breached);
        prop_assert_eq!(report.current_drawdown_pct, Decimal::ZERO);
    }

    /// Replayed day by day, no band ever fires twice.
    #[test]
    fn drawdown_bands_fire_at_most_once(closes in prop::collection::vec(arb_price(), 1..120)) {
        let mut fired = daily_fires(&closes);
        let total = fired.len();
        fired.sort_unstable();
        fired.dedup();
        prop_assert_eq!(fired.len(), total);
    }
}

#[test]
fn drawdown_fires_each_band_once_in_order() {
    let mut closes = vec![dec!(100), dec!(95), dec!(89), dec!(87), dec!(79), dec!(75), dec!(69)];
    assert_eq!(daily_fires(&closes), vec![10, 20, 30]);

    // Recover to a new high and fall through the same bands again.
    closes.extend([dec!(100), dec!(120), dec!(105), dec!(95), dec!(80)]);
    assert_eq!(daily_fires(&closes), vec![10, 20, 30]);
    assert_eq!(
        DrawdownDetector::new().detect(&closes).unwrap().current_drawdown_pct,
        dec!(33.3)
    );
}

#[test]
fn drawdown_first_touch_of_ten_percent() {
    // Never deeper than 5% until today.
    let closes = [dec!(100), dec!(96), dec!(95), dec!(99), dec!(97), dec!(90)];
    let report = DrawdownDetector::new().detect(&closes).unwrap();

    assert!(report.breached);
    assert_eq!(report.level, Some(10));
    assert_eq!(report.current_drawdown_pct, dec!(10.0));
}

#[test]
fn crossover_up_on_last_day() {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let closes = [dec!(100), dec!(100), dec!(96), dec!(110)];
    let series = PriceSeries::from_closes("SPY", start, &closes);

    let ma = Sma::new(3).unwrap().series(&series.closes());
    // yesterday: 96 < (100+100+96)/3, today: 110 > (100+96+110)/3
    assert_eq!(
        CrossoverDetector::new().detect(&series.closes(), &ma),
        CrossoverOutcome::Crossed {
            direction: CrossDirection::Up
        }
    );
}

#[test]
fn crossover_indeterminate_when_window_just_filled() {
    let closes = vec![dec!(100); 200];
    let ma = Sma::new(200).unwrap().series(&closes);

    assert!(ma.last().is_some());
    assert_eq!(
        CrossoverDetector::new().detect(&closes, &ma),
        CrossoverOutcome::Indeterminate
    );
}
