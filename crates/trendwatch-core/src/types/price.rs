//! Daily OHLCV price data.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::DataError;

/// One daily observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Trading day
    pub date: NaiveDate,
    /// Opening price
    pub open: Decimal,
    /// Highest price
    pub high: Decimal,
    /// Lowest price
    pub low: Decimal,
    /// Closing price
    pub close: Decimal,
    /// Traded volume
    pub volume: u64,
}

impl PricePoint {
    /// Create a new price point.
    pub fn new(
        date: NaiveDate,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
        volume: u64,
    ) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Create a point where every price equals the close.
    pub fn from_close(date: NaiveDate, close: Decimal) -> Self {
        Self::new(date, close, close, close, close, 0)
    }
}

/// Time-ordered price history for one ticker.
///
/// Dates are strictly increasing; construction sorts the input and
/// rejects duplicate dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    /// Ticker symbol
    pub ticker: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series from unordered points.
    pub fn new(ticker: impl Into<String>, mut points: Vec<PricePoint>) -> Result<Self, DataError> {
        let ticker = ticker.into();
        points.sort_by_key(|p| p.date);

        if let Some(pair) = points.windows(2).find(|w| w[0].date == w[1].date) {
            return Err(DataError::InvalidSeries(format!(
                "{} has more than one observation for {}",
                ticker, pair[0].date
            )));
        }

        Ok(Self { ticker, points })
    }

    /// Build a series of consecutive calendar days from closing prices.
    pub fn from_closes(ticker: impl Into<String>, start: NaiveDate, closes: &[Decimal]) -> Self {
        let points = start
            .iter_days()
            .zip(closes)
            .map(|(date, &close)| PricePoint::from_close(date, close))
            .collect();

        Self {
            ticker: ticker.into(),
            points,
        }
    }

    /// Get the number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the series is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Get the most recent point.
    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// Date of the most recent observation.
    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    /// Extract close prices, oldest first.
    pub fn closes(&self) -> Vec<Decimal> {
        self.points.iter().map(|p| p.close).collect()
    }

    /// Drop every point dated before `start`.
    pub fn retain_since(&mut self, start: NaiveDate) {
        self.points.retain(|p| p.date >= start);
    }

    /// Get an iterator over the points.
    pub fn iter(&self) -> impl Iterator<Item = &PricePoint> {
        self.points.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_series_sorts_points() {
        let series = PriceSeries::new(
            "SPY",
            vec![
                PricePoint::from_close(date("2024-01-03"), dec!(102)),
                PricePoint::from_close(date("2024-01-02"), dec!(101)),
            ],
        )
        .unwrap();

        assert_eq!(series.closes(), vec![dec!(101), dec!(102)]);
        assert_eq!(series.latest_date(), Some(date("2024-01-03")));
    }

    #[test]
    fn test_series_rejects_duplicate_dates() {
        let result = PriceSeries::new(
            "SPY",
            vec![
                PricePoint::from_close(date("2024-01-02"), dec!(101)),
                PricePoint::from_close(date("2024-01-02"), dec!(102)),
            ],
        );

        assert!(matches!(result, Err(DataError::InvalidSeries(_))));
    }

    #[test]
    fn test_from_closes_uses_consecutive_days() {
        let series = PriceSeries::from_closes("QQQ", date("2024-02-28"), &[dec!(1), dec!(2), dec!(3)]);

        assert_eq!(series.len(), 3);
        assert_eq!(series.latest_date(), Some(date("2024-03-01")));
    }

    #[test]
    fn test_retain_since() {
        let mut series =
            PriceSeries::from_closes("QQQ", date("2024-01-01"), &[dec!(1), dec!(2), dec!(3)]);
        series.retain_since(date("2024-01-02"));

        assert_eq!(series.closes(), vec![dec!(2), dec!(3)]);
    }
}
