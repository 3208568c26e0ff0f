//! Moving average indicators.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use trendwatch_core::error::IndicatorError;
use trendwatch_core::traits::Indicator;
use trendwatch_core::types::MovingAverageSeries;

/// Simple Moving Average (SMA).
///
/// Calculates the arithmetic mean of the last N closes. Decimal arithmetic
/// keeps the sliding sum exact, so every value equals the naive mean of its
/// window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sma {
    period: usize,
}

impl Sma {
    /// Create a new SMA with the specified period.
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        if period == 0 {
            return Err(IndicatorError::InvalidParameter(
                "Moving average window must be greater than 0".into(),
            ));
        }
        Ok(Self { period })
    }

    /// Compute the aligned moving average series.
    pub fn series(&self, closes: &[Decimal]) -> MovingAverageSeries {
        MovingAverageSeries::new(self.period, self.calculate(closes))
    }
}

impl Indicator for Sma {
    type Output = Decimal;

    fn calculate(&self, data: &[Decimal]) -> Vec<Option<Decimal>> {
        let mut result = vec![None; data.len()];
        if data.len() < self.period {
            return result;
        }

        let period = Decimal::from(self.period);

        // Initial sum
        let mut sum: Decimal = data[..self.period].iter().copied().sum();
        result[self.period - 1] = Some(sum / period);

        // Sliding window
        for i in self.period..data.len() {
            sum = sum - data[i - self.period] + data[i];
            result[i] = Some(sum / period);
        }

        result
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "SMA"
    }
}
