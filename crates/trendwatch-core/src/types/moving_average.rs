//! Moving average values aligned to a price series.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::IndicatorError;

/// Trailing moving average aligned 1:1 with the closes it was computed from.
///
/// The first `window - 1` entries are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovingAverageSeries {
    window: usize,
    values: Vec<Option<Decimal>>,
}

impl MovingAverageSeries {
    /// Wrap already aligned values.
    pub fn new(window: usize, values: Vec<Option<Decimal>>) -> Self {
        Self { window, values }
    }

    /// The averaging window.
    pub fn window(&self) -> usize {
        self.window
    }

    /// All values, oldest first.
    pub fn values(&self) -> &[Option<Decimal>] {
        &self.values
    }

    /// Number of aligned entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at the final index, if defined.
    pub fn last(&self) -> Option<Decimal> {
        self.values.last().copied().flatten()
    }

    /// Value at the final index, or an error when the window was never filled.
    pub fn require_last(&self) -> Result<Decimal, IndicatorError> {
        self.last().ok_or(IndicatorError::InsufficientData {
            required: self.window,
            available: self.values.len(),
        })
    }

    /// Count of defined values.
    pub fn defined_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_require_last() {
        let ready = MovingAverageSeries::new(2, vec![None, Some(dec!(1.5))]);
        assert_eq!(ready.require_last(), Ok(dec!(1.5)));
        assert_eq!(ready.defined_count(), 1);

        let short = MovingAverageSeries::new(3, vec![None, None]);
        assert_eq!(
            short.require_last(),
            Err(IndicatorError::InsufficientData {
                required: 3,
                available: 2
            })
        );
    }
}
