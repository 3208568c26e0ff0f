//! Indicator trait definitions.

use crate::error::IndicatorError;
use rust_decimal::Decimal;

/// Trait for technical indicators over closing prices.
///
/// Output is aligned 1:1 with the input; positions before the indicator
/// has enough history are `None`.
pub trait Indicator: Send + Sync {
    /// The output type of the indicator.
    type Output;

    /// Calculate aligned indicator values for the given data.
    fn calculate(&self, data: &[Decimal]) -> Vec<Option<Self::Output>>;

    /// Get the minimum data points required.
    fn period(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;

    /// Validate that there's enough data.
    fn validate_data(&self, data: &[Decimal]) -> Result<(), IndicatorError> {
        if data.len() < self.period() {
            return Err(IndicatorError::InsufficientData {
                required: self.period(),
                available: data.len(),
            });
        }
        Ok(())
    }
}
