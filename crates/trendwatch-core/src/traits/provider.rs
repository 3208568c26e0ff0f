//! Price provider trait definition.

use crate::error::DataError;
use crate::types::PriceSeries;
use async_trait::async_trait;
use chrono::Months;

/// Trait for historical daily price sources.
#[async_trait]
pub trait PriceSeriesProvider: Send + Sync {
    /// Fetch daily prices.
    ///
    /// # Arguments
    /// * `ticker` - The symbol to fetch
    /// * `lookback` - How far back the returned history reaches
    ///
    /// # Returns
    /// A series ordered from oldest to newest
    async fn fetch_daily(&self, ticker: &str, lookback: Months) -> Result<PriceSeries, DataError>;

    /// Get the provider name.
    fn name(&self) -> &str;
}
