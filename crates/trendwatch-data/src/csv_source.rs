//! CSV replay provider.

use async_trait::async_trait;
use chrono::Months;
use csv::ReaderBuilder;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;
use trendwatch_core::error::DataError;
use trendwatch_core::traits::PriceSeriesProvider;
use trendwatch_core::types::{PricePoint, PriceSeries};

use crate::dates::{lookback_start, parse_date};

/// One row of an exported daily price file. Headers may be capitalised.
///
/// Only `Close` feeds the detectors; an `Adj Close` column is ignored.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(alias = "Date", alias = "timestamp", alias = "Timestamp")]
    date: String,
    #[serde(alias = "Open")]
    open: String,
    #[serde(alias = "High")]
    high: String,
    #[serde(alias = "Low")]
    low: String,
    #[serde(alias = "Close")]
    close: String,
    #[serde(alias = "Volume", default)]
    volume: Option<f64>,
}

/// Reads `{dir}/{TICKER}.csv` (or `{ticker}.csv`, `{TICKER}_daily.csv`).
///
/// The lookback is measured back from the last row rather than from today,
/// so a stored file replays the same way on every run.
pub struct CsvProvider {
    dir: PathBuf,
}

impl CsvProvider {
    /// Create a provider over a directory of CSV files.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, DataError> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(DataError::ConnectionError(format!(
                "CSV directory '{}' does not exist",
                dir.display()
            )));
        }
        Ok(Self { dir })
    }

    /// Candidate files for `ticker`. Tickers that could leave `dir` have none.
    fn file_for(&self, ticker: &str) -> Option<PathBuf> {
        if !is_file_safe(ticker) {
            return None;
        }

        let lower = ticker.to_lowercase();
        [
            format!("{}.csv", ticker),
            format!("{}.csv", lower),
            format!("{}_daily.csv", ticker),
            format!("{}_daily.csv", lower),
        ]
        .into_iter()
        .map(|name| self.dir.join(name))
        .find(|path| path.is_file())
    }

    /// Load every row from a CSV file.
    fn load_from_path(ticker: &str, path: &Path) -> Result<PriceSeries, DataError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| DataError::ParseError(e.to_string()))?;

        let mut points = Vec::new();

        for result in reader.deserialize() {
            let record: CsvRecord = result.map_err(|e| DataError::ParseError(e.to_string()))?;

            points.push(PricePoint::new(
                parse_date(&record.date)?,
                parse_price(&record.open)?,
                parse_price(&record.high)?,
                parse_price(&record.low)?,
                parse_price(&record.close)?,
                record.volume.unwrap_or_default().max(0.0) as u64,
            ));
        }

        PriceSeries::new(ticker, points)
    }
}

#[async_trait]
impl PriceSeriesProvider for CsvProvider {
    async fn fetch_daily(&self, ticker: &str, lookback: Months) -> Result<PriceSeries, DataError> {
        let path = self
            .file_for(ticker)
            .ok_or_else(|| DataError::SymbolNotFound(ticker.to_string()))?;

        let mut series = Self::load_from_path(ticker, &path)?;
        let latest = series.latest_date().ok_or(DataError::NoDataAvailable)?;
        series.retain_since(lookback_start(latest, lookback));

        info!(
            ticker,
            path = %path.display(),
            points = series.len(),
            "Loaded daily series from CSV"
        );
        Ok(series)
    }

    fn name(&self) -> &str {
        "csv"
    }
}

/// Letters, digits and `.`, `_`, `-`, `^` only, so no path separators.
fn is_file_safe(ticker: &str) -> bool {
    !ticker.is_empty()
        && ticker
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-' | '^'))
}

fn parse_price(value: &str) -> Result<Decimal, DataError> {
    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .map_err(|_| DataError::ParseError(format!("Invalid price: {}", value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_safe_tickers() {
        assert!(is_file_safe("SPY"));
        assert!(is_file_safe("BRK.B"));
        assert!(is_file_safe("^GSPC"));
        assert!(is_file_safe("BTC-USD"));
        assert!(!is_file_safe(""));
        assert!(!is_file_safe("../SPY"));
        assert!(!is_file_safe("a/b"));
        assert!(!is_file_safe("a\\b"));
        assert!(!is_file_safe("/etc/passwd"));
    }
}
