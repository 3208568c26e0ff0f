//! Alpha Vantage daily time series provider.

use async_trait::async_trait;
use chrono::{Months, Utc};
use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::str::FromStr;
use tracing::{debug, info};
use trendwatch_core::error::DataError;
use trendwatch_core::traits::PriceSeriesProvider;
use trendwatch_core::types::{PricePoint, PriceSeries};

use crate::dates::{lookback_start, parse_date};

/// Alpha Vantage API configuration.
#[derive(Debug, Clone)]
pub struct AlphaVantageConfig {
    pub api_key: String,
    pub base_url: String,
}

impl AlphaVantageConfig {
    /// Create config directly with an API key.
    pub fn new(api_key: String, base_url: String) -> Self {
        Self { api_key, base_url }
    }

    /// Load the API key from the named environment variable.
    pub fn from_env(api_key_env: &str, base_url: String) -> Result<Self, DataError> {
        let api_key = std::env::var(api_key_env)
            .map_err(|_| DataError::Authentication(format!("{} not set", api_key_env)))?;

        Ok(Self { api_key, base_url })
    }
}

/// `TIME_SERIES_DAILY` response. Errors arrive with HTTP 200 and one of
/// the message fields set instead of the series.
#[derive(Debug, Deserialize)]
struct DailyResponse {
    #[serde(rename = "Time Series (Daily)")]
    time_series: Option<BTreeMap<String, DailyRecord>>,
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DailyRecord {
    #[serde(rename = "1. open")]
    open: String,
    #[serde(rename = "2. high")]
    high: String,
    #[serde(rename = "3. low")]
    low: String,
    #[serde(rename = "4. close")]
    close: String,
    #[serde(rename = "5. volume")]
    volume: String,
}

/// Alpha Vantage client.
pub struct AlphaVantageProvider {
    config: AlphaVantageConfig,
    client: Client,
}

impl AlphaVantageProvider {
    /// Create a new provider.
    pub fn new(config: AlphaVantageConfig) -> Result<Self, DataError> {
        let client = Client::builder()
            .user_agent(concat!("trendwatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DataError::ConnectionError(e.to_string()))?;

        Ok(Self { config, client })
    }
}

#[async_trait]
impl PriceSeriesProvider for AlphaVantageProvider {
    async fn fetch_daily(&self, ticker: &str, lookback: Months) -> Result<PriceSeries, DataError> {
        let url = format!("{}/query", self.config.base_url.trim_end_matches('/'));
        debug!(ticker, url = %url, "Requesting daily series");

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("function", "TIME_SERIES_DAILY"),
                ("symbol", ticker),
                ("outputsize", "full"),
                ("datatype", "json"),
                ("apikey", self.config.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| DataError::ConnectionError(e.to_string()))?;

        let status = resp.status();
        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return Err(DataError::Authentication(status.to_string()));
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(DataError::RateLimited(status.to_string()));
        }
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(DataError::ConnectionError(format!("{}: {}", status, text)));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| DataError::ConnectionError(e.to_string()))?;

        let mut series = parse_daily_response(ticker, &body)?;
        if let Some(latest) = series.latest_date() {
            let today = Utc::now().date_naive().max(latest);
            series.retain_since(lookback_start(today, lookback));
        }

        if series.is_empty() {
            return Err(DataError::NoDataAvailable);
        }

        info!(
            ticker,
            points = series.len(),
            latest = ?series.latest_date(),
            "Fetched daily series"
        );
        Ok(series)
    }

    fn name(&self) -> &str {
        "alpha_vantage"
    }
}

/// Turn a raw `TIME_SERIES_DAILY` body into an ascending series.
fn parse_daily_response(ticker: &str, body: &str) -> Result<PriceSeries, DataError> {
    let data: DailyResponse =
        serde_json::from_str(body).map_err(|e| DataError::ParseError(e.to_string()))?;

    if let Some(message) = data.error_message {
        debug!(ticker, message = %message, "Provider rejected symbol");
        return Err(DataError::SymbolNotFound(ticker.to_string()));
    }
    if let Some(message) = data.information.or(data.note) {
        if message.to_lowercase().contains("apikey") {
            return Err(DataError::Authentication(message));
        }
        return Err(DataError::RateLimited(message));
    }

    let time_series = data.time_series.ok_or(DataError::NoDataAvailable)?;

    let points = time_series
        .into_iter()
        .map(|(date, record)| -> Result<PricePoint, DataError> {
            Ok(PricePoint::new(
                parse_date(&date)?,
                parse_price(&record.open)?,
                parse_price(&record.high)?,
                parse_price(&record.low)?,
                parse_price(&record.close)?,
                record
                    .volume
                    .trim()
                    .parse()
                    .map_err(|_| DataError::ParseError(format!("Invalid volume: {}", record.volume)))?,
            ))
        })
        .collect::<Result<Vec<_>, _>>()?;

    PriceSeries::new(ticker, points)
}

fn parse_price(value: &str) -> Result<Decimal, DataError> {
    Decimal::from_str(value.trim())
        .map_err(|_| DataError::ParseError(format!("Invalid price: {}", value)))
}
