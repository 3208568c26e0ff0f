//! Configuration structures.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use trendwatch_core::types::Position;

/// Rejected configuration values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("alerts.default_window must be at least 1")]
    ZeroWindow,

    #[error("position {ticker}/{label}: {reason}")]
    InvalidPosition {
        ticker: String,
        label: String,
        reason: String,
    },

    #[error("mail.max_attempts must be at least 1")]
    ZeroAttempts,

    #[error("provider.csv_dir is required when provider.kind = \"csv\"")]
    MissingCsvDir,
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub provider: ProviderSettings,
    #[serde(default)]
    pub alerts: AlertSettings,
    #[serde(default)]
    pub mail: MailSettings,
    #[serde(default)]
    pub chart: ChartSettings,
}

impl AppConfig {
    /// Check values the type system cannot.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.alerts.default_window == 0 {
            return Err(ValidationError::ZeroWindow);
        }

        for entry in &self.alerts.positions {
            let invalid = |reason: &str| ValidationError::InvalidPosition {
                ticker: entry.ticker.clone(),
                label: entry.label.clone(),
                reason: reason.to_string(),
            };
            if entry.buy_price <= Decimal::ZERO {
                return Err(invalid("buy_price must be positive"));
            }
            if entry.investment <= Decimal::ZERO {
                return Err(invalid("investment must be positive"));
            }
        }

        if self.mail.max_attempts == 0 {
            return Err(ValidationError::ZeroAttempts);
        }

        if self.provider.kind == ProviderKind::Csv && self.provider.csv_dir.is_none() {
            return Err(ValidationError::MissingCsvDir);
        }

        Ok(())
    }

    /// Configured positions grouped by upper-case ticker.
    pub fn positions_by_ticker(&self) -> HashMap<String, Vec<Position>> {
        let mut grouped: HashMap<String, Vec<Position>> = HashMap::new();
        for entry in &self.alerts.positions {
            grouped
                .entry(entry.ticker.to_uppercase())
                .or_default()
                .push(Position::new(
                    entry.label.clone(),
                    entry.investment,
                    entry.buy_price,
                ));
        }
        grouped
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "trendwatch".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

/// Source of daily prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    #[default]
    AlphaVantage,
    Csv,
}

/// Price provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    pub kind: ProviderKind,
    /// Environment variable holding the API key
    pub api_key_env: String,
    pub base_url: String,
    pub lookback_months: u32,
    /// Directory of `{TICKER}.csv` files for the csv provider
    pub csv_dir: Option<String>,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            kind: ProviderKind::AlphaVantage,
            api_key_env: "ALPHA_VANTAGE_API_KEY".to_string(),
            base_url: "https://www.alphavantage.co".to_string(),
            lookback_months: 24,
            csv_dir: None,
        }
    }
}

/// Detector settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertSettings {
    /// Moving average window used when none is given on the command line
    pub default_window: usize,
    pub return_threshold_pct: Decimal,
    pub positions: Vec<PositionEntry>,
}

impl Default for AlertSettings {
    fn default() -> Self {
        use rust_decimal_macros::dec;
        Self {
            default_window: 200,
            return_threshold_pct: dec!(20),
            positions: Vec::new(),
        }
    }
}

/// One held position in the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionEntry {
    pub ticker: String,
    pub label: String,
    pub investment: Decimal,
    pub buy_price: Decimal,
}

/// SMTP delivery settings. Credentials are read from the named variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MailSettings {
    pub enabled: bool,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub username_env: String,
    pub password_env: String,
    /// Comma-separated recipients; the sender when unset
    pub recipients_env: String,
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    /// Exit non-zero when a notification could not be delivered
    pub fail_on_error: bool,
}

impl Default for MailSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            smtp_host: "smtp.gmail.com".to_string(),
            smtp_port: 587,
            username_env: "EMAIL_ADDRESS".to_string(),
            password_env: "EMAIL_PASSWORD".to_string(),
            recipients_env: "EMAIL_RECIPIENTS".to_string(),
            max_attempts: 3,
            initial_backoff_ms: 1000,
            fail_on_error: false,
        }
    }
}

/// Chart rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartSettings {
    pub width: u32,
    pub height: u32,
    /// Keep a run-scoped copy of every chart here
    pub output_dir: Option<String>,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            width: 800,
            height: 450,
            output_dir: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn entry(ticker: &str, label: &str, investment: Decimal, buy_price: Decimal) -> PositionEntry {
        PositionEntry {
            ticker: ticker.into(),
            label: label.into(),
            investment,
            buy_price,
        }
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();

        assert!(config.validate().is_ok());
        assert_eq!(config.alerts.default_window, 200);
        assert_eq!(config.alerts.return_threshold_pct, dec!(20));
        assert_eq!(config.mail.smtp_port, 587);
        assert!(!config.mail.enabled);
    }

    #[test]
    fn test_rejects_zero_window() {
        let mut config = AppConfig::default();
        config.alerts.default_window = 0;

        assert_eq!(config.validate(), Err(ValidationError::ZeroWindow));
    }

    #[test]
    fn test_rejects_non_positive_buy_price() {
        let mut config = AppConfig::default();
        config.alerts.positions.push(entry("SPY", "Broken", dec!(100), dec!(0)));

        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidPosition { .. })
        ));
    }

    #[test]
    fn test_rejects_non_positive_investment() {
        let mut config = AppConfig::default();
        config.alerts.positions.push(entry("SPY", "Empty", dec!(-1), dec!(100)));

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_attempts() {
        let mut config = AppConfig::default();
        config.mail.max_attempts = 0;

        assert_eq!(config.validate(), Err(ValidationError::ZeroAttempts));
    }

    #[test]
    fn test_csv_provider_needs_directory() {
        let mut config = AppConfig::default();
        config.provider.kind = ProviderKind::Csv;

        assert_eq!(config.validate(), Err(ValidationError::MissingCsvDir));
    }

    #[test]
    fn test_positions_grouped_by_upper_case_ticker() {
        let mut config = AppConfig::default();
        config.alerts.positions = vec![
            entry("spy", "First", dec!(1000), dec!(400)),
            entry("SPY", "Second", dec!(500), dec!(380)),
            entry("qqq", "Tech", dec!(800), dec!(300)),
        ];

        let grouped = config.positions_by_ticker();

        assert_eq!(grouped["SPY"].len(), 2);
        assert_eq!(grouped["SPY"][1].label, "Second");
        assert_eq!(grouped["QQQ"][0].buy_price, dec!(300));
    }

    #[test]
    fn test_to_toml_round_trips_sections() {
        let text = AppConfig::default().to_toml().unwrap();

        assert!(text.contains("[alerts]"));
        assert!(text.contains("smtp_host = \"smtp.gmail.com\""));
    }
}
