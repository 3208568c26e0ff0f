//! Configuration management.

mod settings;

pub use settings::{
    AlertSettings, AppConfig, AppSettings, ChartSettings, LoggingConfig, MailSettings,
    PositionEntry, ProviderKind, ProviderSettings, ValidationError,
};

use config::{Config, ConfigError, Environment, File};
use std::path::Path;

/// Load configuration from file and environment.
///
/// Variables prefixed `TRENDWATCH__` override file values, with `__`
/// separating nested keys (`TRENDWATCH__MAIL__SMTP_PORT=465`).
pub fn load_config(path: &Path, required: bool) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(path).required(required))
        .add_source(
            Environment::with_prefix("TRENDWATCH")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    config.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(
            file,
            r#"
[provider]
kind = "csv"
csv_dir = "data"

[alerts]
default_window = 50
return_threshold_pct = 15

[[alerts.positions]]
ticker = "spy"
label = "Dip 2022"
investment = 1500
buy_price = 362.5

[mail]
enabled = true
max_attempts = 5
"#
        )
        .unwrap();

        let config = load_config(file.path(), true).unwrap();

        assert_eq!(config.provider.kind, ProviderKind::Csv);
        assert_eq!(config.provider.csv_dir.as_deref(), Some("data"));
        assert_eq!(config.alerts.default_window, 50);
        assert_eq!(config.alerts.return_threshold_pct, dec!(15));
        assert_eq!(config.alerts.positions.len(), 1);
        assert_eq!(config.alerts.positions[0].buy_price, dec!(362.5));
        assert!(config.mail.enabled);
        assert_eq!(config.mail.max_attempts, 5);
        assert_eq!(config.mail.smtp_host, "smtp.gmail.com");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_optional_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("absent.toml"), false).unwrap();

        assert_eq!(config.alerts.default_window, 200);
        assert_eq!(config.provider.kind, ProviderKind::AlphaVantage);
    }

    #[test]
    fn test_missing_required_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(&dir.path().join("absent.toml"), true).is_err());
    }
}
