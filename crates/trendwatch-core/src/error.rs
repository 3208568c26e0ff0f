//! Error types for trendwatch.

use thiserror::Error;

/// Top-level alerting error.
#[derive(Error, Debug)]
pub enum AlertError {
    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Indicator error: {0}")]
    Indicator(#[from] IndicatorError),

    #[error("Delivery error: {0}")]
    Delivery(#[from] DeliveryError),

    #[error("Chart error: {0}")]
    Chart(String),

    #[error("Template error: {0}")]
    Template(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Price provider errors.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("No data available for the requested range")]
    NoDataAvailable,

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid series: {0}")]
    InvalidSeries(String),
}

/// Indicator and detector calculation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndicatorError {
    #[error("Insufficient data: need {required} points, have {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Mail delivery errors.
#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Message build failed: {0}")]
    Message(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Rejected by server: {0}")]
    Rejected(String),

    #[error("Transport error: {0}")]
    Transport(String),
}

impl DeliveryError {
    /// Whether another attempt could succeed without a configuration change.
    pub fn is_transient(&self) -> bool {
        matches!(self, DeliveryError::Transport(_))
    }
}

/// Result type alias for alerting operations.
pub type AlertResult<T> = Result<T, AlertError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_data_message() {
        let err = AlertError::from(IndicatorError::InsufficientData {
            required: 200,
            available: 150,
        });
        assert_eq!(
            err.to_string(),
            "Indicator error: Insufficient data: need 200 points, have 150"
        );
    }

    #[test]
    fn test_only_transport_errors_are_transient() {
        assert!(DeliveryError::Transport("timeout".into()).is_transient());
        assert!(!DeliveryError::Authentication("535".into()).is_transient());
        assert!(!DeliveryError::Rejected("550".into()).is_transient());
        assert!(!DeliveryError::InvalidAddress("nobody".into()).is_transient());
    }
}
