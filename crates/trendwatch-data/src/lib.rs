//! Daily price providers.
//!
//! - [`AlphaVantageProvider`] fetches `TIME_SERIES_DAILY` over HTTPS
//! - [`CsvProvider`] replays history from local CSV files

mod alpha_vantage;
mod csv_source;
mod dates;

pub use alpha_vantage::{AlphaVantageConfig, AlphaVantageProvider};
pub use csv_source::CsvProvider;
