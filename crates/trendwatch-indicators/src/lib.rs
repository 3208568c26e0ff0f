//! Trend indicators over daily closes.
//!
//! Currently the simple moving average that drives crossover alerts.

pub mod moving_average;

pub use moving_average::Sma;
