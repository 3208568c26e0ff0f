//! Breach detection for trend alerts.
//!
//! Each detector is a pure function of the price history fetched for the
//! current run; nothing is carried between runs.

mod crossover;
mod drawdown;
mod percent;
mod returns;

pub use crossover::{CrossoverDetector, CrossoverOutcome};
pub use drawdown::{DrawdownDetector, DrawdownReport};
pub use percent::round_pct;
pub use returns::{PositionReturn, ReturnEvaluation, ReturnEvaluator};
