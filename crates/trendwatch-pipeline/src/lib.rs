//! Per-ticker alert pipeline.
//!
//! One run per ticker: fetch, moving average, detectors, compose, chart,
//! deliver. Tickers are processed one after another.

mod engine;
mod report;

pub use engine::{AlertPipeline, PipelineConfig};
pub use report::{BatchReport, RunReport, TickerFailure};
