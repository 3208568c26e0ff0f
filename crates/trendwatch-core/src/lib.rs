//! Core types and traits for trendwatch.
//!
//! This crate provides the foundational building blocks including:
//! - Price data types (PricePoint, PriceSeries, MovingAverageSeries)
//! - Static positions and the breach events detected against them
//! - Notification and chart artifact types
//! - Traits for the external collaborators: price providers, chart
//!   renderers and mail transports

pub mod types;
pub mod traits;
pub mod error;

pub use error::{AlertError, AlertResult};
pub use types::*;
pub use traits::*;
