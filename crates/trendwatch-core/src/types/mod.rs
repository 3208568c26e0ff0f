//! Core data types for trendwatch.

mod event;
mod moving_average;
mod notification;
mod position;
mod price;

pub use event::{BreachEvent, CrossDirection};
pub use moving_average::MovingAverageSeries;
pub use notification::{ChartArtifact, Notification, OutgoingMail};
pub use position::Position;
pub use price::{PricePoint, PriceSeries};
