//! Traits for the indicator and the collaborators around the detectors.

mod chart;
mod indicator;
mod mail;
mod provider;

pub use chart::ChartRenderer;
pub use indicator::Indicator;
pub use mail::MailTransport;
pub use provider::PriceSeriesProvider;
