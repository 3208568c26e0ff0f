//! Alert composition, chart rendering and mail delivery.

mod chart;
mod composer;
mod delivery;
mod smtp;

pub use chart::{write_run_scoped, SvgChartRenderer};
pub use composer::{AlertSummary, NotificationComposer};
pub use delivery::{deliver, DeliveryOutcome, DeliveryPolicy};
pub use smtp::{SmtpConfig, SmtpMailer};
