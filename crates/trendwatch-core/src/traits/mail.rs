//! Mail transport trait definition.

use crate::error::DeliveryError;
use crate::types::OutgoingMail;
use async_trait::async_trait;

/// Delivers composed notifications.
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Send one message. A single attempt; retries belong to the caller.
    async fn send(&self, mail: &OutgoingMail) -> Result<(), DeliveryError>;

    /// Get the transport name.
    fn name(&self) -> &str;
}
