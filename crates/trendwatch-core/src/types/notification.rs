//! Composed notifications and the artifacts sent with them.

use serde::{Deserialize, Serialize};

/// Subject and bodies of one alert email.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Subject line
    pub subject: String,
    /// Plain-text body
    pub text_body: String,
    /// HTML body
    pub html_body: String,
    /// Whether any breach fired
    pub action_required: bool,
}

/// A rendered chart held in memory.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartArtifact {
    /// Attachment file name
    pub file_name: String,
    /// MIME type of `bytes`
    pub content_type: String,
    /// Encoded image
    pub bytes: Vec<u8>,
}

/// Everything a mail transport needs to deliver one notification.
#[derive(Debug, Clone)]
pub struct OutgoingMail {
    /// The composed notification
    pub notification: Notification,
    /// Recipient addresses
    pub recipients: Vec<String>,
    /// Optional chart attachment
    pub attachment: Option<ChartArtifact>,
}
