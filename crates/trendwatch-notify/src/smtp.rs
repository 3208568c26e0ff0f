//! Authenticated SMTP transport.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::time::Duration;
use tracing::{debug, info};
use trendwatch_core::error::DeliveryError;
use trendwatch_core::traits::MailTransport;
use trendwatch_core::types::OutgoingMail;

/// SMTP connection settings.
#[derive(Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl SmtpConfig {
    /// Create config directly.
    pub fn new(host: String, port: u16, username: String, password: String) -> Self {
        Self {
            host,
            port,
            username,
            password,
        }
    }

    /// Load credentials from the named environment variables.
    pub fn from_env(
        host: String,
        port: u16,
        username_env: &str,
        password_env: &str,
    ) -> Result<Self, DeliveryError> {
        let username = std::env::var(username_env)
            .map_err(|_| DeliveryError::Configuration(format!("{} not set", username_env)))?;
        let password = std::env::var(password_env)
            .map_err(|_| DeliveryError::Configuration(format!("{} not set", password_env)))?;

        Ok(Self {
            host,
            port,
            username,
            password,
        })
    }
}

/// Port on which the server expects TLS from the first byte.
const IMPLICIT_TLS_PORT: u16 = 465;

/// Sends alerts over SMTP. Port 465 uses implicit TLS, any other port
/// upgrades with STARTTLS. The login address is the sender.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Create a new mailer.
    pub fn new(config: SmtpConfig) -> Result<Self, DeliveryError> {
        let from: Mailbox = config
            .username
            .parse()
            .map_err(|_| DeliveryError::InvalidAddress(config.username.clone()))?;

        let builder = if uses_implicit_tls(config.port) {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
        };
        let transport = builder
            .map_err(|e| DeliveryError::Configuration(e.to_string()))?
            .port(config.port)
            .credentials(Credentials::new(config.username, config.password))
            .timeout(Some(Duration::from_secs(30)))
            .build();

        Ok(Self { transport, from })
    }

    /// The sender address.
    pub fn sender(&self) -> &Mailbox {
        &self.from
    }

    /// Build the MIME message: plain and HTML alternatives plus the chart.
    pub fn build_message(&self, mail: &OutgoingMail) -> Result<Message, DeliveryError> {
        if mail.recipients.is_empty() {
            return Err(DeliveryError::Configuration("no recipients".into()));
        }

        let mut builder = Message::builder()
            .from(self.from.clone())
            .subject(mail.notification.subject.clone());
        for recipient in &mail.recipients {
            let to: Mailbox = recipient
                .parse()
                .map_err(|_| DeliveryError::InvalidAddress(recipient.clone()))?;
            builder = builder.to(to);
        }

        let alternative = MultiPart::alternative_plain_html(
            mail.notification.text_body.clone(),
            mail.notification.html_body.clone(),
        );

        let body = match &mail.attachment {
            Some(chart) => {
                let content_type = ContentType::parse(&chart.content_type)
                    .map_err(|e| DeliveryError::Message(e.to_string()))?;
                MultiPart::mixed()
                    .multipart(alternative)
                    .singlepart(
                        Attachment::new(chart.file_name.clone())
                            .body(chart.bytes.clone(), content_type),
                    )
            }
            None => alternative,
        };

        builder
            .multipart(body)
            .map_err(|e| DeliveryError::Message(e.to_string()))
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), DeliveryError> {
        let message = self.build_message(mail)?;
        debug!(
            subject = %mail.notification.subject,
            recipients = mail.recipients.len(),
            "Sending notification"
        );

        self.transport.send(message).await.map_err(classify)?;

        info!(subject = %mail.notification.subject, "Email sent successfully");
        Ok(())
    }

    fn name(&self) -> &str {
        "smtp"
    }
}

fn uses_implicit_tls(port: u16) -> bool {
    port == IMPLICIT_TLS_PORT
}

fn classify(err: lettre::transport::smtp::Error) -> DeliveryError {
    let code = err.status().map(|c| c.to_string());
    classify_reply(code.as_deref(), err.is_permanent(), err.to_string())
}

/// Map an SMTP reply to a delivery error. Only transport errors are retried.
fn classify_reply(code: Option<&str>, permanent: bool, message: String) -> DeliveryError {
    match code {
        Some("530") | Some("534") | Some("535") => DeliveryError::Authentication(message),
        _ if permanent => DeliveryError::Rejected(message),
        _ => DeliveryError::Transport(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trendwatch_core::types::{ChartArtifact, Notification};

    fn mailer() -> SmtpMailer {
        SmtpMailer::new(SmtpConfig::new(
            "smtp.example.com".into(),
            587,
            "alerts@example.com".into(),
            "secret".into(),
        ))
        .unwrap()
    }

    fn mail(recipients: Vec<String>, attachment: Option<ChartArtifact>) -> OutgoingMail {
        OutgoingMail {
            notification: Notification {
                subject: "SPY Notification 2024-03-08".into(),
                text_body: "No action required.".into(),
                html_body: "<p>No action required.</p>".into(),
                action_required: false,
            },
            recipients,
            attachment,
        }
    }

    #[test]
    fn test_build_message_with_chart() {
        let chart = ChartArtifact {
            file_name: "SPY_2024-03-08.svg".into(),
            content_type: "image/svg+xml".into(),
            bytes: b"<svg/>".to_vec(),
        };
        let message = mailer()
            .build_message(&mail(vec!["me@example.com".into()], Some(chart)))
            .unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();

        assert!(raw.contains("Subject: SPY Notification 2024-03-08"));
        assert!(raw.contains("To: me@example.com"));
        assert!(raw.contains("multipart/mixed"));
        assert!(raw.contains("multipart/alternative"));
        assert!(raw.contains("SPY_2024-03-08.svg"));
    }

    #[test]
    fn test_build_message_rejects_bad_recipient() {
        let err = mailer()
            .build_message(&mail(vec!["not an address".into()], None))
            .unwrap_err();
        assert!(matches!(err, DeliveryError::InvalidAddress(_)));
    }

    #[test]
    fn test_build_message_requires_recipients() {
        let err = mailer().build_message(&mail(vec![], None)).unwrap_err();
        assert!(matches!(err, DeliveryError::Configuration(_)));
    }

    #[test]
    fn test_sender_is_login() {
        assert_eq!(mailer().sender().email.to_string(), "alerts@example.com");
    }

    #[test]
    fn test_implicit_tls_only_on_465() {
        assert!(uses_implicit_tls(465));
        assert!(!uses_implicit_tls(587));
        assert!(!uses_implicit_tls(25));
    }

    #[test]
    fn test_mailer_builds_for_implicit_tls_port() {
        let mailer = SmtpMailer::new(SmtpConfig::new(
            "smtp.example.com".into(),
            465,
            "alerts@example.com".into(),
            "secret".into(),
        ));
        assert!(mailer.is_ok());
    }

    #[test]
    fn test_auth_replies_are_authentication_errors() {
        for code in ["530", "534", "535"] {
            let err = classify_reply(Some(code), true, format!("{} auth failed", code));
            assert!(matches!(err, DeliveryError::Authentication(_)), "{}", code);
        }
    }

    #[test]
    fn test_permanent_reply_is_rejected() {
        let err = classify_reply(Some("550"), true, "mailbox unavailable".into());
        assert!(matches!(err, DeliveryError::Rejected(m) if m == "mailbox unavailable"));
    }

    #[test]
    fn test_transient_reply_is_transport() {
        let err = classify_reply(Some("421"), false, "service not available".into());
        assert!(matches!(err, DeliveryError::Transport(_)));
        assert!(matches!(
            classify_reply(None, false, "connection reset".into()),
            DeliveryError::Transport(_)
        ));
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = SmtpConfig::new("h".into(), 587, "u@example.com".into(), "hunter2".into());
        assert!(!format!("{:?}", config).contains("hunter2"));
    }
}
