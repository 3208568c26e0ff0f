//! Mail delivery with retry and backoff.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, info, warn};
use trendwatch_core::traits::MailTransport;
use trendwatch_core::types::OutgoingMail;

/// Retry policy for a single notification.
#[derive(Debug, Clone, Copy)]
pub struct DeliveryPolicy {
    /// Attempts including the first one
    pub max_attempts: u32,
    /// Wait before the second attempt; doubles after each failure
    pub initial_backoff: Duration,
}

impl Default for DeliveryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_secs(1),
        }
    }
}

/// Final state of a delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeliveryOutcome {
    Delivered { attempts: u32 },
    Failed { attempts: u32, reason: String },
    Disabled,
}

impl DeliveryOutcome {
    /// Whether the notification was lost.
    pub fn is_failure(&self) -> bool {
        matches!(self, DeliveryOutcome::Failed { .. })
    }
}

/// Send `mail`, retrying transient failures.
///
/// Never returns an error: the outcome is logged and handed back so the
/// caller decides whether a lost notification should fail the process.
pub async fn deliver(
    transport: &dyn MailTransport,
    mail: &OutgoingMail,
    policy: &DeliveryPolicy,
) -> DeliveryOutcome {
    let max_attempts = policy.max_attempts.max(1);
    let mut backoff = policy.initial_backoff;
    let mut attempt = 0;

    loop {
        attempt += 1;

        match transport.send(mail).await {
            Ok(()) => {
                info!(
                    transport = transport.name(),
                    attempt,
                    "Notification delivered"
                );
                return DeliveryOutcome::Delivered { attempts: attempt };
            }
            Err(e) if e.is_transient() && attempt < max_attempts => {
                warn!(
                    transport = transport.name(),
                    attempt,
                    backoff_ms = backoff.as_millis() as u64,
                    error = %e,
                    "Delivery failed, retrying"
                );
                tokio::time::sleep(backoff).await;
                backoff = backoff.saturating_mul(2);
            }
            Err(e) => {
                error!(
                    transport = transport.name(),
                    attempt,
                    error = %e,
                    subject = %mail.notification.subject,
                    "Failed to send email"
                );
                return DeliveryOutcome::Failed {
                    attempts: attempt,
                    reason: e.to_string(),
                };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use trendwatch_core::error::DeliveryError;
    use trendwatch_core::types::Notification;

    /// Fails the first `failures` sends with the given error kind.
    struct FlakyTransport {
        failures: u32,
        permanent: bool,
        calls: AtomicU32,
    }

    impl FlakyTransport {
        fn new(failures: u32, permanent: bool) -> Self {
            Self {
                failures,
                permanent,
                calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl MailTransport for FlakyTransport {
        async fn send(&self, _mail: &OutgoingMail) -> Result<(), DeliveryError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call <= self.failures {
                if self.permanent {
                    return Err(DeliveryError::Authentication("535 bad credentials".into()));
                }
                return Err(DeliveryError::Transport("connection reset".into()));
            }
            Ok(())
        }

        fn name(&self) -> &str {
            "flaky"
        }
    }

    fn mail() -> OutgoingMail {
        OutgoingMail {
            notification: Notification {
                subject: "SPY Notification 2024-03-08".into(),
                text_body: String::new(),
                html_body: String::new(),
                action_required: false,
            },
            recipients: vec!["me@example.com".into()],
            attachment: None,
        }
    }

    fn fast_policy(max_attempts: u32) -> DeliveryPolicy {
        DeliveryPolicy {
            max_attempts,
            initial_backoff: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn test_delivers_first_try() {
        let transport = FlakyTransport::new(0, false);
        let outcome = deliver(&transport, &mail(), &fast_policy(3)).await;

        assert_eq!(outcome, DeliveryOutcome::Delivered { attempts: 1 });
    }

    #[tokio::test]
    async fn test_retries_transient_failures() {
        let transport = FlakyTransport::new(2, false);
        let outcome = deliver(&transport, &mail(), &fast_policy(3)).await;

        assert_eq!(outcome, DeliveryOutcome::Delivered { attempts: 3 });
        assert_eq!(transport.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let transport = FlakyTransport::new(5, false);
        let outcome = deliver(&transport, &mail(), &fast_policy(2)).await;

        assert!(outcome.is_failure());
        assert_eq!(
            outcome,
            DeliveryOutcome::Failed {
                attempts: 2,
                reason: "Transport error: connection reset".into()
            }
        );
    }

    #[tokio::test]
    async fn test_does_not_retry_permanent_failures() {
        let transport = FlakyTransport::new(1, true);
        let outcome = deliver(&transport, &mail(), &fast_policy(3)).await;

        assert!(matches!(outcome, DeliveryOutcome::Failed { attempts: 1, .. }));
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
    }
}
