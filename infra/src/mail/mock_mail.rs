//! Mock Mail Service Implementation
//!
//! Records messages in memory and logs them instead of sending. Used in
//! development and by the integration tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{info, warn};
use url::Url;

use auth_core::errors::MailError;
use auth_core::services::password_reset::MailSender;
use auth_shared::validation::{is_valid_email, mask_email};

/// A message captured by the mock service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub body_html: String,
}

impl OutgoingMail {
    /// First link in the HTML body
    pub fn link(&self) -> Option<Url> {
        let start = self.body_html.find("href=\"")? + "href=\"".len();
        let end = start + self.body_html[start..].find('"')?;
        Url::parse(&self.body_html[start..end]).ok()
    }

    /// Value of the `token` query parameter of the first link
    pub fn reset_token(&self) -> Option<String> {
        self.link()?
            .query_pairs()
            .find(|(key, _)| key == "token")
            .map(|(_, value)| value.into_owned())
    }
}

/// Mock mail service for development and testing
#[derive(Clone, Default)]
pub struct MockMailService {
    outbox: Arc<RwLock<Vec<OutgoingMail>>>,
    /// Whether to simulate delivery failures
    simulate_failure: Arc<AtomicBool>,
}

impl MockMailService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable failure simulation
    pub fn set_simulate_failure(&self, simulate: bool) {
        self.simulate_failure.store(simulate, Ordering::SeqCst);
    }

    /// All recorded messages, oldest first
    pub async fn outbox(&self) -> Vec<OutgoingMail> {
        self.outbox.read().await.clone()
    }

    pub async fn message_count(&self) -> usize {
        self.outbox.read().await.len()
    }

    /// Most recent message sent to `to`
    pub async fn last_sent_to(&self, to: &str) -> Option<OutgoingMail> {
        self.outbox
            .read()
            .await
            .iter()
            .rev()
            .find(|mail| mail.to == to)
            .cloned()
    }
}

#[async_trait]
impl MailSender for MockMailService {
    async fn send(&self, to: &str, subject: &str, body_html: &str) -> Result<(), MailError> {
        if !is_valid_email(to) {
            return Err(MailError::InvalidAddress {
                address: mask_email(to),
            });
        }

        if self.simulate_failure.load(Ordering::SeqCst) {
            warn!(to = %mask_email(to), "Simulated mail delivery failure");
            return Err(MailError::Delivery {
                message: "Simulated delivery failure".to_string(),
            });
        }

        info!(
            event = "mail_sent",
            provider = "mock",
            to = %mask_email(to),
            subject,
            "Mail recorded"
        );

        self.outbox.write().await.push(OutgoingMail {
            to: to.to_string(),
            subject: subject.to_string(),
            body_html: body_html.to_string(),
        });
        Ok(())
    }
}
