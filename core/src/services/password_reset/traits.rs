//! Trait for outbound mail integration

use async_trait::async_trait;

use crate::errors::MailError;

/// Trait for mail delivery integration
#[async_trait]
pub trait MailSender: Send + Sync {
    /// Send an HTML message to a single recipient
    async fn send(&self, to: &str, subject: &str, body_html: &str) -> Result<(), MailError>;
}
