//! Mail Service Module
//!
//! Implementations of the core `MailSender` trait:
//!
//! - **SMTP**: Delivery through a relay via lettre
//! - **Mock**: In-memory outbox with log output for development and tests

use async_trait::async_trait;

use auth_core::errors::MailError;
use auth_core::services::password_reset::MailSender;
use auth_shared::config::{MailConfig, MailProvider};

pub mod mock_mail;
pub mod smtp;

pub use mock_mail::{MockMailService, OutgoingMail};
pub use smtp::SmtpMailService;

use crate::InfrastructureError;

/// Mail service selected from configuration
#[derive(Clone)]
pub enum MailService {
    Smtp(SmtpMailService),
    Mock(MockMailService),
}

#[async_trait]
impl MailSender for MailService {
    async fn send(&self, to: &str, subject: &str, body_html: &str) -> Result<(), MailError> {
        match self {
            MailService::Smtp(service) => service.send(to, subject, body_html).await,
            MailService::Mock(service) => service.send(to, subject, body_html).await,
        }
    }
}

/// Create a mail service based on configuration
///
/// # Arguments
///
/// * `config` - Mail configuration containing provider settings
pub fn create_mail_service(config: &MailConfig) -> Result<MailService, InfrastructureError> {
    match config.provider {
        MailProvider::Mock => {
            tracing::warn!("Using mock mail service; messages are logged, not delivered");
            Ok(MailService::Mock(MockMailService::new()))
        }
        MailProvider::Smtp => {
            if !config.has_credentials() {
                tracing::warn!(host = %config.host, "SMTP relay configured without credentials");
            }
            Ok(MailService::Smtp(SmtpMailService::new(config)?))
        }
    }
}
