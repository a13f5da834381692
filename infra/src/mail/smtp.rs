//! SMTP mail delivery via lettre

use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{error, info};

use auth_core::errors::MailError;
use auth_core::services::password_reset::MailSender;
use auth_shared::config::MailConfig;
use auth_shared::validation::mask_email;

use crate::InfrastructureError;

/// Mail service delivering through an SMTP relay
#[derive(Clone)]
pub struct SmtpMailService {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailService {
    /// Build the transport from configuration
    ///
    /// STARTTLS is required when `use_tls` is set; otherwise the connection
    /// is plaintext, which is only meant for local relays.
    pub fn new(config: &MailConfig) -> Result<Self, InfrastructureError> {
        let from: Mailbox = config.from_address.parse().map_err(|e| {
            InfrastructureError::Config(format!(
                "Invalid sender address {}: {}",
                config.from_address, e
            ))
        })?;

        let mut builder = if config.use_tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
                .map_err(|e| InfrastructureError::Mail(format!("Invalid SMTP relay: {}", e)))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
        };
        builder = builder.port(config.port);

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        info!(
            host = %config.host,
            port = config.port,
            tls = config.use_tls,
            "SMTP mail service configured"
        );

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }

    fn build_message(&self, to: &str, subject: &str, body_html: &str) -> Result<Message, MailError> {
        let recipient: Mailbox = to.parse().map_err(|_| MailError::InvalidAddress {
            address: mask_email(to),
        })?;

        Message::builder()
            .from(self.from.clone())
            .to(recipient)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(body_html.to_string())
            .map_err(|e| MailError::Delivery {
                message: format!("Failed to build message: {}", e),
            })
    }
}

#[async_trait]
impl MailSender for SmtpMailService {
    async fn send(&self, to: &str, subject: &str, body_html: &str) -> Result<(), MailError> {
        let message = self.build_message(to, subject, body_html)?;

        match self.transport.send(message).await {
            Ok(_) => {
                info!(event = "mail_sent", to = %mask_email(to), "Mail delivered to relay");
                Ok(())
            }
            Err(e) => {
                error!(event = "mail_failed", to = %mask_email(to), error = %e, "SMTP delivery failed");
                Err(MailError::Delivery {
                    message: e.to_string(),
                })
            }
        }
    }
}
