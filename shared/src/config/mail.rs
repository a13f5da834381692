//! Outbound mail configuration

use serde::{Deserialize, Serialize};

use super::env_or;

/// Which mail backend delivers outbound messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MailProvider {
    /// Deliver through an SMTP relay
    Smtp,
    /// Record messages in memory and log them
    #[default]
    Mock,
}

impl std::str::FromStr for MailProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "smtp" => Ok(MailProvider::Smtp),
            "mock" => Ok(MailProvider::Mock),
            _ => Err(format!("Unknown mail provider: {}", s)),
        }
    }
}

/// Mail configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MailConfig {
    /// Mail backend
    #[serde(default)]
    pub provider: MailProvider,

    /// SMTP host
    pub host: String,

    /// SMTP port
    pub port: u16,

    /// SMTP username
    #[serde(default)]
    pub username: Option<String>,

    /// SMTP password
    #[serde(default)]
    pub password: Option<String>,

    /// Sender address placed in the From header
    pub from_address: String,

    /// Use STARTTLS when talking to the relay
    #[serde(default = "default_use_tls")]
    pub use_tls: bool,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            provider: MailProvider::Mock,
            host: String::from("localhost"),
            port: 587,
            username: None,
            password: None,
            from_address: String::from("no-reply@localhost"),
            use_tls: default_use_tls(),
        }
    }
}

impl MailConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            provider: env_or("MAIL_PROVIDER", defaults.provider),
            host: std::env::var("SMTP_HOST").unwrap_or(defaults.host),
            port: env_or("SMTP_PORT", defaults.port),
            username: std::env::var("SMTP_USERNAME").ok(),
            password: std::env::var("SMTP_PASSWORD").ok(),
            from_address: std::env::var("MAIL_FROM").unwrap_or(defaults.from_address),
            use_tls: env_or("SMTP_USE_TLS", defaults.use_tls),
        }
    }

    /// Whether SMTP credentials are configured
    pub fn has_credentials(&self) -> bool {
        self.username.is_some() && self.password.is_some()
    }
}

fn default_use_tls() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mail_provider_from_str() {
        assert_eq!("SMTP".parse::<MailProvider>().unwrap(), MailProvider::Smtp);
        assert_eq!("mock".parse::<MailProvider>().unwrap(), MailProvider::Mock);
        assert!("sendgrid".parse::<MailProvider>().is_err());
    }

    #[test]
    fn test_mail_config_credentials() {
        let mut config = MailConfig::default();
        assert!(!config.has_credentials());

        config.username = Some("mailer".to_string());
        config.password = Some("secret".to_string());
        assert!(config.has_credentials());
    }
}
