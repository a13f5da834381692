//! Mock implementation of MailSender for testing

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use url::Url;

use crate::errors::MailError;

use super::traits::MailSender;

/// A message captured by the mock mailer
#[derive(Debug, Clone)]
pub struct SentMail {
    pub to: String,
    pub subject: String,
    pub body_html: String,
}

impl SentMail {
    /// Raw reset token from the `token` parameter of the first link in the body
    pub fn reset_token(&self) -> Option<String> {
        let start = self.body_html.find("href=\"")? + "href=\"".len();
        let end = start + self.body_html[start..].find('"')?;
        let link = Url::parse(&self.body_html[start..end]).ok()?;
        link.query_pairs()
            .find(|(key, _)| key == "token")
            .map(|(_, value)| value.into_owned())
    }
}

/// Mock mail sender recording every message
#[derive(Clone, Default)]
pub struct MockMailSender {
    sent: Arc<Mutex<Vec<SentMail>>>,
    should_fail: Arc<AtomicBool>,
}

impl MockMailSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let sender = Self::default();
        sender.should_fail.store(true, Ordering::SeqCst);
        sender
    }

    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn last_token(&self) -> Option<String> {
        self.sent.lock().unwrap().last().and_then(SentMail::reset_token)
    }
}

#[async_trait]
impl MailSender for MockMailSender {
    async fn send(&self, to: &str, subject: &str, body_html: &str) -> Result<(), MailError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(MailError::Delivery {
                message: "mock relay unavailable".to_string(),
            });
        }
        self.sent.lock().unwrap().push(SentMail {
            to: to.to_string(),
            subject: subject.to_string(),
            body_html: body_html.to_string(),
        });
        Ok(())
    }
}
