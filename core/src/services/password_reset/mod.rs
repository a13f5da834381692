//! Password reset module
//!
//! This module provides the out-of-band password reset workflow:
//! - Single-use reset token generation, stored by hash only
//! - Reset link delivery through a mail collaborator
//! - Atomic token redemption and password update
//! - Background cleanup of expired reset tokens

mod cleanup;
mod config;
mod service;
mod traits;
mod types;

#[cfg(test)]
pub mod mock;
#[cfg(test)]
mod tests;

pub use cleanup::{CleanupResult, ResetTokenCleanupConfig, ResetTokenCleanupService};
pub use config::PasswordResetServiceConfig;
pub use service::PasswordResetService;
pub use traits::MailSender;
pub use types::ResetRequestOutcome;

#[cfg(test)]
pub use mock::{MockMailSender, SentMail};
