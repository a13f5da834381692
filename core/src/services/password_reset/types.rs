//! Types for password reset results

/// Internal outcome of a reset request
///
/// Only used for control flow and logging; callers of
/// `AuthService::forgot_password` see the same result for all three.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetRequestOutcome {
    /// A token was stored and the mail collaborator accepted the message
    Dispatched,
    /// No identity has this email; nothing was stored or sent
    UnknownEmail,
    /// A token was stored but the mail could not be delivered
    MailDeliveryFailed,
}
