pub mod credential;
pub mod reset_token;

pub use credential::CredentialStore;
pub use reset_token::ResetTokenRepository;

#[cfg(test)]
pub use credential::MockCredentialStore;
#[cfg(test)]
pub use reset_token::MockResetTokenRepository;
