//! MySQL repository implementations

mod credential_store_impl;
mod reset_token_repository_impl;

pub use credential_store_impl::MySqlCredentialStore;
pub use reset_token_repository_impl::MySqlResetTokenRepository;

/// Wrap a SQLx error in a domain internal error with context
pub(crate) fn db_error(context: &str, err: sqlx::Error) -> auth_core::errors::DomainError {
    auth_core::errors::DomainError::Internal {
        message: format!("{}: {}", context, err),
    }
}
