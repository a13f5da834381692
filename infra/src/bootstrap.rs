//! Service wiring from configuration
//!
//! Builds the token, password reset and authentication services over a
//! chosen set of stores and a mail service.

use std::sync::Arc;

use tracing::{info, warn};

use auth_core::errors::{DomainError, DomainResult};
use auth_core::repositories::{CredentialStore, ResetTokenRepository};
use auth_core::services::auth::{AuthService, AuthServiceConfig};
use auth_core::services::password_reset::{
    MailSender, PasswordResetService, PasswordResetServiceConfig, ResetTokenCleanupConfig,
    ResetTokenCleanupService,
};
use auth_core::services::token::{TokenService, TokenServiceConfig};
use auth_shared::config::{AppConfig, AuthConfig};

use crate::mail::{create_mail_service, MailService};
use crate::memory::{InMemoryCredentialStore, InMemoryResetTokenStore};

#[cfg(feature = "mysql")]
use crate::database::{DatabasePool, MySqlCredentialStore, MySqlResetTokenRepository};
#[cfg(feature = "mysql")]
use crate::security::PasswordHasher;

/// Fully wired services sharing one set of stores
pub struct AuthStack<C, R, M>
where
    C: CredentialStore + 'static,
    R: ResetTokenRepository + 'static,
    M: MailSender,
{
    pub auth: Arc<AuthService<C, R, M>>,
    pub tokens: Arc<TokenService<C>>,
    pub cleanup: Arc<ResetTokenCleanupService<R>>,
    pub store: Arc<C>,
    pub reset_tokens: Arc<R>,
}

pub type InMemoryAuthStack = AuthStack<InMemoryCredentialStore, InMemoryResetTokenStore, MailService>;

#[cfg(feature = "mysql")]
pub type MySqlAuthStack = AuthStack<MySqlCredentialStore, MySqlResetTokenRepository, MailService>;

/// Wire the services over the given stores
///
/// # Errors
///
/// Returns `DomainError::Config` if the token or reset settings are invalid.
pub fn assemble<C, R, M>(
    store: Arc<C>,
    reset_tokens: Arc<R>,
    mailer: Arc<M>,
    config: &AuthConfig,
) -> DomainResult<AuthStack<C, R, M>>
where
    C: CredentialStore + 'static,
    R: ResetTokenRepository + 'static,
    M: MailSender,
{
    let token_config = TokenServiceConfig::from_auth_config(config)?;
    let tokens = Arc::new(TokenService::new(store.clone(), token_config)?);

    let reset_config =
        PasswordResetServiceConfig::from_config(&config.password_reset, config.password_policy)?;
    let password_reset = Arc::new(PasswordResetService::new(
        store.clone(),
        reset_tokens.clone(),
        mailer,
        reset_config,
    ));

    let auth = Arc::new(AuthService::new(
        store.clone(),
        tokens.clone(),
        password_reset,
        AuthServiceConfig::from_auth_config(config),
    ));

    let cleanup = Arc::new(ResetTokenCleanupService::new(
        reset_tokens.clone(),
        ResetTokenCleanupConfig::default(),
    ));

    Ok(AuthStack {
        auth,
        tokens,
        cleanup,
        store,
        reset_tokens,
    })
}

/// Refuse to run production with the built-in development secret
fn check_signing_secret(config: &AppConfig) -> DomainResult<()> {
    if !config.auth.jwt.is_using_default_secret() {
        return Ok(());
    }
    if config.environment.is_production() {
        return Err(DomainError::config(
            "JWT_SECRET must be set in production",
        ));
    }
    warn!("Using the default JWT secret; set JWT_SECRET outside development");
    Ok(())
}

/// Services over process-local stores
pub fn in_memory(config: &AppConfig) -> DomainResult<InMemoryAuthStack> {
    check_signing_secret(config)?;
    let mailer = create_mail_service(&config.mail)?;

    info!(environment = %config.environment, "Wiring in-memory auth services");
    assemble(
        Arc::new(InMemoryCredentialStore::new()),
        Arc::new(InMemoryResetTokenStore::new()),
        Arc::new(mailer),
        &config.auth,
    )
}

/// Services over MySQL, after applying migrations
#[cfg(feature = "mysql")]
pub async fn mysql(config: &AppConfig) -> DomainResult<MySqlAuthStack> {
    check_signing_secret(config)?;
    let mailer = create_mail_service(&config.mail)?;

    let pool = DatabasePool::new(config.database.clone()).await?;
    if !pool.health_check().await? {
        return Err(DomainError::internal("Database health check failed"));
    }
    pool.run_migrations().await?;

    info!(environment = %config.environment, "Wiring MySQL auth services");
    assemble(
        Arc::new(MySqlCredentialStore::new(
            pool.get_pool().clone(),
            PasswordHasher::default(),
        )),
        Arc::new(MySqlResetTokenRepository::new(pool.get_pool().clone())),
        Arc::new(mailer),
        &config.auth,
    )
}
