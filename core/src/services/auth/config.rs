//! Configuration for the authentication service

use auth_shared::config::{AuthConfig, PasswordPolicy};

use crate::domain::entities::identity::Role;

/// Configuration for the authentication service
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
    /// Whether to allow registration of new identities
    pub allow_registration: bool,
    /// Role given to newly registered identities
    pub default_role: Role,
    /// Rules applied to passwords on registration
    pub password_policy: PasswordPolicy,
}

impl Default for AuthServiceConfig {
    fn default() -> Self {
        Self {
            allow_registration: true,
            default_role: Role::User,
            password_policy: PasswordPolicy::default(),
        }
    }
}

impl AuthServiceConfig {
    pub fn from_auth_config(config: &AuthConfig) -> Self {
        Self {
            allow_registration: config.allow_registration,
            default_role: Role::User,
            password_policy: config.password_policy,
        }
    }
}
