//! Identity entity representing a registered account.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role granted to an identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular account
    #[default]
    User,
    /// Administrative account
    Admin,
}

impl Role {
    /// String form used in token claims and storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    /// Whether this role satisfies `required`. Admin satisfies every role.
    pub fn grants(&self, required: Role) -> bool {
        *self == Role::Admin || *self == required
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

/// A registered account as seen by the core.
///
/// The password hash stays inside the credential store and is never part of
/// this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Unique identifier for the identity
    pub id: Uuid,

    /// Login name, unique within the store
    pub username: String,

    /// Contact address, unique within the store (stored lowercase)
    pub email: String,

    /// Granted role
    pub role: Role,

    /// Timestamp when the identity was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the identity was last updated
    pub updated_at: DateTime<Utc>,
}

impl Identity {
    /// Creates a new identity with a fresh id
    pub fn new(username: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            email: email.into(),
            role,
            created_at: now,
            updated_at: now,
        }
    }

    /// Checks if the identity holds the admin role
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Registration input handed to the credential store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIdentity {
    pub username: String,
    pub email: String,
    pub role: Role,
}

impl NewIdentity {
    pub fn new(username: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            role,
        }
    }
}
