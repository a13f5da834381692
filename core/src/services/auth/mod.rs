//! Authentication service module
//!
//! This module provides the account lifecycle built on the token protocol:
//! - Registration and username/password login
//! - Refresh token rotation
//! - Access token authentication and role checks
//! - Logout and password reset

mod config;
mod service;

#[cfg(test)]
mod tests;

pub use config::AuthServiceConfig;
pub use service::AuthService;
