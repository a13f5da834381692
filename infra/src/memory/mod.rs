//! In-memory store implementations
//!
//! Process-local stores for development and integration tests. Every
//! compare-and-swap happens under a single write lock.

pub mod credential_store;
pub mod reset_token_store;

pub use credential_store::InMemoryCredentialStore;
pub use reset_token_store::InMemoryResetTokenStore;
