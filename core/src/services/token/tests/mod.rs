//! Tests for the token service

mod service_tests;
mod signer_tests;

use std::sync::Arc;

use crate::domain::entities::identity::{Identity, NewIdentity, Role};
use crate::repositories::{CredentialStore, MockCredentialStore};

use super::TokenServiceConfig;

pub(super) const TEST_SECRET: &str = "test-secret-that-is-at-least-32-bytes-long";

pub(super) fn test_config() -> TokenServiceConfig {
    TokenServiceConfig {
        jwt_secret: TEST_SECRET.to_string(),
        ..Default::default()
    }
}

pub(super) async fn store_with_alice() -> (Arc<MockCredentialStore>, Identity) {
    let store = Arc::new(MockCredentialStore::new());
    let identity = store
        .create(
            NewIdentity::new("alice", "alice@example.com", Role::User),
            "correct horse battery",
        )
        .await
        .unwrap();
    (store, identity)
}
