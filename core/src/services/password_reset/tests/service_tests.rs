//! Unit tests for password reset service

use std::sync::Arc;

use chrono::{Duration, Utc};
use url::Url;

use crate::domain::entities::identity::{Identity, NewIdentity, Role};
use crate::domain::entities::token::{hash_token, StoredRefreshToken};
use crate::errors::{DomainError, TokenError, ValidationError};
use crate::repositories::{CredentialStore, MockCredentialStore, MockResetTokenRepository};
use crate::services::password_reset::{
    MockMailSender, PasswordResetService, PasswordResetServiceConfig, ResetRequestOutcome,
};

type TestService =
    PasswordResetService<MockCredentialStore, MockResetTokenRepository, MockMailSender>;

struct Fixture {
    service: TestService,
    store: Arc<MockCredentialStore>,
    tokens: Arc<MockResetTokenRepository>,
    mailer: Arc<MockMailSender>,
    alice: Identity,
}

async fn fixture_with(mailer: MockMailSender) -> Fixture {
    let store = Arc::new(MockCredentialStore::new());
    let tokens = Arc::new(MockResetTokenRepository::new());
    let mailer = Arc::new(mailer);
    let alice = store
        .create(
            NewIdentity::new("alice", "alice@example.com", Role::User),
            "old-password-1",
        )
        .await
        .unwrap();

    let config =
        PasswordResetServiceConfig::new(Url::parse("https://app.example.com/reset-password").unwrap());
    let service = PasswordResetService::new(store.clone(), tokens.clone(), mailer.clone(), config);

    Fixture {
        service,
        store,
        tokens,
        mailer,
        alice,
    }
}

async fn fixture() -> Fixture {
    fixture_with(MockMailSender::new()).await
}

fn is_invalid_reset(result: &Result<Identity, DomainError>) -> bool {
    matches!(
        result,
        Err(DomainError::Token(TokenError::InvalidOrExpiredResetToken))
    )
}

#[tokio::test]
async fn test_request_reset_sends_link_with_token() {
    let f = fixture().await;

    let outcome = f.service.request_reset("alice@example.com").await.unwrap();
    assert_eq!(outcome, ResetRequestOutcome::Dispatched);

    let sent = f.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "alice@example.com");
    assert_eq!(sent[0].subject, "Password Reset");
    assert!(sent[0]
        .body_html
        .contains("https://app.example.com/reset-password?token="));

    // Only the hash is stored
    let token = sent[0].reset_token().unwrap();
    let records = f.tokens.tokens_for(f.alice.id).await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].token_hash, hash_token(&token));
}

#[tokio::test]
async fn test_request_reset_normalizes_email() {
    let f = fixture().await;
    let outcome = f.service.request_reset("  ALICE@Example.com ").await.unwrap();
    assert_eq!(outcome, ResetRequestOutcome::Dispatched);
}

#[tokio::test]
async fn test_unknown_email_sends_nothing() {
    let f = fixture().await;

    let outcome = f.service.request_reset("nobody@example.com").await.unwrap();

    assert_eq!(outcome, ResetRequestOutcome::UnknownEmail);
    assert!(f.mailer.sent().is_empty());
    assert_eq!(f.tokens.count().await, 0);
}

#[tokio::test]
async fn test_mail_failure_is_an_outcome_not_an_error() {
    let f = fixture_with(MockMailSender::failing()).await;

    let outcome = f.service.request_reset("alice@example.com").await.unwrap();
    assert_eq!(outcome, ResetRequestOutcome::MailDeliveryFailed);
}

#[tokio::test]
async fn test_redeem_is_single_use() {
    let f = fixture().await;
    f.service.request_reset("alice@example.com").await.unwrap();
    let token = f.mailer.last_token().unwrap();

    let identity = f.service.redeem(&token, "new-password-1").await.unwrap();
    assert_eq!(identity.id, f.alice.id);
    assert_eq!(
        f.store.password_of(f.alice.id).await.as_deref(),
        Some("new-password-1")
    );

    let second = f.service.redeem(&token, "new-password-2").await;
    assert!(is_invalid_reset(&second));
    assert_eq!(
        f.store.password_of(f.alice.id).await.as_deref(),
        Some("new-password-1")
    );
}

#[tokio::test]
async fn test_failed_password_update_keeps_token_usable() {
    let f = fixture().await;
    f.service.request_reset("alice@example.com").await.unwrap();
    let token = f.mailer.last_token().unwrap();

    f.store.fail_next_password_update();
    let failed = f.service.redeem(&token, "new-password-1").await;
    assert!(matches!(failed, Err(DomainError::Internal { .. })));
    assert_eq!(
        f.store.password_of(f.alice.id).await.as_deref(),
        Some("old-password-1")
    );

    let retried = f.service.redeem(&token, "new-password-1").await.unwrap();
    assert_eq!(retried.id, f.alice.id);
    assert_eq!(
        f.store.password_of(f.alice.id).await.as_deref(),
        Some("new-password-1")
    );
    assert!(is_invalid_reset(
        &f.service.redeem(&token, "new-password-2").await
    ));
}

#[tokio::test]
async fn test_redeem_after_expiry_fails() {
    let f = fixture().await;
    let issued_at = Utc::now() - Duration::hours(2);
    f.service
        .request_reset_at("alice@example.com", issued_at)
        .await
        .unwrap();
    let token = f.mailer.last_token().unwrap();

    assert!(is_invalid_reset(
        &f.service.redeem(&token, "new-password-1").await
    ));
}

#[tokio::test]
async fn test_redeem_unknown_or_empty_token_fails() {
    let f = fixture().await;
    assert!(is_invalid_reset(
        &f.service.redeem("made-up-token", "new-password-1").await
    ));
    assert!(is_invalid_reset(&f.service.redeem("  ", "new-password-1").await));
}

#[tokio::test]
async fn test_weak_password_does_not_burn_token() {
    let f = fixture().await;
    f.service.request_reset("alice@example.com").await.unwrap();
    let token = f.mailer.last_token().unwrap();

    let weak = f.service.redeem(&token, "short").await;
    assert!(matches!(
        weak,
        Err(DomainError::ValidationErr(ValidationError::WeakPassword { .. }))
    ));

    assert!(f.service.redeem(&token, "long-enough-password").await.is_ok());
}

#[tokio::test]
async fn test_new_request_invalidates_previous_token() {
    let f = fixture().await;
    f.service.request_reset("alice@example.com").await.unwrap();
    let first = f.mailer.last_token().unwrap();
    f.service.request_reset("alice@example.com").await.unwrap();
    let second = f.mailer.last_token().unwrap();

    assert_ne!(first, second);
    assert!(is_invalid_reset(
        &f.service.redeem(&first, "new-password-1").await
    ));
    assert!(f.service.redeem(&second, "new-password-1").await.is_ok());
}

#[tokio::test]
async fn test_redeem_revokes_refresh_token() {
    let f = fixture().await;
    f.store
        .save_refresh_token(
            f.alice.id,
            StoredRefreshToken {
                token_hash: hash_token("refresh"),
                expires_at: Utc::now() + Duration::days(7),
            },
        )
        .await
        .unwrap();

    f.service.request_reset("alice@example.com").await.unwrap();
    let token = f.mailer.last_token().unwrap();
    f.service.redeem(&token, "new-password-1").await.unwrap();

    assert!(f.store.load_refresh_token(f.alice.id).await.unwrap().is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_redemption_has_one_winner() {
    let f = fixture().await;
    f.service.request_reset("alice@example.com").await.unwrap();
    let token = f.mailer.last_token().unwrap();
    let service = Arc::new(f.service);

    let mut handles = Vec::new();
    for i in 0..6 {
        let service = service.clone();
        let token = token.clone();
        handles.push(tokio::spawn(async move {
            service.redeem(&token, &format!("new-password-{}", i)).await
        }));
    }

    let mut winners = 0;
    for handle in handles {
        let result = handle.await.unwrap();
        if result.is_ok() {
            winners += 1;
        } else {
            assert!(is_invalid_reset(&result));
        }
    }
    assert_eq!(winners, 1);
}

#[test]
fn test_config_rejects_bad_reset_url() {
    let mut config = auth_shared::PasswordResetConfig::default();
    config.reset_url = "not a url".to_string();
    assert!(PasswordResetServiceConfig::from_config(&config, Default::default()).is_err());

    config.reset_url = "ftp://example.com/reset".to_string();
    assert!(PasswordResetServiceConfig::from_config(&config, Default::default()).is_err());
}

#[test]
fn test_config_rejects_out_of_range_expiry() {
    let mut config = auth_shared::PasswordResetConfig::default();
    assert!(PasswordResetServiceConfig::from_config(&config, Default::default()).is_ok());

    for expiry in [0, -1, i64::MAX, 8 * 24 * 60 * 60] {
        config.expiry = expiry;
        assert!(matches!(
            PasswordResetServiceConfig::from_config(&config, Default::default()),
            Err(DomainError::Config { .. })
        ));
    }
}

#[test]
fn test_reset_link_encodes_token() {
    let config =
        PasswordResetServiceConfig::new(Url::parse("https://app.example.com/reset?lang=en").unwrap());
    let link = config.reset_link("abc+/=");
    assert_eq!(
        link.as_str(),
        "https://app.example.com/reset?lang=en&token=abc%2B%2F%3D"
    );
}
