//! Unit tests for token service

use chrono::{Duration, Utc};
use jsonwebtoken::Algorithm;

use crate::domain::entities::identity::Role;
use crate::errors::{DomainError, TokenError};
use crate::repositories::CredentialStore;
use crate::services::token::{TokenService, TokenServiceConfig};

use super::{store_with_alice, test_config};

#[tokio::test]
async fn test_generate_tokens() {
    let (store, alice) = store_with_alice().await;
    let service = TokenService::new(store.clone(), test_config()).unwrap();

    let pair = service.generate_tokens(&alice).await.unwrap();

    assert!(!pair.access_token.is_empty());
    assert!(!pair.refresh_token.is_empty());
    assert_eq!(pair.token_type, "Bearer");
    assert_eq!(pair.access_expires_in, 15 * 60);
    assert_eq!(pair.refresh_expires_in, 7 * 24 * 60 * 60);
    assert!(store.load_refresh_token(alice.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_verify_access_token() {
    let (store, alice) = store_with_alice().await;
    let service = TokenService::new(store, test_config()).unwrap();

    let pair = service.generate_tokens(&alice).await.unwrap();
    let claims = service.verify_access_token(&pair.access_token).unwrap();

    assert_eq!(claims.user_id().unwrap(), alice.id);
    assert_eq!(claims.name, "alice");
    assert_eq!(claims.role, Role::User);
    assert_eq!(claims.iss, "auth-service");
    assert_eq!(claims.aud, "auth-service-api");
}

#[tokio::test]
async fn test_access_token_expires_after_configured_ttl() {
    let (store, alice) = store_with_alice().await;
    let config = TokenServiceConfig {
        access_token_ttl: Duration::minutes(5),
        ..test_config()
    };
    let service = TokenService::new(store, config).unwrap();

    let now = Utc::now();
    let pair = service.generate_tokens_at(&alice, now).await.unwrap();
    assert_eq!(pair.access_expires_in, 300);

    assert!(service
        .verify_access_token_at(&pair.access_token, now + Duration::minutes(5))
        .is_ok());
    assert_eq!(
        service
            .verify_access_token_at(&pair.access_token, now + Duration::minutes(6))
            .unwrap_err(),
        TokenError::Expired
    );
}

#[tokio::test]
async fn test_rotate_tokens() {
    let (store, alice) = store_with_alice().await;
    let service = TokenService::new(store, test_config()).unwrap();

    let first = service.generate_tokens(&alice).await.unwrap();
    let (identity, second) = service
        .rotate_tokens(alice.id, &first.refresh_token)
        .await
        .unwrap();

    assert_eq!(identity.id, alice.id);
    assert_ne!(first.refresh_token, second.refresh_token);
    assert!(service.verify_access_token(&second.access_token).is_ok());

    let replay = service.rotate_tokens(alice.id, &first.refresh_token).await;
    assert!(matches!(
        replay,
        Err(DomainError::Token(TokenError::InvalidRefreshToken))
    ));
}

#[tokio::test]
async fn test_revoke_tokens() {
    let (store, alice) = store_with_alice().await;
    let service = TokenService::new(store.clone(), test_config()).unwrap();

    let pair = service.generate_tokens(&alice).await.unwrap();
    service.revoke_tokens(alice.id).await.unwrap();

    assert!(store.load_refresh_token(alice.id).await.unwrap().is_none());
    assert!(service
        .rotate_tokens(alice.id, &pair.refresh_token)
        .await
        .is_err());
}

#[tokio::test]
async fn test_config_rejects_out_of_range_access_ttl() {
    let (store, _) = store_with_alice().await;

    for ttl in [Duration::minutes(4), Duration::hours(25)] {
        let config = TokenServiceConfig {
            access_token_ttl: ttl,
            ..test_config()
        };
        assert!(matches!(
            TokenService::new(store.clone(), config),
            Err(DomainError::Config { .. })
        ));
    }
}

#[tokio::test]
async fn test_config_rejects_asymmetric_algorithm() {
    let (store, _) = store_with_alice().await;
    let config = TokenServiceConfig {
        algorithm: Algorithm::ES256,
        ..test_config()
    };
    assert!(matches!(
        TokenService::new(store, config),
        Err(DomainError::Config { .. })
    ));
}

#[test]
fn test_config_from_auth_config() {
    let mut auth = auth_shared::AuthConfig::default();
    auth.jwt.secret = super::TEST_SECRET.to_string();
    auth.jwt.algorithm = "HS256".to_string();
    auth.jwt.access_token_expiry = 600;

    let config = TokenServiceConfig::from_auth_config(&auth).unwrap();
    assert_eq!(config.algorithm, Algorithm::HS256);
    assert_eq!(config.access_token_ttl, Duration::minutes(10));
    assert_eq!(config.refresh_token_ttl, Duration::days(7));

    auth.jwt.algorithm = "none".to_string();
    assert!(TokenServiceConfig::from_auth_config(&auth).is_err());
}

#[test]
fn test_config_rejects_out_of_range_expiry() {
    let mut auth = auth_shared::AuthConfig::default();
    auth.jwt.secret = super::TEST_SECRET.to_string();

    auth.jwt.access_token_expiry = i64::MAX;
    assert!(matches!(
        TokenServiceConfig::from_auth_config(&auth),
        Err(DomainError::Config { .. })
    ));

    auth.jwt.access_token_expiry = 900;
    auth.refresh.expiry = i64::MAX;
    assert!(matches!(
        TokenServiceConfig::from_auth_config(&auth),
        Err(DomainError::Config { .. })
    ));

    auth.refresh.expiry = i64::MAX / 1000;
    assert!(matches!(
        TokenServiceConfig::from_auth_config(&auth),
        Err(DomainError::Config { .. })
    ));
}
