//! Unit tests for JWT signing and verification

use chrono::{Duration, Utc};
use jsonwebtoken::Algorithm;

use crate::domain::entities::identity::{Identity, Role};
use crate::domain::entities::token::Claims;
use crate::errors::{DomainError, TokenError};
use crate::services::token::Signer;

use super::TEST_SECRET;

fn signer() -> Signer {
    Signer::new(
        TEST_SECRET.as_bytes(),
        Algorithm::HS512,
        "auth-service",
        "auth-service-api",
    )
    .unwrap()
}

fn claims_at(identity: &Identity, now: chrono::DateTime<Utc>) -> Claims {
    Claims::new_access_token(
        identity,
        "auth-service",
        "auth-service-api",
        Duration::minutes(15),
        now,
    )
}

fn tamper_signature(token: &str) -> String {
    let (rest, signature) = token.rsplit_once('.').unwrap();
    let mut chars: Vec<char> = signature.chars().collect();
    chars[0] = if chars[0] == 'A' { 'B' } else { 'A' };
    format!("{}.{}", rest, chars.into_iter().collect::<String>())
}

#[test]
fn test_sign_and_verify_round_trip() {
    let signer = signer();
    let identity = Identity::new("alice", "alice@example.com", Role::Admin);
    let now = Utc::now();

    let token = signer.sign(&claims_at(&identity, now)).unwrap();
    assert_eq!(token.split('.').count(), 3);

    let claims = signer.verify_at(&token, now).unwrap();
    assert_eq!(claims.user_id().unwrap(), identity.id);
    assert_eq!(claims.name, "alice");
    assert_eq!(claims.role, Role::Admin);
}

#[test]
fn test_token_valid_until_ttl_then_expired() {
    let signer = signer();
    let identity = Identity::new("alice", "alice@example.com", Role::User);
    let now = Utc::now();
    let token = signer.sign(&claims_at(&identity, now)).unwrap();

    assert!(signer.verify_at(&token, now + Duration::minutes(15)).is_ok());
    assert_eq!(
        signer
            .verify_at(&token, now + Duration::minutes(15) + Duration::seconds(1))
            .unwrap_err(),
        TokenError::Expired
    );
}

#[test]
fn test_tampered_signature_is_rejected() {
    let signer = signer();
    let identity = Identity::new("alice", "alice@example.com", Role::User);
    let now = Utc::now();
    let token = signer.sign(&claims_at(&identity, now)).unwrap();

    assert_eq!(
        signer.verify_at(&tamper_signature(&token), now).unwrap_err(),
        TokenError::InvalidSignature
    );
}

#[test]
fn test_tampered_expired_token_reports_invalid_signature() {
    let signer = signer();
    let identity = Identity::new("alice", "alice@example.com", Role::User);
    let issued = Utc::now() - Duration::hours(2);
    let token = signer.sign(&claims_at(&identity, issued)).unwrap();

    assert_eq!(
        signer.verify_at(&tamper_signature(&token), Utc::now()).unwrap_err(),
        TokenError::InvalidSignature
    );
}

#[test]
fn test_foreign_key_is_rejected() {
    let other = Signer::new(
        b"another-secret-that-is-also-32-bytes-long!!",
        Algorithm::HS512,
        "auth-service",
        "auth-service-api",
    )
    .unwrap();
    let identity = Identity::new("alice", "alice@example.com", Role::User);
    let token = other.sign(&claims_at(&identity, Utc::now())).unwrap();

    assert_eq!(
        signer().verify(&token).unwrap_err(),
        TokenError::InvalidSignature
    );
}

#[test]
fn test_wrong_audience_is_rejected() {
    let identity = Identity::new("alice", "alice@example.com", Role::User);
    let claims = Claims::new_access_token(
        &identity,
        "auth-service",
        "some-other-api",
        Duration::minutes(15),
        Utc::now(),
    );
    let token = signer().sign(&claims).unwrap();

    assert_eq!(
        signer().verify(&token).unwrap_err(),
        TokenError::InvalidSignature
    );
}

#[test]
fn test_not_yet_valid_token_is_rejected() {
    let signer = signer();
    let identity = Identity::new("alice", "alice@example.com", Role::User);
    let now = Utc::now();
    let token = signer
        .sign(&claims_at(&identity, now + Duration::hours(1)))
        .unwrap();

    assert_eq!(
        signer.verify_at(&token, now).unwrap_err(),
        TokenError::InvalidSignature
    );
}

#[test]
fn test_garbage_is_rejected() {
    assert_eq!(
        signer().verify("invalid_token").unwrap_err(),
        TokenError::InvalidSignature
    );
}

#[test]
fn test_constructor_rejects_asymmetric_algorithms() {
    let result = Signer::new(TEST_SECRET.as_bytes(), Algorithm::RS256, "iss", "aud");
    assert!(matches!(result, Err(DomainError::Config { .. })));
}

#[test]
fn test_constructor_rejects_short_secret() {
    let result = Signer::new(b"too-short", Algorithm::HS256, "iss", "aud");
    assert!(matches!(result, Err(DomainError::Config { .. })));
}
