//! Unit tests for reset token cleanup

use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::domain::entities::password_reset::PasswordResetToken;
use crate::repositories::{MockResetTokenRepository, ResetTokenRepository};
use crate::services::password_reset::{ResetTokenCleanupConfig, ResetTokenCleanupService};

#[tokio::test]
async fn test_run_cleanup_deletes_expired_records() {
    let repo = Arc::new(MockResetTokenRepository::new());
    let long_ago = Utc::now() - Duration::days(1);
    repo.save(PasswordResetToken::new(Uuid::new_v4(), "old".into(), Duration::hours(1), long_ago))
        .await
        .unwrap();
    repo.save(PasswordResetToken::new(Uuid::new_v4(), "fresh".into(), Duration::hours(1), Utc::now()))
        .await
        .unwrap();

    let service = ResetTokenCleanupService::new(repo.clone(), ResetTokenCleanupConfig::default());
    let result = service.run_cleanup().await.unwrap();

    assert!(result.is_success());
    assert_eq!(result.expired_reset_tokens_deleted, 1);
    assert_eq!(repo.count().await, 1);
}

#[tokio::test]
async fn test_disabled_cleanup_does_nothing() {
    let repo = Arc::new(MockResetTokenRepository::new());
    let long_ago = Utc::now() - Duration::days(1);
    repo.save(PasswordResetToken::new(Uuid::new_v4(), "old".into(), Duration::hours(1), long_ago))
        .await
        .unwrap();

    let config = ResetTokenCleanupConfig {
        enabled: false,
        ..Default::default()
    };
    let service = Arc::new(ResetTokenCleanupService::new(repo.clone(), config));

    assert_eq!(service.run_cleanup().await.unwrap().expired_reset_tokens_deleted, 0);
    assert!(service.start_background_task().is_none());
    assert_eq!(repo.count().await, 1);
}

#[test]
fn test_zero_interval_is_raised_to_one_second() {
    let config = ResetTokenCleanupConfig {
        interval_seconds: 0,
        enabled: true,
    };
    assert_eq!(config.interval(), std::time::Duration::from_secs(1));
}

#[tokio::test(start_paused = true)]
async fn test_background_task_with_zero_interval_keeps_running() {
    let repo = Arc::new(MockResetTokenRepository::new());
    let long_ago = Utc::now() - Duration::days(1);
    repo.save(PasswordResetToken::new(Uuid::new_v4(), "old".into(), Duration::hours(1), long_ago))
        .await
        .unwrap();

    let config = ResetTokenCleanupConfig {
        interval_seconds: 0,
        enabled: true,
    };
    let service = Arc::new(ResetTokenCleanupService::new(repo.clone(), config));
    let handle = service.start_background_task().unwrap();

    tokio::time::sleep(std::time::Duration::from_secs(3)).await;

    assert_eq!(repo.count().await, 0);
    assert!(!handle.is_finished());
    handle.abort();
}
