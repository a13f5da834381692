//! Periodic purge of expired password reset tokens

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};

use crate::errors::DomainError;
use crate::repositories::ResetTokenRepository;

/// Configuration for the reset token cleanup service
#[derive(Debug, Clone)]
pub struct ResetTokenCleanupConfig {
    /// How often to run cleanup (in seconds)
    pub interval_seconds: u64,
    /// Whether to enable automatic cleanup
    pub enabled: bool,
}

impl Default for ResetTokenCleanupConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 3600, // Run every hour
            enabled: true,
        }
    }
}

impl ResetTokenCleanupConfig {
    /// Period between cleanup cycles, never shorter than one second
    pub fn interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.interval_seconds.max(1))
    }
}

/// Service for deleting expired reset token records
pub struct ResetTokenCleanupService<R: ResetTokenRepository + 'static> {
    repository: Arc<R>,
    config: ResetTokenCleanupConfig,
}

impl<R: ResetTokenRepository> ResetTokenCleanupService<R> {
    /// Create a new cleanup service
    pub fn new(repository: Arc<R>, config: ResetTokenCleanupConfig) -> Self {
        Self { repository, config }
    }

    /// Run a single cleanup cycle
    pub async fn run_cleanup(&self) -> Result<CleanupResult, DomainError> {
        if !self.config.enabled {
            return Ok(CleanupResult::default());
        }

        let mut result = CleanupResult::default();

        match self.repository.delete_expired(Utc::now()).await {
            Ok(count) => {
                result.expired_reset_tokens_deleted = count;
                info!(
                    event = "reset_token_cleanup",
                    deleted = count,
                    "Deleted expired reset tokens"
                );
            }
            Err(e) => {
                error!(event = "reset_token_cleanup_failed", error = %e, "Reset token cleanup failed");
                result.errors.push(format!("Reset token cleanup error: {}", e));
            }
        }

        Ok(result)
    }

    /// Start the cleanup service as a background task
    ///
    /// Returns `None` when cleanup is disabled.
    pub fn start_background_task(self: Arc<Self>) -> Option<tokio::task::JoinHandle<()>> {
        if !self.config.enabled {
            warn!("Reset token cleanup service is disabled");
            return None;
        }

        if self.config.interval_seconds == 0 {
            warn!("Reset token cleanup interval of 0 seconds raised to 1 second");
        }
        let interval = self.config.interval();

        Some(tokio::spawn(async move {
            info!(
                interval_seconds = interval.as_secs(),
                "Reset token cleanup service started"
            );

            let mut interval_timer = tokio::time::interval(interval);

            loop {
                interval_timer.tick().await;

                match self.run_cleanup().await {
                    Ok(result) => {
                        if !result.is_success() {
                            warn!("Cleanup completed with errors: {:?}", result.errors);
                        }
                    }
                    Err(e) => {
                        error!("Reset token cleanup cycle failed: {}", e);
                    }
                }
            }
        }))
    }
}

/// Result of a cleanup operation
#[derive(Debug, Default)]
pub struct CleanupResult {
    /// Number of expired reset token records deleted
    pub expired_reset_tokens_deleted: usize,
    /// Any errors encountered during cleanup
    pub errors: Vec<String>,
}

impl CleanupResult {
    /// Check if the cleanup was successful (no errors)
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}
