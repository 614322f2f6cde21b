//! Bounded-retry wrapper around a [`FollowerCountProvider`].
//!
//! Transport errors, non-success statuses and malformed bodies all count as
//! one failed attempt. The wait between attempts is fixed, not exponential,
//! and is skipped after the last attempt.

use std::sync::Arc;
use std::time::Duration;

use tokio::time;

use crate::classifier::FetchOutcome;
use crate::config::{Config, DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY_SECONDS};
use crate::services::FollowerCountProvider;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Always at least 1.
    pub max_attempts: u32,
    /// Wait between consecutive attempts.
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.max_attempts, config.retry_delay())
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(
            DEFAULT_MAX_ATTEMPTS,
            Duration::from_secs(DEFAULT_RETRY_DELAY_SECONDS),
        )
    }
}

pub struct MetricFetcher {
    provider: Arc<dyn FollowerCountProvider + Send + Sync>,
    policy: RetryPolicy,
}

impl MetricFetcher {
    pub fn new(provider: Arc<dyn FollowerCountProvider + Send + Sync>, policy: RetryPolicy) -> Self {
        Self { provider, policy }
    }

    /// Fetch one account's follower count.
    ///
    /// Never returns an error: after the last failed attempt the outcome is
    /// [`FetchOutcome::Failed`].
    pub async fn fetch(&self, username: &str) -> FetchOutcome {
        let max_attempts = self.policy.max_attempts;

        for attempt in 1..=max_attempts {
            match self.provider.fetch_follower_count(username).await {
                Ok(count) => {
                    tracing::debug!(username, attempt, followers = count, "Fetched follower count");
                    return FetchOutcome::Fetched(count);
                }
                Err(err) => {
                    tracing::warn!(
                        username,
                        attempt,
                        max_attempts,
                        provider = self.provider.provider_name(),
                        "Provider attempt failed: {}",
                        err
                    );
                }
            }

            if attempt < max_attempts {
                time::sleep(self.policy.delay).await;
            }
        }

        FetchOutcome::Failed
    }
}
