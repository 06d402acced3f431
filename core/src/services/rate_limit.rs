//! Sliding-window rate limiting for secret issuance.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::errors::{VerificationError, VerificationResult};

/// Throttles issuance operations per identity.
///
/// `check_and_record` either admits the request (recording it against the
/// window) or rejects it with [`VerificationError::RateLimited`] carrying the
/// seconds until the oldest event slides out of the window.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    async fn check_and_record(
        &self,
        identity: &str,
        window: Duration,
        max_count: u32,
    ) -> VerificationResult<()>;
}

/// In-memory sliding-window limiter keeping per-identity event timestamps.
#[derive(Clone, Default)]
pub struct SlidingWindowRateLimiter {
    events: Arc<Mutex<HashMap<String, Vec<DateTime<Utc>>>>>,
}

impl SlidingWindowRateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops identities whose events have all slid out of the window.
    /// Call periodically from a maintenance task; correctness does not
    /// depend on it.
    pub async fn prune(&self, window: Duration) {
        let cutoff = Utc::now() - window;
        let mut events = self.events.lock().await;
        events.retain(|_, timestamps| {
            timestamps.retain(|ts| *ts > cutoff);
            !timestamps.is_empty()
        });
    }
}

#[async_trait]
impl RateLimiter for SlidingWindowRateLimiter {
    async fn check_and_record(
        &self,
        identity: &str,
        window: Duration,
        max_count: u32,
    ) -> VerificationResult<()> {
        let now = Utc::now();
        let cutoff = now - window;

        let mut events = self.events.lock().await;
        let timestamps = events.entry(identity.to_string()).or_default();
        timestamps.retain(|ts| *ts > cutoff);

        if timestamps.len() >= max_count as usize {
            // Oldest surviving event determines when capacity frees up
            let retry_after_seconds = timestamps
                .first()
                .map(|oldest| (*oldest + window - now).num_seconds().max(1) as u64)
                .unwrap_or(1);
            return Err(VerificationError::RateLimited {
                retry_after_seconds,
            });
        }

        timestamps.push(now);
        Ok(())
    }
}
