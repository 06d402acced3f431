//! Redis-backed sliding-window rate limiter.
//!
//! Each identity maps to a sorted set of issuance timestamps scored by unix
//! millis. A request trims events older than the window, counts the
//! survivors, and either records itself or reports how long until the
//! oldest event slides out.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use redis::AsyncCommands;
use uuid::Uuid;

use mp_core::errors::{VerificationError, VerificationResult};
use mp_core::services::rate_limit::RateLimiter;

use super::redis_client::RedisClient;

/// Sliding-window [`RateLimiter`] over Redis sorted sets.
#[derive(Clone)]
pub struct RedisRateLimiter {
    client: RedisClient,
    prefix: String,
}

impl RedisRateLimiter {
    pub fn new(client: RedisClient) -> Self {
        Self::with_prefix(client, "rate:issue")
    }

    pub fn with_prefix(client: RedisClient, prefix: impl Into<String>) -> Self {
        Self {
            client,
            prefix: prefix.into(),
        }
    }

    fn key(&self, identity: &str) -> String {
        format!("{}:{}", self.prefix, identity)
    }

    fn store_err(e: redis::RedisError) -> VerificationError {
        VerificationError::Store {
            message: e.to_string(),
        }
    }
}

#[async_trait]
impl RateLimiter for RedisRateLimiter {
    async fn check_and_record(
        &self,
        identity: &str,
        window: Duration,
        max_count: u32,
    ) -> VerificationResult<()> {
        let key = self.key(identity);
        let now_ms = Utc::now().timestamp_millis();
        let window_ms = window.num_milliseconds();
        let window_start = now_ms - window_ms;
        let mut conn = self.client.connection();

        // Trim events that slid out of the window
        conn.zrembyscore::<_, _, _, ()>(&key, "-inf", window_start)
            .await
            .map_err(Self::store_err)?;

        // Strictly newer than window_start
        let count: u32 = conn
            .zcount(&key, format!("({}", window_start), "+inf")
            .await
            .map_err(Self::store_err)?;

        if count >= max_count {
            let oldest: Vec<(String, i64)> = conn
                .zrange_withscores(&key, 0, 0)
                .await
                .map_err(Self::store_err)?;
            let retry_after_seconds = oldest
                .first()
                .map(|(_, score)| ((score + window_ms - now_ms) / 1000).max(1) as u64)
                .unwrap_or(1);

            return Err(VerificationError::RateLimited {
                retry_after_seconds,
            });
        }

        // Members must be unique or two events in the same millisecond
        // collapse into one; the score alone carries the timestamp
        let member = format!("{}-{}", now_ms, Uuid::new_v4());
        conn.zadd::<_, _, _, ()>(&key, member, now_ms)
            .await
            .map_err(Self::store_err)?;

        // Let abandoned windows clean themselves up
        let expiry_seconds = (window_ms / 1000).max(1) * 2;
        conn.expire::<_, ()>(&key, expiry_seconds)
            .await
            .map_err(Self::store_err)?;

        Ok(())
    }
}
