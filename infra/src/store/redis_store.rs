//! Redis-backed secret store.
//!
//! Each identity maps to one Redis hash holding two fields: the serialized
//! record under `record` and a numeric counter under `attempts`, kept
//! separate so `HINCRBY` stays atomic without read-modify-write races on the
//! record body. No Redis TTL is set; the lifecycle services decide expiry
//! from the record's own timestamps, and the sweep removes stale hashes.

use async_trait::async_trait;
use redis::AsyncCommands;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use tracing::warn;

use mp_core::errors::{VerificationError, VerificationResult};
use mp_core::repositories::secret::{SecretRecord, SecretStore};

use super::redis_client::RedisClient;

const RECORD_FIELD: &str = "record";
const ATTEMPTS_FIELD: &str = "attempts";

/// A [`SecretStore`] keeping records in Redis hashes under a key prefix,
/// e.g. `verify:code:{email}` or `verify:token:{user_id}`.
#[derive(Clone)]
pub struct RedisSecretStore<R> {
    client: RedisClient,
    prefix: String,
    _marker: PhantomData<fn() -> R>,
}

impl<R> RedisSecretStore<R>
where
    R: SecretRecord + Serialize + DeserializeOwned,
{
    pub fn new(client: RedisClient, prefix: impl Into<String>) -> Self {
        Self {
            client,
            prefix: prefix.into(),
            _marker: PhantomData,
        }
    }

    fn key(&self, identity: &str) -> String {
        format!("{}:{}", self.prefix, identity)
    }

    fn store_err(e: impl std::fmt::Display) -> VerificationError {
        VerificationError::Store {
            message: e.to_string(),
        }
    }
}

#[async_trait]
impl<R> SecretStore<R> for RedisSecretStore<R>
where
    R: SecretRecord + Serialize + DeserializeOwned,
{
    async fn put(&self, identity: &str, record: &R) -> VerificationResult<()> {
        let json = serde_json::to_string(record).map_err(Self::store_err)?;
        let key = self.key(identity);
        let mut conn = self.client.connection();

        // DEL + HSET in one pipeline so a replacement atomically resets the
        // attempt counter
        redis::pipe()
            .atomic()
            .del(&key)
            .hset(&key, RECORD_FIELD, json)
            .hset(&key, ATTEMPTS_FIELD, record.attempts())
            .query_async::<_, ()>(&mut conn)
            .await
            .map_err(Self::store_err)?;

        Ok(())
    }

    async fn get(&self, identity: &str) -> VerificationResult<Option<R>> {
        let key = self.key(identity);
        let mut conn = self.client.connection();

        let (json, attempts): (Option<String>, Option<i64>) = redis::pipe()
            .hget(&key, RECORD_FIELD)
            .hget(&key, ATTEMPTS_FIELD)
            .query_async(&mut conn)
            .await
            .map_err(Self::store_err)?;

        match json {
            Some(json) => {
                let mut record: R = serde_json::from_str(&json).map_err(Self::store_err)?;
                // The counter lives outside the serialized body; overlay it
                record.set_attempts(attempts.unwrap_or(0));
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, identity: &str) -> VerificationResult<bool> {
        let mut conn = self.client.connection();
        let removed: i64 = conn
            .del(self.key(identity))
            .await
            .map_err(Self::store_err)?;
        Ok(removed > 0)
    }

    async fn increment_attempts(&self, identity: &str) -> VerificationResult<i64> {
        let key = self.key(identity);
        let mut conn = self.client.connection();

        // Guard and increment in one script so a concurrent delete cannot
        // resurrect the key as an attempts-only hash
        let attempts: i64 = redis::Script::new(
            r#"
            if redis.call('HEXISTS', KEYS[1], ARGV[1]) == 1 then
                return redis.call('HINCRBY', KEYS[1], ARGV[2], 1)
            end
            return -1
            "#,
        )
        .key(&key)
        .arg(RECORD_FIELD)
        .arg(ATTEMPTS_FIELD)
        .invoke_async(&mut conn)
        .await
        .map_err(Self::store_err)?;

        if attempts < 0 {
            return Err(VerificationError::NotFound {
                resource: "verification secret".to_string(),
            });
        }
        Ok(attempts)
    }

    async fn scan_all(&self) -> VerificationResult<Vec<(String, R)>> {
        let pattern = format!("{}:*", self.prefix);
        let mut conn = self.client.connection();

        let keys: Vec<String> = {
            let mut iter = conn
                .scan_match::<_, String>(&pattern)
                .await
                .map_err(Self::store_err)?;
            let mut keys = Vec::new();
            while let Some(key) = iter.next_item().await {
                keys.push(key);
            }
            keys
        };

        let mut results = Vec::with_capacity(keys.len());
        for key in keys {
            let identity = key
                .strip_prefix(&format!("{}:", self.prefix))
                .unwrap_or(&key)
                .to_string();

            // A key can disappear between the scan and the fetch; skip it
            match self.get(&identity).await {
                Ok(Some(record)) => results.push((identity, record)),
                Ok(None) => {}
                Err(e) => {
                    // Corrupt records are skipped so the sweep can make progress
                    warn!(key = %key, error = %e, "Skipping unreadable secret record");
                }
            }
        }

        Ok(results)
    }
}
