//! Keyed secret storage contract.
//!
//! Both verification flows persist a single live record per identity: codes
//! are keyed by normalized email address, tokens by account id. Backends make
//! no TTL decisions of their own; expiry is evaluated by the lifecycle
//! services against [`SecretRecord::expires_at`], so a record past its TTL is
//! still returned by [`SecretStore::get`] until a service or sweep deletes it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::VerificationResult;

/// Behavior every stored verification secret must expose
pub trait SecretRecord: Clone + Send + Sync + 'static {
    /// Timestamp after which the record no longer verifies
    fn expires_at(&self) -> DateTime<Utc>;

    /// Current failed-attempt count (0 for record types without a counter)
    fn attempts(&self) -> i64 {
        0
    }

    /// Overwrites the attempt count (used by backends that track the
    /// counter outside the serialized record)
    fn set_attempts(&mut self, _count: i64) {}

    /// Registers a failed attempt and returns the new count
    fn record_attempt(&mut self) -> i64 {
        0
    }

    /// Whether the record is expired at the given instant
    fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at()
    }
}

/// Keyed storage for verification secrets
#[async_trait]
pub trait SecretStore<R: SecretRecord>: Send + Sync {
    /// Stores a record under the identity, overwriting any existing one
    async fn put(&self, identity: &str, record: &R) -> VerificationResult<()>;

    /// Fetches the record for the identity, if one exists
    async fn get(&self, identity: &str) -> VerificationResult<Option<R>>;

    /// Removes the record for the identity, reporting whether one was
    /// actually removed. Absent records are not an error.
    ///
    /// The return value is the serialization point for racing consumers:
    /// of two callers deleting the same record, exactly one sees `true`.
    async fn delete(&self, identity: &str) -> VerificationResult<bool>;

    /// Atomically increments the failed-attempt counter and returns the
    /// new count. Errors if no record exists for the identity.
    async fn increment_attempts(&self, identity: &str) -> VerificationResult<i64>;

    /// Returns every stored record with its identity, for sweeping
    async fn scan_all(&self) -> VerificationResult<Vec<(String, R)>>;
}
