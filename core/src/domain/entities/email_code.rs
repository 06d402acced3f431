//! Verification code entity for the pre-account email code flow.

use chrono::{DateTime, Duration, Utc};
use constant_time_eq::constant_time_eq;
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::repositories::secret::SecretRecord;

/// Maximum number of failed validation attempts allowed per code
pub const CODE_MAX_ATTEMPTS: i64 = 5;

/// Length of the verification code
pub const CODE_LENGTH: usize = 6;

/// Default expiration time for verification codes (10 minutes)
pub const CODE_TTL_MINUTES: i64 = 10;

/// A pending 6-digit verification code tied to a raw email address
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailCode {
    /// Email address this code was sent to
    pub email: String,

    /// The 6-digit verification code
    pub code: String,

    /// Number of failed validation attempts made
    pub attempts: i64,

    /// Timestamp when the code was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the code expires
    pub expires_at: DateTime<Utc>,
}

impl EmailCode {
    /// Creates a new verification code with the default TTL and a
    /// cryptographically secure random 6-digit code
    pub fn new(email: String) -> Self {
        Self::new_with_ttl(email, CODE_TTL_MINUTES)
    }

    /// Creates a new verification code with a custom TTL in minutes
    pub fn new_with_ttl(email: String, ttl_minutes: i64) -> Self {
        let now = Utc::now();

        Self {
            email,
            code: Self::generate_code(),
            attempts: 0,
            created_at: now,
            expires_at: now + Duration::minutes(ttl_minutes),
        }
    }

    /// Generates a cryptographically secure random 6-digit code
    ///
    /// Uses the OS CSPRNG, drawn uniformly from [000000, 999999] so
    /// leading-zero codes occur at their natural frequency.
    fn generate_code() -> String {
        let mut rng = OsRng;
        let mut bytes = [0u8; 4];
        rng.fill_bytes(&mut bytes);
        // Modulo bias here is on the order of 2^-32, negligible for 6 digits
        let num = u32::from_le_bytes(bytes) % 1_000_000;
        format!("{:06}", num)
    }

    /// Checks if the code has expired
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// Compares a presented code against the stored one in constant time
    pub fn matches(&self, presented: &str) -> bool {
        self.code.len() == presented.len()
            && constant_time_eq(self.code.as_bytes(), presented.as_bytes())
    }

    /// Seconds until expiry, clamped to zero once expired
    pub fn expires_in_seconds(&self) -> i64 {
        (self.expires_at - Utc::now()).num_seconds().max(0)
    }

    /// Remaining attempts against the default budget (0 once exceeded)
    pub fn remaining_attempts(&self) -> i64 {
        (CODE_MAX_ATTEMPTS - self.attempts).max(0)
    }
}

impl SecretRecord for EmailCode {
    fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    fn attempts(&self) -> i64 {
        self.attempts
    }

    fn set_attempts(&mut self, count: i64) {
        self.attempts = count;
    }

    fn record_attempt(&mut self) -> i64 {
        self.attempts += 1;
        self.attempts
    }
}

// The code value must never reach logs, so Debug is written by hand.
impl fmt::Debug for EmailCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailCode")
            .field("email", &self.email)
            .field("code", &"[redacted]")
            .field("attempts", &self.attempts)
            .field("created_at", &self.created_at)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
