//! Verification token entity for the post-account email link flow.

use chrono::{DateTime, Duration, Utc};
use constant_time_eq::constant_time_eq;
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::repositories::secret::SecretRecord;

/// Default expiration time for verification tokens (24 hours)
pub const TOKEN_TTL_HOURS: i64 = 24;

/// Number of random bytes behind each token (hex-encoded to 64 chars)
pub const TOKEN_BYTES: usize = 32;

/// An opaque verification token mailed to an account holder as a link
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailToken {
    /// Identifier of the account the token belongs to
    pub user_id: String,

    /// The opaque token value (hex-encoded random bytes)
    pub token: String,

    /// Email address the verification link was sent to
    pub email: String,

    /// Whether the token has been successfully consumed
    pub verified: bool,

    /// Timestamp when the token was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the token expires
    pub expires_at: DateTime<Utc>,

    /// Timestamp of successful consumption, if any
    pub verified_at: Option<DateTime<Utc>>,
}

impl EmailToken {
    /// Creates a new unverified token with the default TTL
    pub fn new(user_id: String, email: String) -> Self {
        Self::new_with_ttl(user_id, email, TOKEN_TTL_HOURS)
    }

    /// Creates a new unverified token with a custom TTL in hours
    pub fn new_with_ttl(user_id: String, email: String, ttl_hours: i64) -> Self {
        let now = Utc::now();

        Self {
            user_id,
            token: Self::generate_token(),
            email,
            verified: false,
            created_at: now,
            expires_at: now + Duration::hours(ttl_hours),
            verified_at: None,
        }
    }

    /// Generates an opaque token from 32 bytes of OS randomness
    fn generate_token() -> String {
        let mut rng = OsRng;
        let mut bytes = [0u8; TOKEN_BYTES];
        rng.fill_bytes(&mut bytes);
        hex::encode(bytes)
    }

    /// Checks if the token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// Compares a presented token against the stored one in constant time
    pub fn matches(&self, presented: &str) -> bool {
        self.token.len() == presented.len()
            && constant_time_eq(self.token.as_bytes(), presented.as_bytes())
    }

    /// Marks the token as consumed, stamping the verification time
    pub fn mark_verified(&mut self) {
        self.verified = true;
        self.verified_at = Some(Utc::now());
    }

    /// Seconds until expiry, clamped to zero once expired
    pub fn expires_in_seconds(&self) -> i64 {
        (self.expires_at - Utc::now()).num_seconds().max(0)
    }
}

impl SecretRecord for EmailToken {
    fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }
}

// The token value must never reach logs, so Debug is written by hand.
impl fmt::Debug for EmailToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailToken")
            .field("user_id", &self.user_id)
            .field("token", &"[redacted]")
            .field("email", &self.email)
            .field("verified", &self.verified)
            .field("created_at", &self.created_at)
            .field("expires_at", &self.expires_at)
            .field("verified_at", &self.verified_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_email_token() {
        let token = EmailToken::new("user-1".to_string(), "alice@example.com".to_string());

        assert_eq!(token.user_id, "user-1");
        assert_eq!(token.email, "alice@example.com");
        assert_eq!(token.token.len(), TOKEN_BYTES * 2);
        assert!(token.token.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(!token.verified);
        assert!(token.verified_at.is_none());
        assert_eq!(token.expires_at - token.created_at, Duration::hours(24));
    }

    #[test]
    fn test_token_uniqueness() {
        let a = EmailToken::new("user-1".to_string(), "alice@example.com".to_string());
        let b = EmailToken::new("user-1".to_string(), "alice@example.com".to_string());

        assert_ne!(a.token, b.token);
    }

    #[test]
    fn test_matches() {
        let token = EmailToken::new("user-1".to_string(), "alice@example.com".to_string());
        let presented = token.token.clone();

        assert!(token.matches(&presented));
        assert!(!token.matches("deadbeef"));
        assert!(!token.matches(""));
    }

    #[test]
    fn test_mark_verified() {
        let mut token = EmailToken::new("user-1".to_string(), "alice@example.com".to_string());
        token.mark_verified();

        assert!(token.verified);
        assert!(token.verified_at.is_some());
    }

    #[test]
    fn test_expiry() {
        let token =
            EmailToken::new_with_ttl("user-1".to_string(), "alice@example.com".to_string(), 0);

        std::thread::sleep(std::time::Duration::from_millis(10));
        assert!(token.is_expired());
        assert_eq!(token.expires_in_seconds(), 0);
    }

    #[test]
    fn test_debug_redacts_token() {
        let token = EmailToken::new("user-1".to_string(), "alice@example.com".to_string());
        let rendered = format!("{:?}", token);

        assert!(rendered.contains("[redacted]"));
        assert!(!rendered.contains(&token.token));
    }
}
