//! User profile entity carrying the email verification flag.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A minimal account profile as seen by the verification services
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Account identifier
    pub user_id: String,

    /// Email address on file
    pub email: String,

    /// Display name, if the account holder provided one
    pub display_name: Option<String>,

    /// Whether the email address has been proven to belong to the holder
    pub email_verified: bool,

    /// Timestamp of the successful verification, if any
    pub email_verified_at: Option<DateTime<Utc>>,

    /// Timestamp when the account was created
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    /// Creates a new profile with an unverified email
    pub fn new(user_id: String, email: String, display_name: Option<String>) -> Self {
        Self {
            user_id,
            email,
            display_name,
            email_verified: false,
            email_verified_at: None,
            created_at: Utc::now(),
        }
    }

    /// Flags the email as verified, stamping the verification time
    pub fn mark_email_verified(&mut self) {
        self.email_verified = true;
        self.email_verified_at = Some(Utc::now());
    }
}
