//! Result payloads for the token verification flow.

use serde::{Deserialize, Serialize};

/// Outcome of a successful welcome-email send
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendWelcomeResult {
    /// Provider message id for the delivery
    pub message_id: String,

    /// Seconds until the issued token expires
    pub expires_in_seconds: i64,
}

/// Outcome of a token confirmation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmTokenResult {
    /// Always true on success
    pub verified: bool,

    /// True when the token had already been consumed; the call is a no-op
    pub already_verified: bool,

    /// Whether the profile flag was flipped during this call
    pub profile_updated: bool,
}

/// Outcome of a resend request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResendResult {
    /// True when the account's email is already verified and nothing was sent
    pub already_verified: bool,

    /// Provider message id, present when an email went out
    pub message_id: Option<String>,
}
