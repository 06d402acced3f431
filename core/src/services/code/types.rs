//! Result payloads for the code verification flow.

use serde::{Deserialize, Serialize};

/// Outcome of a successful code issuance.
///
/// The code itself is never part of the result; it travels only through the
/// notifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestCodeResult {
    /// Seconds until the issued code expires
    pub expires_in_seconds: i64,

    /// Provider message id for the delivery
    pub message_id: String,
}

/// Outcome of a successful code confirmation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmCodeResult {
    /// Always true; failures surface as errors
    pub verified: bool,
}
