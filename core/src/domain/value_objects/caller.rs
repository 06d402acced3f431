//! Caller identity presented to the verification services.

use serde::{Deserialize, Serialize};

use crate::errors::{VerificationError, VerificationResult};

/// The capability a caller presents when invoking an operation.
///
/// Code operations accept anonymous callers; token operations require an
/// authenticated account holder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Caller {
    /// No account context
    Anonymous,
    /// An authenticated account holder
    Authenticated { user_id: String },
}

impl Caller {
    /// Convenience constructor for an authenticated caller
    pub fn authenticated(user_id: impl Into<String>) -> Self {
        Self::Authenticated {
            user_id: user_id.into(),
        }
    }

    /// Whether the caller carries an account identity
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    /// Returns the caller's user id, or `Unauthenticated` for anonymous callers
    pub fn require_authenticated(&self) -> VerificationResult<&str> {
        match self {
            Self::Authenticated { user_id } => Ok(user_id),
            Self::Anonymous => Err(VerificationError::Unauthenticated),
        }
    }
}
