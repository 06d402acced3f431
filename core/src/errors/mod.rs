//! Domain-specific error types for verification operations.
//!
//! Every failure surfaced to a caller carries a machine-readable kind (see
//! [`VerificationError::error_code`]) plus a human-readable message. Nothing in
//! this taxonomy triggers automatic retries inside the core; retries, if any,
//! are the caller's responsibility.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Errors surfaced by the verification lifecycle services
#[derive(Error, Debug)]
pub enum VerificationError {
    /// Malformed input; the caller's fault, and storage was never touched
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// The caller lacks the required capability
    #[error("Caller must be authenticated")]
    Unauthenticated,

    /// No live secret record exists for the identity
    #[error("No pending verification found for {resource}")]
    NotFound { resource: String },

    /// The record existed but is past its TTL
    #[error("Verification secret has expired")]
    Expired,

    /// The attempt budget for the record was used up
    #[error("Maximum verification attempts exceeded")]
    Exhausted,

    /// The presented secret does not match the stored one.
    /// `remaining` carries the attempts left for code flows; token flows have
    /// no attempt counter and carry `None`.
    #[error("Invalid verification secret")]
    Mismatch { remaining: Option<u32> },

    /// Issuance throttled by the rate limiter
    #[error("Too many requests. Please retry in {retry_after_seconds} seconds")]
    RateLimited { retry_after_seconds: u64 },

    /// Downstream storage failure
    #[error("Storage failure: {message}")]
    Store { message: String },

    /// Downstream delivery failure
    #[error("Delivery failure: {message}")]
    Delivery { message: String },
}

impl VerificationError {
    /// Machine-readable error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Expired => "EXPIRED",
            Self::Exhausted => "EXHAUSTED",
            Self::Mismatch { .. } => "MISMATCH",
            Self::RateLimited { .. } => "RATE_LIMITED",
            Self::Store { .. } => "STORE_ERROR",
            Self::Delivery { .. } => "DELIVERY_ERROR",
        }
    }
}

pub type VerificationResult<T> = Result<T, VerificationError>;

/// Unified error response structure for transport layers
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Additional error details if available
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, serde_json::Value>>,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(error: impl ToString, message: impl ToString) -> Self {
        Self {
            error: error.to_string(),
            message: message.to_string(),
            details: None,
        }
    }

    /// Add a single detail to the error response
    pub fn with_detail(mut self, key: impl ToString, value: serde_json::Value) -> Self {
        let mut details = self.details.unwrap_or_default();
        details.insert(key.to_string(), value);
        self.details = Some(details);
        self
    }
}

impl From<VerificationError> for ErrorResponse {
    fn from(err: VerificationError) -> Self {
        let response = ErrorResponse::new(err.error_code(), err.to_string());
        match err {
            VerificationError::Mismatch {
                remaining: Some(remaining),
            } => response.with_detail("remaining_attempts", serde_json::json!(remaining)),
            VerificationError::RateLimited {
                retry_after_seconds,
            } => response.with_detail(
                "retry_after_seconds",
                serde_json::json!(retry_after_seconds),
            ),
            _ => response,
        }
    }
}
