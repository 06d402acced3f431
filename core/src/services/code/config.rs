//! Tunables for the code verification flow.

use mp_shared::AppConfig;

use crate::domain::entities::{CODE_MAX_ATTEMPTS, CODE_TTL_MINUTES};

/// Configuration for [`CodeVerificationService`](super::CodeVerificationService)
#[derive(Debug, Clone)]
pub struct CodeServiceConfig {
    /// Minutes until an issued code expires
    pub code_ttl_minutes: i64,

    /// Failed confirmations allowed before a code is destroyed
    pub max_attempts: i64,

    /// Whether issuance is throttled at all
    pub rate_limit_enabled: bool,

    /// Length of the issuance rate-limit window in seconds
    pub rate_limit_window_seconds: i64,

    /// Issuance requests allowed per identity within the window
    pub rate_limit_max_requests: u32,
}

impl Default for CodeServiceConfig {
    fn default() -> Self {
        Self {
            code_ttl_minutes: CODE_TTL_MINUTES,
            max_attempts: CODE_MAX_ATTEMPTS,
            rate_limit_enabled: true,
            rate_limit_window_seconds: 60,
            rate_limit_max_requests: 3,
        }
    }
}

impl From<&AppConfig> for CodeServiceConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            code_ttl_minutes: config.verification.code_ttl_minutes,
            max_attempts: config.verification.code_max_attempts,
            rate_limit_enabled: config.rate_limit.enabled,
            rate_limit_window_seconds: config.rate_limit.issue_window_seconds,
            rate_limit_max_requests: config.rate_limit.issue_max_requests,
        }
    }
}
