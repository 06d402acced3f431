//! Issuance rate limiting configuration

use serde::{Deserialize, Serialize};

/// Rate limiting configuration for secret issuance
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Enable rate limiting
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Sliding window length in seconds
    #[serde(default = "default_issue_window_seconds")]
    pub issue_window_seconds: i64,

    /// Maximum issuance requests per identity within the window
    #[serde(default = "default_issue_max_requests")]
    pub issue_max_requests: u32,
}

fn default_enabled() -> bool {
    true
}

fn default_issue_window_seconds() -> i64 {
    60
}

fn default_issue_max_requests() -> u32 {
    3
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            issue_window_seconds: default_issue_window_seconds(),
            issue_max_requests: default_issue_max_requests(),
        }
    }
}
