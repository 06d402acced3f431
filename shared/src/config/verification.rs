//! Verification secret lifecycle configuration

use serde::{Deserialize, Serialize};

/// Configuration for secret TTLs, the attempt budget, and the expiry sweep
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VerificationConfig {
    /// Minutes before an emailed code expires
    #[serde(default = "default_code_ttl_minutes")]
    pub code_ttl_minutes: i64,

    /// Maximum failed validation attempts per code
    #[serde(default = "default_code_max_attempts")]
    pub code_max_attempts: i64,

    /// Hours before a verification-link token expires
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,

    /// Seconds between expiry sweep runs
    #[serde(default = "default_sweep_interval_seconds")]
    pub sweep_interval_seconds: u64,
}

fn default_code_ttl_minutes() -> i64 {
    10
}

fn default_code_max_attempts() -> i64 {
    5
}

fn default_token_ttl_hours() -> i64 {
    24
}

fn default_sweep_interval_seconds() -> u64 {
    3600
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            code_ttl_minutes: default_code_ttl_minutes(),
            code_max_attempts: default_code_max_attempts(),
            token_ttl_hours: default_token_ttl_hours(),
            sweep_interval_seconds: default_sweep_interval_seconds(),
        }
    }
}
