//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `email` - Sender identity and verification-link settings
//! - `rate_limit` - Issuance rate limiting
//! - `verification` - Secret TTLs, attempt budget, and sweep schedule

pub mod email;
pub mod rate_limit;
pub mod verification;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use email::EmailConfig;
pub use rate_limit::RateLimitConfig;
pub use verification::VerificationConfig;

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// Secret lifecycle configuration
    #[serde(default)]
    pub verification: VerificationConfig,

    /// Issuance rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Email delivery configuration
    #[serde(default)]
    pub email: EmailConfig,
}

impl AppConfig {
    /// Load configuration from an optional `mailproof.toml` file merged with
    /// `MAILPROOF__`-prefixed environment variables.
    ///
    /// Example: `MAILPROOF__RATE_LIMIT__ISSUE_MAX_REQUESTS=5`
    pub fn load() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::with_name("mailproof").required(false))
            .add_source(config::Environment::with_prefix("MAILPROOF").separator("__"))
            .build()?
            .try_deserialize()
    }
}
