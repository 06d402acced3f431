//! Tunables for the token verification flow.

use mp_shared::AppConfig;

use crate::domain::entities::TOKEN_TTL_HOURS;

/// Configuration for [`TokenVerificationService`](super::TokenVerificationService)
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// Hours until an issued token expires
    pub token_ttl_hours: i64,

    /// Base URL the verification link is built on
    pub verify_base_url: String,
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self {
            token_ttl_hours: TOKEN_TTL_HOURS,
            verify_base_url: "https://app.mailproof.dev".to_string(),
        }
    }
}

impl From<&AppConfig> for TokenServiceConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            token_ttl_hours: config.verification.token_ttl_hours,
            verify_base_url: config.email.verify_base_url.clone(),
        }
    }
}
