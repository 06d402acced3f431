//! # Infrastructure Layer
//!
//! Concrete backends for the MailProof verification services:
//! - **Store**: Redis-backed secret storage and sliding-window rate limiting
//! - **Email**: Brevo transactional email delivery plus a mock for tests

pub mod email;
pub mod store;

pub use email::{BrevoConfig, BrevoMailer, MockMailer};
pub use store::{RedisClient, RedisRateLimiter, RedisSecretStore};

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfraError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
}
