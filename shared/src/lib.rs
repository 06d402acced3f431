//! Shared configuration types and utilities for the MailProof workspace.
//!
//! This crate provides common functionality used across the server crates:
//! - Configuration types with environment loading
//! - Email address validation and masking helpers

pub mod config;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{AppConfig, EmailConfig, RateLimitConfig, VerificationConfig};
pub use utils::email;
