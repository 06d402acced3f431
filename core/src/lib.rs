//! # MailProof Core
//!
//! Core verification-secret lifecycle management for the MailProof backend.
//! This crate contains the domain entities, lifecycle services, persistence
//! interfaces, and error types governing creation, expiry, attempt limiting,
//! and consumption of email verification secrets.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
