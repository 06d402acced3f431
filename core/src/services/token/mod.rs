//! Post-account verification token flow.

pub mod config;
pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use config::TokenServiceConfig;
pub use service::TokenVerificationService;
pub use types::{ConfirmTokenResult, ResendResult, SendWelcomeResult};
