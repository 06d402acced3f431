//! Pre-account verification code flow.

pub mod config;
pub mod service;
pub mod types;


pub use config::CodeServiceConfig;
pub use service::CodeVerificationService;
pub use types::{ConfirmCodeResult, RequestCodeResult};
