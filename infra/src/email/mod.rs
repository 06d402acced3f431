//! Email delivery backends implementing the notifier seam.

pub mod brevo;
pub mod mock;
mod templates;

pub use brevo::{BrevoConfig, BrevoMailer};
pub use mock::{MockMailer, SentEmail, SentEmailKind};
