//! Lifecycle services driving the verification flows.

pub mod code;
pub mod notifier;
pub mod rate_limit;
pub mod sweep;
pub mod token;

pub use code::{CodeServiceConfig, CodeVerificationService, ConfirmCodeResult, RequestCodeResult};
pub use notifier::EmailNotifier;
pub use rate_limit::{RateLimiter, SlidingWindowRateLimiter};
pub use sweep::{SweepConfig, SweepReport, SweepService};
pub use token::{
    ConfirmTokenResult, ResendResult, SendWelcomeResult, TokenServiceConfig,
    TokenVerificationService,
};
