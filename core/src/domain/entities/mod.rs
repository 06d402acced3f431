//! Domain entities representing verification secrets and user profiles.

pub mod email_code;
pub mod email_token;
pub mod user_profile;

// Re-export commonly used types
pub use email_code::{EmailCode, CODE_LENGTH, CODE_MAX_ATTEMPTS, CODE_TTL_MINUTES};
pub use email_token::{EmailToken, TOKEN_BYTES, TOKEN_TTL_HOURS};
pub use user_profile::UserProfile;
