//! Access to account profiles for the token verification flow.

use async_trait::async_trait;

use crate::domain::entities::UserProfile;
use crate::errors::VerificationResult;

/// Lookup and mutation of account profiles.
///
/// The token service reads profiles to resend verification links and flips
/// the verified flag after a successful confirmation.
#[async_trait]
pub trait UserProfileStore: Send + Sync {
    /// Fetches a profile by account id
    async fn find_by_id(&self, user_id: &str) -> VerificationResult<Option<UserProfile>>;

    /// Marks the profile's email as verified
    async fn set_email_verified(&self, user_id: &str) -> VerificationResult<()>;
}
