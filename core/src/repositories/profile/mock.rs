//! In-memory profile store for tests and examples.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::r#trait::UserProfileStore;
use crate::domain::entities::UserProfile;
use crate::errors::{VerificationError, VerificationResult};

/// A process-local [`UserProfileStore`] that also records which profiles were
/// flipped to verified, so tests can assert on side effects.
#[derive(Clone, Default)]
pub struct MockUserProfileStore {
    profiles: Arc<RwLock<HashMap<String, UserProfile>>>,
    verified_calls: Arc<RwLock<Vec<String>>>,
}

impl MockUserProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a profile
    pub async fn insert(&self, profile: UserProfile) {
        self.profiles
            .write()
            .await
            .insert(profile.user_id.clone(), profile);
    }

    /// User ids passed to `set_email_verified`, in call order
    pub async fn verified_calls(&self) -> Vec<String> {
        self.verified_calls.read().await.clone()
    }
}

#[async_trait]
impl UserProfileStore for MockUserProfileStore {
    async fn find_by_id(&self, user_id: &str) -> VerificationResult<Option<UserProfile>> {
        Ok(self.profiles.read().await.get(user_id).cloned())
    }

    async fn set_email_verified(&self, user_id: &str) -> VerificationResult<()> {
        self.verified_calls.write().await.push(user_id.to_string());

        let mut profiles = self.profiles.write().await;
        match profiles.get_mut(user_id) {
            Some(profile) => {
                profile.mark_email_verified();
                Ok(())
            }
            None => Err(VerificationError::NotFound {
                resource: "user".to_string(),
            }),
        }
    }
}
