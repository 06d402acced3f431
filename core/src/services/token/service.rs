//! Issuance and confirmation of opaque verification tokens.

use std::sync::Arc;
use tracing::{info, warn};

use super::config::TokenServiceConfig;
use super::types::{ConfirmTokenResult, ResendResult, SendWelcomeResult};
use crate::domain::entities::EmailToken;
use crate::domain::value_objects::Caller;
use crate::errors::{VerificationError, VerificationResult};
use crate::repositories::profile::UserProfileStore;
use crate::repositories::secret::SecretStore;
use crate::services::notifier::EmailNotifier;
use mp_shared::utils::email::{is_valid_email, mask_email};

/// Drives the authenticated token flow: welcome email with a verification
/// link, idempotent confirmation, and resend.
///
/// Tokens are keyed by account id, one live token per account. Unlike codes,
/// a token survives a delivery failure: the account holder can always ask
/// for a resend, which replaces it anyway.
pub struct TokenVerificationService<S, P, N>
where
    S: SecretStore<EmailToken>,
    P: UserProfileStore,
    N: EmailNotifier,
{
    store: Arc<S>,
    profiles: Arc<P>,
    notifier: Arc<N>,
    config: TokenServiceConfig,
}

impl<S, P, N> TokenVerificationService<S, P, N>
where
    S: SecretStore<EmailToken>,
    P: UserProfileStore,
    N: EmailNotifier,
{
    pub fn new(store: Arc<S>, profiles: Arc<P>, notifier: Arc<N>) -> Self {
        Self::with_config(store, profiles, notifier, TokenServiceConfig::default())
    }

    pub fn with_config(
        store: Arc<S>,
        profiles: Arc<P>,
        notifier: Arc<N>,
        config: TokenServiceConfig,
    ) -> Self {
        Self {
            store,
            profiles,
            notifier,
            config,
        }
    }

    /// Sends the welcome email carrying a fresh verification link.
    ///
    /// The caller must hold the authenticated capability; the target account
    /// is named explicitly and need not be the caller's own. Any pending
    /// token for the account is replaced.
    pub async fn send_welcome(
        &self,
        caller: &Caller,
        user_id: &str,
        email: &str,
        display_name: Option<&str>,
    ) -> VerificationResult<SendWelcomeResult> {
        caller.require_authenticated()?;
        let user_id = validate_user_id(user_id)?;

        let email = email.trim().to_lowercase();
        if !is_valid_email(&email) {
            return Err(VerificationError::Validation {
                message: "Invalid email address".to_string(),
            });
        }

        self.issue_and_send(user_id, &email, display_name).await
    }

    /// Confirms a presented token and flips the profile's verified flag.
    ///
    /// Idempotent: confirming an already consumed token succeeds without
    /// side effects. The profile update is best effort; a failure there is
    /// logged but never rolls back the consumed token.
    pub async fn confirm_token(
        &self,
        user_id: &str,
        presented: &str,
    ) -> VerificationResult<ConfirmTokenResult> {
        if user_id.trim().is_empty() || presented.trim().is_empty() {
            return Err(VerificationError::Validation {
                message: "User id and token are required".to_string(),
            });
        }

        let mut token = self
            .store
            .get(user_id)
            .await?
            .ok_or_else(|| VerificationError::NotFound {
                resource: "email verification".to_string(),
            })?;

        if token.verified {
            info!(
                user_id,
                event = "token_already_verified",
                "Verification token already consumed"
            );
            return Ok(ConfirmTokenResult {
                verified: true,
                already_verified: true,
                profile_updated: false,
            });
        }

        if token.is_expired() {
            self.store.delete(user_id).await?;
            info!(
                user_id,
                event = "token_expired",
                "Verification token expired on confirm"
            );
            return Err(VerificationError::Expired);
        }

        if !token.matches(presented.trim()) {
            // Tokens carry no attempt budget; the record stays
            warn!(
                user_id,
                event = "token_mismatch",
                "Verification token mismatch"
            );
            return Err(VerificationError::Mismatch { remaining: None });
        }

        // Consume-and-rewrite: the delete serializes racing confirmations,
        // so only the winner flips the profile flag. The loser sees the
        // record already taken and reports the idempotent outcome.
        if !self.store.delete(user_id).await? {
            info!(
                user_id,
                event = "token_already_verified",
                "Verification token consumed by a concurrent confirmation"
            );
            return Ok(ConfirmTokenResult {
                verified: true,
                already_verified: true,
                profile_updated: false,
            });
        }
        token.mark_verified();
        self.store.put(user_id, &token).await?;

        let profile_updated = match self.profiles.set_email_verified(user_id).await {
            Ok(()) => true,
            Err(error) => {
                warn!(
                    user_id,
                    error = %error,
                    event = "profile_update_failed",
                    "Token consumed but profile flag not updated"
                );
                false
            }
        };

        info!(
            user_id,
            email = %mask_email(&token.email),
            profile_updated,
            event = "token_verified",
            "Verification token confirmed"
        );
        Ok(ConfirmTokenResult {
            verified: true,
            already_verified: false,
            profile_updated,
        })
    }

    /// Reissues the verification email for the named account.
    ///
    /// Short-circuits when the profile is already verified; otherwise mints
    /// a fresh token (replacing any pending one) and sends it to the email
    /// on file.
    pub async fn resend(&self, caller: &Caller, user_id: &str) -> VerificationResult<ResendResult> {
        caller.require_authenticated()?;
        let user_id = validate_user_id(user_id)?;

        let profile = self
            .profiles
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| VerificationError::NotFound {
                resource: "user".to_string(),
            })?;

        if profile.email.trim().is_empty() {
            return Err(VerificationError::NotFound {
                resource: "user email".to_string(),
            });
        }

        if profile.email_verified {
            info!(
                user_id = %user_id,
                event = "resend_skipped",
                "Email already verified, nothing to resend"
            );
            return Ok(ResendResult {
                already_verified: true,
                message_id: None,
            });
        }

        let result = self
            .issue_and_send(user_id, &profile.email, profile.display_name.as_deref())
            .await?;

        Ok(ResendResult {
            already_verified: false,
            message_id: Some(result.message_id),
        })
    }

    /// Mints a token, stores it, and delivers the link.
    ///
    /// The record is written before the send and kept on delivery failure.
    async fn issue_and_send(
        &self,
        user_id: &str,
        email: &str,
        display_name: Option<&str>,
    ) -> VerificationResult<SendWelcomeResult> {
        let token = EmailToken::new_with_ttl(
            user_id.to_string(),
            email.to_string(),
            self.config.token_ttl_hours,
        );
        let expires_in_seconds = token.expires_in_seconds();
        self.store.put(user_id, &token).await?;

        let link = self.verification_link(&token.token, user_id);
        match self
            .notifier
            .send_verification_link(email, display_name, &link)
            .await
        {
            Ok(message_id) => {
                info!(
                    user_id,
                    email = %mask_email(email),
                    expires_in_seconds,
                    event = "token_issued",
                    "Verification link issued and delivered"
                );
                Ok(SendWelcomeResult {
                    message_id,
                    expires_in_seconds,
                })
            }
            Err(provider_error) => {
                warn!(
                    user_id,
                    email = %mask_email(email),
                    error = %provider_error,
                    event = "token_delivery_failed",
                    "Verification link delivery failed, token kept for resend"
                );
                Err(VerificationError::Delivery {
                    message: provider_error,
                })
            }
        }
    }

    fn verification_link(&self, token: &str, user_id: &str) -> String {
        format!(
            "{}/verify-email?token={}&user_id={}",
            self.config.verify_base_url.trim_end_matches('/'),
            token,
            user_id
        )
    }
}

/// A target account id must be present; a blank one would key the token
/// under the empty string
fn validate_user_id(user_id: &str) -> VerificationResult<&str> {
    let trimmed = user_id.trim();
    if trimmed.is_empty() {
        return Err(VerificationError::Validation {
            message: "User id is required".to_string(),
        });
    }
    Ok(trimmed)
}
