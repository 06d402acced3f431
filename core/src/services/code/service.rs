//! Issuance and confirmation of 6-digit verification codes.

use chrono::Duration;
use std::sync::Arc;
use tracing::{info, warn};

use super::config::CodeServiceConfig;
use super::types::{ConfirmCodeResult, RequestCodeResult};
use crate::domain::entities::{EmailCode, CODE_LENGTH};
use crate::errors::{VerificationError, VerificationResult};
use crate::repositories::secret::SecretStore;
use crate::services::notifier::EmailNotifier;
use crate::services::rate_limit::RateLimiter;
use mp_shared::utils::email::{is_valid_email, mask_email};

/// Drives the anonymous code flow: mint a code, deliver it, confirm it.
///
/// One live code per email address; issuing again replaces any pending code
/// and resets its attempt budget.
pub struct CodeVerificationService<S, N, L>
where
    S: SecretStore<EmailCode>,
    N: EmailNotifier,
    L: RateLimiter,
{
    store: Arc<S>,
    notifier: Arc<N>,
    rate_limiter: Arc<L>,
    config: CodeServiceConfig,
}

impl<S, N, L> CodeVerificationService<S, N, L>
where
    S: SecretStore<EmailCode>,
    N: EmailNotifier,
    L: RateLimiter,
{
    pub fn new(store: Arc<S>, notifier: Arc<N>, rate_limiter: Arc<L>) -> Self {
        Self::with_config(store, notifier, rate_limiter, CodeServiceConfig::default())
    }

    pub fn with_config(
        store: Arc<S>,
        notifier: Arc<N>,
        rate_limiter: Arc<L>,
        config: CodeServiceConfig,
    ) -> Self {
        Self {
            store,
            notifier,
            rate_limiter,
            config,
        }
    }

    /// Issues a fresh code for the email address and delivers it.
    ///
    /// Validation happens before the rate limiter is consulted, so malformed
    /// requests never consume window capacity. A delivery failure destroys
    /// the freshly stored code: a code the recipient never saw must not stay
    /// verifiable.
    pub async fn request_code(&self, email: &str) -> VerificationResult<RequestCodeResult> {
        let email = normalize_email(email)?;

        if self.config.rate_limit_enabled {
            self.rate_limiter
                .check_and_record(
                    &email,
                    Duration::seconds(self.config.rate_limit_window_seconds),
                    self.config.rate_limit_max_requests,
                )
                .await?;
        }

        let code = EmailCode::new_with_ttl(email.clone(), self.config.code_ttl_minutes);
        let expires_in_seconds = code.expires_in_seconds();
        self.store.put(&email, &code).await?;

        match self.notifier.send_code(&email, &code.code).await {
            Ok(message_id) => {
                info!(
                    email = %mask_email(&email),
                    expires_in_seconds,
                    event = "code_issued",
                    "Verification code issued and delivered"
                );
                Ok(RequestCodeResult {
                    expires_in_seconds,
                    message_id,
                })
            }
            Err(provider_error) => {
                // Best effort; the code is unusable either way once deleted
                if let Err(cleanup_error) = self.store.delete(&email).await {
                    warn!(
                        email = %mask_email(&email),
                        error = %cleanup_error,
                        event = "code_cleanup_failed",
                        "Failed to remove undelivered code"
                    );
                }
                warn!(
                    email = %mask_email(&email),
                    error = %provider_error,
                    event = "code_delivery_failed",
                    "Verification code delivery failed"
                );
                Err(VerificationError::Delivery {
                    message: provider_error,
                })
            }
        }
    }

    /// Confirms a presented code against the pending one.
    ///
    /// Expiry is checked before the attempt budget, and the budget before
    /// the comparison. A match, an expired record, and an exhausted budget
    /// all destroy the record; a plain mismatch keeps it and burns one
    /// attempt.
    pub async fn confirm_code(
        &self,
        email: &str,
        presented: &str,
    ) -> VerificationResult<ConfirmCodeResult> {
        let email = normalize_email(email)?;
        validate_code_shape(presented)?;

        let code = self
            .store
            .get(&email)
            .await?
            .ok_or_else(|| VerificationError::NotFound {
                resource: "verification code".to_string(),
            })?;

        if code.is_expired() {
            self.store.delete(&email).await?;
            info!(
                email = %mask_email(&email),
                event = "code_expired",
                "Verification code expired on confirm"
            );
            return Err(VerificationError::Expired);
        }

        if code.attempts >= self.config.max_attempts {
            self.store.delete(&email).await?;
            warn!(
                email = %mask_email(&email),
                event = "code_exhausted",
                "Verification code attempt budget exhausted"
            );
            return Err(VerificationError::Exhausted);
        }

        if !code.matches(presented) {
            let attempts = self.store.increment_attempts(&email).await?;
            let remaining = (self.config.max_attempts - attempts).max(0) as u32;
            info!(
                email = %mask_email(&email),
                remaining,
                event = "code_mismatch",
                "Verification code mismatch"
            );
            return Err(VerificationError::Mismatch {
                remaining: Some(remaining),
            });
        }

        // The delete is the serialization point: of two racing confirmations
        // only the caller whose delete removed the record consumes the code
        if !self.store.delete(&email).await? {
            return Err(VerificationError::NotFound {
                resource: "verification code".to_string(),
            });
        }
        info!(
            email = %mask_email(&email),
            event = "code_verified",
            "Verification code confirmed"
        );
        Ok(ConfirmCodeResult { verified: true })
    }
}

/// Validates and lowercases the address; storage keys are case-insensitive
fn normalize_email(email: &str) -> VerificationResult<String> {
    let trimmed = email.trim();
    if !is_valid_email(trimmed) {
        return Err(VerificationError::Validation {
            message: "Invalid email address".to_string(),
        });
    }
    Ok(trimmed.to_lowercase())
}

/// A presented code must be exactly six ASCII digits
fn validate_code_shape(presented: &str) -> VerificationResult<()> {
    if presented.len() != CODE_LENGTH || !presented.chars().all(|c| c.is_ascii_digit()) {
        return Err(VerificationError::Validation {
            message: "Verification code must be 6 digits".to_string(),
        });
    }
    Ok(())
}
