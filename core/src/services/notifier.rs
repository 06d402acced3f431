//! Outbound email delivery seam.

use async_trait::async_trait;

/// Delivery of verification emails.
///
/// Implementations return a provider message id on success and a provider
/// error message on failure; the lifecycle services translate failures into
/// their own error taxonomy and decide what happens to the stored secret.
#[async_trait]
pub trait EmailNotifier: Send + Sync {
    /// Sends a 6-digit verification code to the address
    async fn send_code(&self, email: &str, code: &str) -> Result<String, String>;

    /// Sends a welcome email carrying a verification link
    async fn send_verification_link(
        &self,
        email: &str,
        name: Option<&str>,
        link: &str,
    ) -> Result<String, String>;
}
