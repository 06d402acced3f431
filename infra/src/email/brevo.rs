//! Brevo transactional email delivery.
//!
//! Implements the notifier seam over Brevo's `smtp/email` endpoint. Errors
//! are returned as provider messages; the lifecycle services own the
//! decision of what happens to the stored secret afterwards.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info};

use mp_core::domain::entities::{CODE_TTL_MINUTES, TOKEN_TTL_HOURS};
use mp_core::services::notifier::EmailNotifier;
use mp_shared::utils::email::mask_email;

use super::templates;
use crate::InfraError;

const DEFAULT_API_URL: &str = "https://api.brevo.com/v3/smtp/email";

/// Brevo mailer configuration
#[derive(Debug, Clone)]
pub struct BrevoConfig {
    /// Brevo API key
    pub api_key: String,
    /// Sender address registered with Brevo
    pub sender_email: String,
    /// Optional sender display name
    pub sender_name: Option<String>,
    /// API endpoint, overridable for tests
    pub api_url: String,
    /// Timeout for API requests in seconds
    pub request_timeout_secs: u64,
}

impl BrevoConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self, InfraError> {
        let api_key = std::env::var("BREVO_API_KEY")
            .map_err(|_| InfraError::Config("BREVO_API_KEY not set".to_string()))?;
        let sender_email = std::env::var("BREVO_SENDER_EMAIL")
            .map_err(|_| InfraError::Config("BREVO_SENDER_EMAIL not set".to_string()))?;

        Ok(Self {
            api_key,
            sender_email,
            sender_name: std::env::var("BREVO_SENDER_NAME").ok(),
            api_url: std::env::var("BREVO_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            request_timeout_secs: std::env::var("BREVO_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
        })
    }
}

#[derive(Debug, Serialize)]
struct Party<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendEmailRequest<'a> {
    sender: Party<'a>,
    to: Vec<Party<'a>>,
    subject: &'a str,
    html_content: &'a str,
    text_content: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendEmailResponse {
    message_id: String,
}

/// Email notifier backed by the Brevo API
pub struct BrevoMailer {
    client: reqwest::Client,
    config: BrevoConfig,
}

impl BrevoMailer {
    pub fn new(config: BrevoConfig) -> Result<Self, InfraError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(InfraError::Http)?;

        info!(
            sender = %mask_email(&config.sender_email),
            "Brevo mailer initialized"
        );
        Ok(Self { client, config })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self, InfraError> {
        Self::new(BrevoConfig::from_env()?)
    }

    async fn send(
        &self,
        to: &str,
        to_name: Option<&str>,
        subject: &str,
        html: &str,
        text: &str,
    ) -> Result<String, String> {
        let request = SendEmailRequest {
            sender: Party {
                email: &self.config.sender_email,
                name: self.config.sender_name.as_deref(),
            },
            to: vec![Party {
                email: to,
                name: to_name,
            }],
            subject,
            html_content: html,
            text_content: text,
        };

        let response = self
            .client
            .post(&self.config.api_url)
            .header("api-key", &self.config.api_key)
            .header("accept", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| format!("Brevo request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(
                to = %mask_email(to),
                status = %status,
                "Brevo rejected the email"
            );
            return Err(format!("Brevo returned {}: {}", status, body));
        }

        let parsed: SendEmailResponse = response
            .json()
            .await
            .map_err(|e| format!("Brevo response unreadable: {}", e))?;

        debug!(
            to = %mask_email(to),
            message_id = %parsed.message_id,
            "Email accepted by Brevo"
        );
        Ok(parsed.message_id)
    }
}

#[async_trait]
impl EmailNotifier for BrevoMailer {
    async fn send_code(&self, email: &str, code: &str) -> Result<String, String> {
        self.send(
            email,
            None,
            &templates::code_subject(),
            &templates::code_html(code, CODE_TTL_MINUTES),
            &templates::code_text(code, CODE_TTL_MINUTES),
        )
        .await
    }

    async fn send_verification_link(
        &self,
        email: &str,
        name: Option<&str>,
        link: &str,
    ) -> Result<String, String> {
        self.send(
            email,
            name,
            &templates::welcome_subject(),
            &templates::welcome_html(name, link, TOKEN_TTL_HOURS),
            &templates::welcome_text(name, link, TOKEN_TTL_HOURS),
        )
        .await
    }
}
