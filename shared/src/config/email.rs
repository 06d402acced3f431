//! Email delivery configuration

use serde::{Deserialize, Serialize};

/// Email delivery configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmailConfig {
    /// Email provider ("brevo" or "mock")
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Sender address on outgoing mail
    #[serde(default = "default_sender_email")]
    pub sender_email: String,

    /// Optional sender display name
    #[serde(default)]
    pub sender_name: Option<String>,

    /// Base URL verification links are built on
    #[serde(default = "default_verify_base_url")]
    pub verify_base_url: String,
}

fn default_provider() -> String {
    "mock".to_string()
}

fn default_sender_email() -> String {
    "noreply@mailproof.dev".to_string()
}

fn default_verify_base_url() -> String {
    "https://app.mailproof.dev".to_string()
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            sender_email: default_sender_email(),
            sender_name: None,
            verify_base_url: default_verify_base_url(),
        }
    }
}
