//! Mock mailer for tests, examples, and local development.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use mp_core::services::notifier::EmailNotifier;
use mp_shared::utils::email::mask_email;

/// What a captured email carried
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentEmailKind {
    Code(String),
    Link(String),
}

/// A delivery captured by the mock
#[derive(Debug, Clone)]
pub struct SentEmail {
    pub to: String,
    pub kind: SentEmailKind,
}

/// In-memory notifier that records every delivery.
///
/// Clones share the captured deliveries. Logs only masked addresses, never
/// the captured secrets.
#[derive(Clone, Default)]
pub struct MockMailer {
    sent: Arc<Mutex<Vec<SentEmail>>>,
    send_count: Arc<AtomicU64>,
    fail: Arc<AtomicBool>,
}

impl MockMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent send fail with a provider error
    pub fn simulate_failure(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn send_count(&self) -> u64 {
        self.send_count.load(Ordering::SeqCst)
    }

    /// All captured deliveries, in send order
    pub async fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().await.clone()
    }

    /// Code most recently delivered to the address
    pub async fn last_code_for(&self, email: &str) -> Option<String> {
        self.sent.lock().await.iter().rev().find_map(|mail| {
            match (&mail.kind, mail.to == email) {
                (SentEmailKind::Code(code), true) => Some(code.clone()),
                _ => None,
            }
        })
    }

    /// Link most recently delivered to the address
    pub async fn last_link_for(&self, email: &str) -> Option<String> {
        self.sent.lock().await.iter().rev().find_map(|mail| {
            match (&mail.kind, mail.to == email) {
                (SentEmailKind::Link(link), true) => Some(link.clone()),
                _ => None,
            }
        })
    }

    async fn record(&self, mail: SentEmail) -> Result<String, String> {
        if self.fail.load(Ordering::SeqCst) {
            return Err("mock mailer: simulated failure".to_string());
        }

        info!(to = %mask_email(&mail.to), "Mock mailer captured a delivery");
        self.sent.lock().await.push(mail);
        self.send_count.fetch_add(1, Ordering::SeqCst);
        Ok(format!("mock-msg-{}", Uuid::new_v4()))
    }
}

#[async_trait]
impl EmailNotifier for MockMailer {
    async fn send_code(&self, email: &str, code: &str) -> Result<String, String> {
        self.record(SentEmail {
            to: email.to_string(),
            kind: SentEmailKind::Code(code.to_string()),
        })
        .await
    }

    async fn send_verification_link(
        &self,
        email: &str,
        _name: Option<&str>,
        link: &str,
    ) -> Result<String, String> {
        self.record(SentEmail {
            to: email.to_string(),
            kind: SentEmailKind::Link(link.to_string()),
        })
        .await
    }
}
