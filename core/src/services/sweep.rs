//! Periodic removal of expired verification secrets.

use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info};

use crate::domain::entities::{EmailCode, EmailToken};
use crate::errors::VerificationResult;
use crate::repositories::secret::{SecretRecord, SecretStore};

/// Configuration for the background sweep
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Seconds between sweep runs
    pub interval_seconds: u64,

    /// Whether the background task runs at all
    pub enabled: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 3600,
            enabled: true,
        }
    }
}

impl From<&mp_shared::AppConfig> for SweepConfig {
    fn from(config: &mp_shared::AppConfig) -> Self {
        Self {
            interval_seconds: config.verification.sweep_interval_seconds,
            enabled: true,
        }
    }
}

/// Outcome of a single sweep run
#[derive(Debug, Clone, Default)]
pub struct SweepReport {
    /// Expired code records removed
    pub codes_deleted: usize,

    /// Expired token records removed
    pub tokens_deleted: usize,

    /// Failures encountered; the sweep continues past them
    pub errors: Vec<String>,
}

/// Walks both secret stores and deletes records past their TTL.
///
/// The sweep is an efficiency measure only. The lifecycle services check
/// expiry on every read, so a record the sweep has not reached yet is still
/// rejected at confirm time.
pub struct SweepService<C, T>
where
    C: SecretStore<EmailCode> + 'static,
    T: SecretStore<EmailToken> + 'static,
{
    code_store: Arc<C>,
    token_store: Arc<T>,
    config: SweepConfig,
}

impl<C, T> SweepService<C, T>
where
    C: SecretStore<EmailCode> + 'static,
    T: SecretStore<EmailToken> + 'static,
{
    pub fn new(code_store: Arc<C>, token_store: Arc<T>) -> Self {
        Self::with_config(code_store, token_store, SweepConfig::default())
    }

    pub fn with_config(code_store: Arc<C>, token_store: Arc<T>, config: SweepConfig) -> Self {
        Self {
            code_store,
            token_store,
            config,
        }
    }

    /// Runs one sweep over both stores.
    ///
    /// Never fails: store errors are collected into the report so one bad
    /// backend cannot stop the other store's sweep.
    pub async fn run_sweep(&self) -> SweepReport {
        let mut report = SweepReport::default();

        match sweep_store::<EmailCode>(self.code_store.as_ref()).await {
            Ok(deleted) => report.codes_deleted = deleted,
            Err(e) => report.errors.push(format!("code sweep: {}", e)),
        }

        match sweep_store::<EmailToken>(self.token_store.as_ref()).await {
            Ok(deleted) => report.tokens_deleted = deleted,
            Err(e) => report.errors.push(format!("token sweep: {}", e)),
        }

        if report.errors.is_empty() {
            info!(
                codes_deleted = report.codes_deleted,
                tokens_deleted = report.tokens_deleted,
                event = "sweep_completed",
                "Expired secret sweep completed"
            );
        } else {
            error!(
                codes_deleted = report.codes_deleted,
                tokens_deleted = report.tokens_deleted,
                errors = ?report.errors,
                event = "sweep_partial",
                "Expired secret sweep completed with errors"
            );
        }

        report
    }

    /// Spawns the periodic sweep loop. The first run fires immediately.
    pub fn start_background_task(self: Arc<Self>) -> Option<tokio::task::JoinHandle<()>> {
        if !self.config.enabled {
            info!("Secret sweep background task disabled");
            return None;
        }

        let interval_seconds = self.config.interval_seconds;
        Some(tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(std::time::Duration::from_secs(interval_seconds));
            info!(
                interval_seconds,
                "Secret sweep background task started"
            );
            loop {
                interval.tick().await;
                self.run_sweep().await;
            }
        }))
    }
}

/// Deletes every expired record in one store, returning the count
async fn sweep_store<R: SecretRecord>(store: &dyn SecretStore<R>) -> VerificationResult<usize> {
    let now = Utc::now();
    let mut deleted = 0;

    for (identity, record) in store.scan_all().await? {
        if record.is_expired_at(now) && store.delete(&identity).await? {
            deleted += 1;
        }
    }

    Ok(deleted)
}
