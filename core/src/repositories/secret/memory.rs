//! In-memory secret store for tests, examples, and single-process deployments.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::r#trait::{SecretRecord, SecretStore};
use crate::errors::{VerificationError, VerificationResult};

/// A process-local [`SecretStore`] backed by a `HashMap`.
///
/// Clones share the same underlying map, so a service and a sweep task can
/// hold separate handles over the same records.
#[derive(Clone)]
pub struct MemorySecretStore<R: SecretRecord> {
    records: Arc<RwLock<HashMap<String, R>>>,
}

impl<R: SecretRecord> MemorySecretStore<R> {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of live records, used by tests and the sweep report
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

impl<R: SecretRecord> Default for MemorySecretStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: SecretRecord> SecretStore<R> for MemorySecretStore<R> {
    async fn put(&self, identity: &str, record: &R) -> VerificationResult<()> {
        self.records
            .write()
            .await
            .insert(identity.to_string(), record.clone());
        Ok(())
    }

    async fn get(&self, identity: &str) -> VerificationResult<Option<R>> {
        Ok(self.records.read().await.get(identity).cloned())
    }

    async fn delete(&self, identity: &str) -> VerificationResult<bool> {
        Ok(self.records.write().await.remove(identity).is_some())
    }

    async fn increment_attempts(&self, identity: &str) -> VerificationResult<i64> {
        let mut records = self.records.write().await;
        match records.get_mut(identity) {
            Some(record) => Ok(record.record_attempt()),
            None => Err(VerificationError::NotFound {
                resource: "verification secret".to_string(),
            }),
        }
    }

    async fn scan_all(&self) -> VerificationResult<Vec<(String, R)>> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .map(|(identity, record)| (identity.clone(), record.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::EmailCode;

    #[tokio::test]
    async fn test_put_get_delete() {
        let store = MemorySecretStore::new();
        let code = EmailCode::new("alice@example.com".to_string());

        store.put("alice@example.com", &code).await.unwrap();
        let fetched = store.get("alice@example.com").await.unwrap().unwrap();
        assert_eq!(fetched, code);

        assert!(store.delete("alice@example.com").await.unwrap());
        assert!(store.get("alice@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let store = MemorySecretStore::new();
        let first = EmailCode::new("alice@example.com".to_string());
        let second = EmailCode::new("alice@example.com".to_string());

        store.put("alice@example.com", &first).await.unwrap();
        store.put("alice@example.com", &second).await.unwrap();

        let fetched = store.get("alice@example.com").await.unwrap().unwrap();
        assert_eq!(fetched.code, second.code);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_delete_absent_is_ok() {
        let store: MemorySecretStore<EmailCode> = MemorySecretStore::new();
        assert!(!store.delete("nobody@example.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_reports_removal_exactly_once() {
        let store = MemorySecretStore::new();
        let code = EmailCode::new("alice@example.com".to_string());
        store.put("alice@example.com", &code).await.unwrap();

        assert!(store.delete("alice@example.com").await.unwrap());
        assert!(!store.delete("alice@example.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_increment_attempts() {
        let store = MemorySecretStore::new();
        let code = EmailCode::new("alice@example.com".to_string());
        store.put("alice@example.com", &code).await.unwrap();

        assert_eq!(store.increment_attempts("alice@example.com").await.unwrap(), 1);
        assert_eq!(store.increment_attempts("alice@example.com").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_increment_attempts_missing_record() {
        let store: MemorySecretStore<EmailCode> = MemorySecretStore::new();
        let result = store.increment_attempts("nobody@example.com").await;

        assert!(matches!(
            result,
            Err(VerificationError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_concurrent_increments_are_serialized() {
        let store = MemorySecretStore::new();
        let code = EmailCode::new("alice@example.com".to_string());
        store.put("alice@example.com", &code).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..10 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.increment_attempts("alice@example.com").await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let fetched = store.get("alice@example.com").await.unwrap().unwrap();
        assert_eq!(fetched.attempts, 10);
    }

    #[tokio::test]
    async fn test_scan_all() {
        let store = MemorySecretStore::new();
        store
            .put(
                "alice@example.com",
                &EmailCode::new("alice@example.com".to_string()),
            )
            .await
            .unwrap();
        store
            .put(
                "bob@example.com",
                &EmailCode::new("bob@example.com".to_string()),
            )
            .await
            .unwrap();

        let mut all = store.scan_all().await.unwrap();
        all.sort_by(|a, b| a.0.cmp(&b.0));
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].0, "alice@example.com");
        assert_eq!(all[1].0, "bob@example.com");
    }
}
