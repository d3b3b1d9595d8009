use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tally_core::models::Receipt;
use tokio::sync::RwLock;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Receipt {0} already exists")]
    AlreadyExists(String),
}

/// Storage for finalized receipts. Records are never updated or deleted.
#[async_trait]
pub trait ReceiptRepository: Send + Sync {
    async fn insert(&self, receipt: Receipt) -> Result<(), RepositoryError>;

    async fn get_by_id(&self, id: &str) -> Result<Option<Receipt>, RepositoryError>;

    /// All receipts in insertion order.
    async fn list_all(&self) -> Result<Vec<Receipt>, RepositoryError>;
}

#[derive(Default)]
struct Inner {
    by_id: HashMap<String, Receipt>,
    order: Vec<String>,
}

/// Process-local receipt repository
#[derive(Clone, Default)]
pub struct InMemoryReceiptRepository {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryReceiptRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.order.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl ReceiptRepository for InMemoryReceiptRepository {
    #[tracing::instrument(skip(self, receipt), fields(receipt_id = %receipt.id))]
    async fn insert(&self, receipt: Receipt) -> Result<(), RepositoryError> {
        let mut inner = self.inner.write().await;
        if inner.by_id.contains_key(&receipt.id) {
            return Err(RepositoryError::AlreadyExists(receipt.id));
        }

        inner.order.push(receipt.id.clone());
        inner.by_id.insert(receipt.id.clone(), receipt);
        tracing::debug!(total = inner.order.len(), "Receipt stored");
        Ok(())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Receipt>, RepositoryError> {
        Ok(self.inner.read().await.by_id.get(id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Receipt>, RepositoryError> {
        let inner = self.inner.read().await;
        Ok(inner
            .order
            .iter()
            .filter_map(|id| inner.by_id.get(id).cloned())
            .collect())
    }
}
