use async_trait::async_trait;
use domain_tenants::TenantId;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::KnowledgeResult;
use crate::models::{EntryId, KnowledgeEntry};

/// Read side of the relational knowledge store
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KnowledgeStore: Send + Sync {
    /// Entries among `ids` owned by `tenant_id`, in no particular order.
    /// Ids belonging to other tenants are silently dropped.
    async fn get_by_ids(
        &self,
        ids: &[EntryId],
        tenant_id: TenantId,
    ) -> KnowledgeResult<Vec<KnowledgeEntry>>;

    /// The tenant's newest entries, newest first, at most `limit`
    async fn get_recent(
        &self,
        tenant_id: TenantId,
        limit: usize,
    ) -> KnowledgeResult<Vec<KnowledgeEntry>>;
}

/// In-memory implementation of KnowledgeStore (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryKnowledgeStore {
    entries: Arc<RwLock<HashMap<EntryId, KnowledgeEntry>>>,
}

impl InMemoryKnowledgeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces an entry
    pub async fn insert(&self, entry: KnowledgeEntry) {
        self.entries.write().await.insert(entry.id, entry);
    }

    pub async fn remove(&self, id: EntryId) -> bool {
        self.entries.write().await.remove(&id).is_some()
    }
}

#[async_trait]
impl KnowledgeStore for InMemoryKnowledgeStore {
    async fn get_by_ids(
        &self,
        ids: &[EntryId],
        tenant_id: TenantId,
    ) -> KnowledgeResult<Vec<KnowledgeEntry>> {
        let entries = self.entries.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| entries.get(id))
            .filter(|e| e.tenant_id == tenant_id)
            .cloned()
            .collect())
    }

    async fn get_recent(
        &self,
        tenant_id: TenantId,
        limit: usize,
    ) -> KnowledgeResult<Vec<KnowledgeEntry>> {
        let entries = self.entries.read().await;
        let mut owned: Vec<KnowledgeEntry> = entries
            .values()
            .filter(|e| e.tenant_id == tenant_id)
            .cloned()
            .collect();

        owned.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        owned.truncate(limit);

        Ok(owned)
    }
}
