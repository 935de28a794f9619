use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::TenantResult;
use crate::models::{TenantId, TenantProfile};

/// Read-only access to tenant profiles
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TenantRepository: Send + Sync {
    async fn get_by_id(&self, id: TenantId) -> TenantResult<Option<TenantProfile>>;

    /// Exact match on the unique handle
    async fn get_by_handle(&self, handle: &str) -> TenantResult<Option<TenantProfile>>;
}

/// In-memory implementation of TenantRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryTenantRepository {
    tenants: Arc<RwLock<HashMap<TenantId, TenantProfile>>>,
}

impl InMemoryTenantRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a profile
    pub async fn insert(&self, profile: TenantProfile) {
        self.tenants.write().await.insert(profile.id, profile);
    }
}

#[async_trait]
impl TenantRepository for InMemoryTenantRepository {
    async fn get_by_id(&self, id: TenantId) -> TenantResult<Option<TenantProfile>> {
        Ok(self.tenants.read().await.get(&id).cloned())
    }

    async fn get_by_handle(&self, handle: &str) -> TenantResult<Option<TenantProfile>> {
        let tenants = self.tenants.read().await;
        Ok(tenants.values().find(|t| t.handle == handle).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_lookup_by_id_and_handle() {
        let repo = InMemoryTenantRepository::new();
        let alice = TenantProfile::new(TenantId::new(Uuid::new_v4()), "alice", "Alice");
        repo.insert(alice.clone()).await;

        assert_eq!(repo.get_by_id(alice.id).await.unwrap(), Some(alice.clone()));
        assert_eq!(repo.get_by_handle("alice").await.unwrap(), Some(alice));
        assert_eq!(repo.get_by_handle("Alice").await.unwrap(), None);
        assert_eq!(
            repo.get_by_id(TenantId::new(Uuid::new_v4())).await.unwrap(),
            None
        );
    }
}
