use async_trait::async_trait;
use domain_tenants::TenantId;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect};

use crate::{
    entity,
    error::{KnowledgeError, KnowledgeResult},
    models::{EntryId, KnowledgeEntry},
    store::KnowledgeStore,
};

/// Reads knowledge entries from the `faqs` table
pub struct PgKnowledgeStore {
    db: DatabaseConnection,
}

impl PgKnowledgeStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl KnowledgeStore for PgKnowledgeStore {
    async fn get_by_ids(
        &self,
        ids: &[EntryId],
        tenant_id: TenantId,
    ) -> KnowledgeResult<Vec<KnowledgeEntry>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let models = entity::Entity::find()
            .filter(entity::Column::Id.is_in(ids.iter().map(EntryId::as_uuid)))
            .filter(entity::Column::UserId.eq(tenant_id.as_uuid()))
            .all(&self.db)
            .await
            .map_err(|e| KnowledgeError::Store(format!("Database error: {}", e)))?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn get_recent(
        &self,
        tenant_id: TenantId,
        limit: usize,
    ) -> KnowledgeResult<Vec<KnowledgeEntry>> {
        let models = entity::Entity::find()
            .filter(entity::Column::UserId.eq(tenant_id.as_uuid()))
            .order_by_desc(entity::Column::CreatedAt)
            .order_by_desc(entity::Column::Id)
            .limit(limit as u64)
            .all(&self.db)
            .await
            .map_err(|e| KnowledgeError::Store(format!("Database error: {}", e)))?;

        Ok(models.into_iter().map(Into::into).collect())
    }
}
