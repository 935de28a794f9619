use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use crate::{
    entity,
    error::{TenantError, TenantResult},
    models::{TenantId, TenantProfile},
    repository::TenantRepository,
};

/// Reads tenants from the `profiles` table
pub struct PgTenantRepository {
    db: DatabaseConnection,
}

impl PgTenantRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TenantRepository for PgTenantRepository {
    async fn get_by_id(&self, id: TenantId) -> TenantResult<Option<TenantProfile>> {
        let model = entity::Entity::find_by_id(id.as_uuid())
            .one(&self.db)
            .await
            .map_err(|e| TenantError::Internal(format!("Database error: {}", e)))?;

        Ok(model.map(Into::into))
    }

    async fn get_by_handle(&self, handle: &str) -> TenantResult<Option<TenantProfile>> {
        let model = entity::Entity::find()
            .filter(entity::Column::Username.eq(handle))
            .one(&self.db)
            .await
            .map_err(|e| TenantError::Internal(format!("Database error: {}", e)))?;

        Ok(model.map(Into::into))
    }
}
