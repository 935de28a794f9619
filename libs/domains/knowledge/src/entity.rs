use domain_tenants::TenantId;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::{EntryId, KnowledgeEntry};

/// Sea-ORM Entity for the faqs table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "faqs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Owning tenant (`profiles.id`)
    pub user_id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub question: String,
    #[sea_orm(column_type = "Text")]
    pub answer: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for KnowledgeEntry {
    fn from(model: Model) -> Self {
        Self {
            id: EntryId::new(model.id),
            tenant_id: TenantId::new(model.user_id),
            question: model.question,
            answer: model.answer,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.map(Into::into),
        }
    }
}
