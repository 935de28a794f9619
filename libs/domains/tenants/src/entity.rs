use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::{TenantId, TenantProfile};

/// Sea-ORM Entity for the profiles table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub username: String,
    pub display_name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub bio: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for TenantProfile {
    fn from(model: Model) -> Self {
        Self {
            id: TenantId::new(model.id),
            handle: model.username,
            display_name: model.display_name,
            bio: model.bio,
        }
    }
}
