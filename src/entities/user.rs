use super::enums::UserRole;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "users")]
#[schema(as = User)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub password_hash: String,
    pub name: String,
    pub role: UserRole,
    pub pangkalan_id: Option<Uuid>,
    pub is_active: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::pangkalan::Entity",
        from = "Column::PangkalanId",
        to = "super::pangkalan::Column::Id"
    )]
    Pangkalan,
}

impl Related<super::pangkalan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Pangkalan.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
