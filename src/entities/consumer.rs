use super::enums::ConsumerType;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "consumers")]
#[schema(as = Consumer)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub pangkalan_id: Uuid,
    pub name: String,
    /// National identity number
    pub nik: Option<String>,
    pub consumer_type: ConsumerType,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::pangkalan::Entity",
        from = "Column::PangkalanId",
        to = "super::pangkalan::Column::Id",
        on_delete = "Cascade"
    )]
    Pangkalan,
}

impl Related<super::pangkalan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Pangkalan.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
