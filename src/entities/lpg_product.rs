use super::enums::LpgType;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Price list entry, one per cylinder size
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "lpg_products")]
#[schema(as = LpgProduct)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub lpg_type: LpgType,
    pub selling_price: Decimal,
    pub cost_price: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::stock_history::Entity")]
    StockHistories,
}

impl Related<super::stock_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StockHistories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
