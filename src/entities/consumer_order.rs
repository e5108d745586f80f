use super::enums::LpgType;
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A sale from a pangkalan to an end consumer
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "consumer_orders")]
#[schema(as = ConsumerOrder)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub pangkalan_id: Uuid,
    pub consumer_id: Option<Uuid>,
    pub lpg_type: LpgType,
    pub quantity: i32,
    pub price_per_unit: Decimal,
    pub total_amount: Decimal,
    pub sale_date: NaiveDate,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
