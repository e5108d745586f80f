use super::enums::{Kondisi, LpgType};
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Planned distribution to a pangkalan on one day
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "perencanaan_harian")]
#[schema(as = PerencanaanHarian)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub pangkalan_id: Uuid,
    pub tanggal: NaiveDate,
    pub lpg_type: LpgType,
    pub jumlah: i32,
    pub kondisi: Kondisi,
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
