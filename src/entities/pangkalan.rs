use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "pangkalans")]
#[schema(as = Pangkalan)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub code: String,
    pub name: String,
    pub address: String,
    pub region: String,
    pub pic_name: Option<String>,
    pub phone: Option<String>,
    /// Monthly quota in tabung
    pub alokasi_bulanan: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::order::Entity")]
    Orders,
    #[sea_orm(has_many = "super::consumer::Entity")]
    Consumers,
    #[sea_orm(has_many = "super::penyaluran_harian::Entity")]
    PenyaluranHarian,
    #[sea_orm(has_many = "super::perencanaan_harian::Entity")]
    PerencanaanHarian,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl Related<super::consumer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Consumers.def()
    }
}

impl Related<super::penyaluran_harian::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PenyaluranHarian.def()
    }
}

impl Related<super::perencanaan_harian::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PerencanaanHarian.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
