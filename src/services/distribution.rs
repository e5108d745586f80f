//! Daily distribution records: actual (penyaluran) and planned (perencanaan).
//!
//! Both tables share one shape, so both services come out of
//! `distribution_service!`.

use crate::{
    db::DbPool,
    entities::{pangkalan, penyaluran_harian, perencanaan_harian, Kondisi, LpgType},
    errors::ServiceError,
    services::rekapitulasi::{self, DailyEntry, Month, Realisasi, Rekapitulasi},
};
use chrono::{NaiveDate, Utc};
use sea_orm::{
    sea_query::OnConflict, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpsertDistributionRequest {
    /// Required for admins; pangkalan users always write their own depot
    pub pangkalan_id: Option<Uuid>,
    pub tanggal: NaiveDate,
    #[serde(default)]
    pub lpg_type: LpgType,
    #[validate(range(min = 0))]
    pub jumlah: i32,
    #[serde(default)]
    pub kondisi: Kondisi,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct BulkUpsertRequest {
    #[validate(length(min = 1, max = 1000))]
    pub rows: Vec<UpsertDistributionRequest>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DistributionFilter {
    /// `YYYY-MM`; takes precedence over the date range
    pub month: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub pangkalan_id: Option<Uuid>,
    pub lpg_type: Option<LpgType>,
}

impl DistributionFilter {
    fn date_range(&self) -> Result<(Option<NaiveDate>, Option<NaiveDate>), ServiceError> {
        match self.month.as_deref() {
            Some(month) => {
                let month: Month = month.parse()?;
                Ok((Some(month.first_day()), Some(month.last_day())))
            }
            None => Ok((self.start_date, self.end_date)),
        }
    }
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RekapQuery {
    /// `YYYY-MM`
    pub month: String,
    pub pangkalan_id: Option<Uuid>,
    /// Defaults to `KG3`
    pub lpg_type: Option<LpgType>,
    pub region: Option<String>,
}

async fn ensure_pangkalan<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<(), ServiceError> {
    match pangkalan::Entity::find_by_id(id).one(conn).await? {
        Some(_) => Ok(()),
        None => Err(ServiceError::BadRequest(format!(
            "Pangkalan {id} does not exist"
        ))),
    }
}

async fn active_pangkalans<C: ConnectionTrait>(
    conn: &C,
    query: &RekapQuery,
) -> Result<Vec<pangkalan::Model>, ServiceError> {
    let mut select = pangkalan::Entity::find().filter(pangkalan::Column::IsActive.eq(true));
    if let Some(id) = query.pangkalan_id {
        select = select.filter(pangkalan::Column::Id.eq(id));
    }
    if let Some(region) = query.region.as_deref().filter(|r| !r.is_empty()) {
        select = select.filter(pangkalan::Column::Region.eq(region));
    }
    Ok(select
        .order_by_asc(pangkalan::Column::Code)
        .all(conn)
        .await?)
}

macro_rules! distribution_service {
    ($service:ident, $table:ident, $label:literal) => {
        #[derive(Clone)]
        pub struct $service {
            db_pool: Arc<DbPool>,
        }

        impl $service {
            pub fn new(db_pool: Arc<DbPool>) -> Self {
                Self { db_pool }
            }

            /// Inserts or replaces the row for (pangkalan, tanggal, lpg_type).
            async fn upsert_on<C: ConnectionTrait>(
                conn: &C,
                pangkalan_id: Uuid,
                request: &UpsertDistributionRequest,
            ) -> Result<$table::Model, ServiceError> {
                request.validate()?;
                ensure_pangkalan(conn, pangkalan_id).await?;

                let now = Utc::now();
                let row = $table::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    pangkalan_id: Set(pangkalan_id),
                    tanggal: Set(request.tanggal),
                    lpg_type: Set(request.lpg_type),
                    jumlah: Set(request.jumlah),
                    kondisi: Set(request.kondisi),
                    created_at: Set(now),
                    updated_at: Set(now),
                };
                $table::Entity::insert(row)
                    .on_conflict(
                        OnConflict::columns([
                            $table::Column::PangkalanId,
                            $table::Column::Tanggal,
                            $table::Column::LpgType,
                        ])
                        .update_columns([
                            $table::Column::Jumlah,
                            $table::Column::Kondisi,
                            $table::Column::UpdatedAt,
                        ])
                        .to_owned(),
                    )
                    .exec_without_returning(conn)
                    .await?;

                $table::Entity::find()
                    .filter($table::Column::PangkalanId.eq(pangkalan_id))
                    .filter($table::Column::Tanggal.eq(request.tanggal))
                    .filter($table::Column::LpgType.eq(request.lpg_type))
                    .one(conn)
                    .await?
                    .ok_or_else(|| {
                        ServiceError::InternalError(format!(
                            "{} row vanished after upsert",
                            $label
                        ))
                    })
            }

            #[instrument(skip(self, request), fields(pangkalan_id = %pangkalan_id, tanggal = %request.tanggal))]
            pub async fn upsert(
                &self,
                pangkalan_id: Uuid,
                request: UpsertDistributionRequest,
            ) -> Result<$table::Model, ServiceError> {
                let row = Self::upsert_on(&*self.db_pool, pangkalan_id, &request).await?;
                info!(id = %row.id, jumlah = row.jumlah, "{} row saved", $label);
                Ok(row)
            }

            /// All rows are written in one transaction; one bad row rejects the batch.
            /// Each entry carries the pangkalan already resolved for the caller.
            #[instrument(skip(self, rows), fields(count = rows.len()))]
            pub async fn bulk_upsert(
                &self,
                rows: Vec<(Uuid, UpsertDistributionRequest)>,
            ) -> Result<Vec<$table::Model>, ServiceError> {
                let txn = self.db_pool.begin().await?;
                let mut saved = Vec::with_capacity(rows.len());
                for (pangkalan_id, request) in &rows {
                    saved.push(Self::upsert_on(&txn, *pangkalan_id, request).await?);
                }
                txn.commit().await?;
                info!(count = saved.len(), "{} rows saved in bulk", $label);
                Ok(saved)
            }

            #[instrument(skip(self))]
            pub async fn list(
                &self,
                filter: &DistributionFilter,
                page: u64,
                per_page: u64,
            ) -> Result<(Vec<$table::Model>, u64), ServiceError> {
                let (start, end) = filter.date_range()?;
                let mut query = $table::Entity::find();
                if let Some(start) = start {
                    query = query.filter($table::Column::Tanggal.gte(start));
                }
                if let Some(end) = end {
                    query = query.filter($table::Column::Tanggal.lte(end));
                }
                if let Some(pangkalan_id) = filter.pangkalan_id {
                    query = query.filter($table::Column::PangkalanId.eq(pangkalan_id));
                }
                if let Some(lpg_type) = filter.lpg_type {
                    query = query.filter($table::Column::LpgType.eq(lpg_type));
                }

                let paginator = query
                    .order_by_asc($table::Column::Tanggal)
                    .order_by_asc($table::Column::PangkalanId)
                    .paginate(&*self.db_pool, per_page);
                let total = paginator.num_items().await?;
                let rows = paginator.fetch_page(page.saturating_sub(1)).await?;
                Ok((rows, total))
            }

            #[instrument(skip(self))]
            pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
                let result = $table::Entity::delete_by_id(id)
                    .exec(&*self.db_pool)
                    .await?;
                if result.rows_affected == 0 {
                    return Err(ServiceError::not_found($label, id));
                }
                info!(id = %id, "{} row deleted", $label);
                Ok(())
            }

            /// Rows of one month and cylinder size for the given pangkalans.
            pub(crate) async fn entries<C: ConnectionTrait>(
                conn: &C,
                month: Month,
                lpg_type: LpgType,
                pangkalan_ids: &[Uuid],
            ) -> Result<Vec<DailyEntry>, ServiceError> {
                if pangkalan_ids.is_empty() {
                    return Ok(Vec::new());
                }
                let rows = $table::Entity::find()
                    .filter($table::Column::Tanggal.gte(month.first_day()))
                    .filter($table::Column::Tanggal.lte(month.last_day()))
                    .filter($table::Column::LpgType.eq(lpg_type))
                    .filter($table::Column::PangkalanId.is_in(pangkalan_ids.iter().copied()))
                    .all(conn)
                    .await?;
                Ok(rows
                    .into_iter()
                    .map(|row| DailyEntry {
                        pangkalan_id: row.pangkalan_id,
                        tanggal: row.tanggal,
                        jumlah: row.jumlah,
                        kondisi: row.kondisi,
                    })
                    .collect())
            }

            #[instrument(skip(self))]
            pub async fn rekapitulasi(
                &self,
                query: &RekapQuery,
            ) -> Result<Rekapitulasi, ServiceError> {
                let month: Month = query.month.parse()?;
                let lpg_type = query.lpg_type.unwrap_or_default();
                let pangkalans = active_pangkalans(&*self.db_pool, query).await?;
                let ids: Vec<Uuid> = pangkalans.iter().map(|p| p.id).collect();
                let entries = Self::entries(&*self.db_pool, month, lpg_type, &ids).await?;
                Ok(rekapitulasi::build(month, lpg_type, &pangkalans, &entries))
            }
        }
    };
}

distribution_service!(PenyaluranService, penyaluran_harian, "Penyaluran");
distribution_service!(PerencanaanService, perencanaan_harian, "Perencanaan");

impl PerencanaanService {
    /// Planned totals of the month next to what was actually distributed.
    #[instrument(skip(self))]
    pub async fn realisasi(&self, query: &RekapQuery) -> Result<Realisasi, ServiceError> {
        let month: Month = query.month.parse()?;
        let lpg_type = query.lpg_type.unwrap_or_default();
        let pangkalans = active_pangkalans(&*self.db_pool, query).await?;
        let ids: Vec<Uuid> = pangkalans.iter().map(|p| p.id).collect();

        let planned = Self::entries(&*self.db_pool, month, lpg_type, &ids).await?;
        let actual = PenyaluranService::entries(&*self.db_pool, month, lpg_type, &ids).await?;

        Ok(rekapitulasi::compare(
            &rekapitulasi::build(month, lpg_type, &pangkalans, &planned),
            &rekapitulasi::build(month, lpg_type, &pangkalans, &actual),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn month_filter_overrides_date_range() {
        let filter = DistributionFilter {
            month: Some("2024-02".to_string()),
            start_date: NaiveDate::from_ymd_opt(2023, 1, 1),
            ..Default::default()
        };
        let (start, end) = filter.date_range().unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 2, 1));
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 2, 29));
    }

    #[test]
    fn invalid_month_filter_is_bad_request() {
        let filter = DistributionFilter {
            month: Some("Feb 2024".to_string()),
            ..Default::default()
        };
        assert_matches!(filter.date_range(), Err(ServiceError::BadRequest(_)));
    }

    #[test]
    fn negative_jumlah_fails_validation() {
        let request = UpsertDistributionRequest {
            pangkalan_id: None,
            tanggal: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            lpg_type: LpgType::Kg3,
            jumlah: -1,
            kondisi: Kondisi::Normal,
        };
        assert!(request.validate().is_err());
    }
}
