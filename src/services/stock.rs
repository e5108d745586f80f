use crate::{
    db::DbPool,
    entities::{
        lpg_product::{self, Entity as ProductEntity},
        stock_history::{self, Entity as StockHistoryEntity},
        ActivityType, LpgType, MovementType,
    },
    errors::ServiceError,
    services::activity::{self, ActivityEntry},
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Select, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RecordMovementRequest {
    pub product_id: Uuid,
    pub movement_type: MovementType,
    #[validate(range(min = 1))]
    pub quantity: i32,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MovementFilter {
    pub product_id: Option<Uuid>,
    pub movement_type: Option<MovementType>,
    /// Inclusive, `YYYY-MM-DD`
    pub start_date: Option<NaiveDate>,
    /// Inclusive, `YYYY-MM-DD`
    pub end_date: Option<NaiveDate>,
}

/// Current stock of one product
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StockLevel {
    pub product_id: Uuid,
    pub name: String,
    pub lpg_type: LpgType,
    pub is_active: bool,
    pub total_in: i64,
    pub total_out: i64,
    pub current: i64,
}

/// Start of `date` in UTC.
pub(crate) fn day_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Start of the day after `date` in UTC, for half-open ranges.
pub(crate) fn day_end_exclusive(date: NaiveDate) -> DateTime<Utc> {
    day_start(date.succ_opt().unwrap_or(date))
}

/// Product row locked for the rest of the transaction. OUT movements of one
/// product serialize on it so the balance check stays valid until commit.
fn product_for_update(product_id: Uuid) -> Select<ProductEntity> {
    ProductEntity::find_by_id(product_id).lock_exclusive()
}

/// Net stock (IN minus OUT) per product.
pub(crate) async fn net_by_product<C: ConnectionTrait>(
    conn: &C,
    product_id: Option<Uuid>,
) -> Result<HashMap<Uuid, (i64, i64)>, ServiceError> {
    let mut query = StockHistoryEntity::find();
    if let Some(id) = product_id {
        query = query.filter(stock_history::Column::ProductId.eq(id));
    }
    let rows = query.all(conn).await?;

    let mut totals: HashMap<Uuid, (i64, i64)> = HashMap::new();
    for row in rows {
        let entry = totals.entry(row.product_id).or_default();
        match row.movement_type {
            MovementType::In => entry.0 += i64::from(row.quantity),
            MovementType::Out => entry.1 += i64::from(row.quantity),
        }
    }
    Ok(totals)
}

/// Writes one movement on `conn`. OUT movements may not take stock below zero.
pub(crate) async fn apply_movement<C: ConnectionTrait>(
    conn: &C,
    product: &lpg_product::Model,
    movement_type: MovementType,
    quantity: i32,
    note: Option<String>,
    order_id: Option<Uuid>,
    created_by: Option<Uuid>,
) -> Result<stock_history::Model, ServiceError> {
    if quantity < 1 {
        return Err(ServiceError::ValidationError(
            "quantity must be at least 1".to_string(),
        ));
    }

    if movement_type == MovementType::Out {
        product_for_update(product.id)
            .one(conn)
            .await?
            .ok_or_else(|| ServiceError::not_found("LPG product", product.id))?;
        let (total_in, total_out) = net_by_product(conn, Some(product.id))
            .await?
            .remove(&product.id)
            .unwrap_or_default();
        let current = total_in - total_out;
        if i64::from(quantity) > current {
            warn!(product_id = %product.id, current, requested = quantity, "stock out rejected");
            return Err(ServiceError::InsufficientStock(format!(
                "{} has {} tabung in stock, {} requested",
                product.lpg_type, current, quantity
            )));
        }
    }

    let row = stock_history::ActiveModel {
        id: Set(Uuid::new_v4()),
        product_id: Set(product.id),
        movement_type: Set(movement_type),
        quantity: Set(quantity),
        note: Set(note),
        order_id: Set(order_id),
        created_by: Set(created_by),
        created_at: Set(Utc::now()),
    }
    .insert(conn)
    .await?;

    let (activity_type, verb) = match movement_type {
        MovementType::In => (ActivityType::StockIn, "masuk"),
        MovementType::Out => (ActivityType::StockOut, "keluar"),
    };
    let mut entry = ActivityEntry::new(
        activity_type,
        format!("Stok {} {}", product.lpg_type, verb),
        format!("{} tabung {} {}", quantity, product.lpg_type, verb),
    )
    .by(created_by);
    if let Some(order_id) = order_id {
        entry = entry.order(order_id);
    }
    activity::record(conn, entry).await?;

    Ok(row)
}

#[derive(Clone)]
pub struct StockService {
    db_pool: Arc<DbPool>,
}

impl StockService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self, request), fields(product_id = %request.product_id, movement = %request.movement_type, quantity = request.quantity))]
    pub async fn record_movement(
        &self,
        request: RecordMovementRequest,
        created_by: Option<Uuid>,
    ) -> Result<stock_history::Model, ServiceError> {
        request.validate()?;

        let txn = self.db_pool.begin().await?;
        let product = ProductEntity::find_by_id(request.product_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("LPG product", request.product_id))?;

        let row = apply_movement(
            &txn,
            &product,
            request.movement_type,
            request.quantity,
            request.note,
            None,
            created_by,
        )
        .await?;
        txn.commit().await?;

        info!(movement_id = %row.id, "Stock movement recorded");
        Ok(row)
    }

    #[instrument(skip(self))]
    pub async fn list_movements(
        &self,
        filter: &MovementFilter,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<stock_history::Model>, u64), ServiceError> {
        let mut query = StockHistoryEntity::find();
        if let Some(product_id) = filter.product_id {
            query = query.filter(stock_history::Column::ProductId.eq(product_id));
        }
        if let Some(movement_type) = filter.movement_type {
            query = query.filter(stock_history::Column::MovementType.eq(movement_type));
        }
        if let Some(start) = filter.start_date {
            query = query.filter(stock_history::Column::CreatedAt.gte(day_start(start)));
        }
        if let Some(end) = filter.end_date {
            query = query.filter(stock_history::Column::CreatedAt.lt(day_end_exclusive(end)));
        }

        let paginator = query
            .order_by_desc(stock_history::Column::CreatedAt)
            .paginate(&*self.db_pool, per_page);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }

    /// In, out and current stock for every product.
    #[instrument(skip(self))]
    pub async fn stock_levels(&self) -> Result<Vec<StockLevel>, ServiceError> {
        let products = ProductEntity::find()
            .order_by_asc(lpg_product::Column::LpgType)
            .all(&*self.db_pool)
            .await?;
        let totals = net_by_product(&*self.db_pool, None).await?;

        Ok(products
            .into_iter()
            .map(|product| {
                let (total_in, total_out) = totals.get(&product.id).copied().unwrap_or_default();
                StockLevel {
                    product_id: product.id,
                    name: product.name,
                    lpg_type: product.lpg_type,
                    is_active: product.is_active,
                    total_in,
                    total_out,
                    current: total_in - total_out,
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_out_locks_the_product_row() {
        use sea_orm::{DbBackend, QueryTrait};

        let sql = product_for_update(Uuid::new_v4())
            .build(DbBackend::Postgres)
            .to_string();
        assert!(sql.contains(" FOR UPDATE"), "{sql}");
    }

    #[test]
    fn day_bounds_are_half_open() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(day_start(date).to_rfc3339(), "2024-02-29T00:00:00+00:00");
        assert_eq!(
            day_end_exclusive(date).to_rfc3339(),
            "2024-03-01T00:00:00+00:00"
        );
    }
}
