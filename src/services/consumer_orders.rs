use crate::{
    db::DbPool,
    entities::{
        consumer,
        consumer_order::{self, Entity as ConsumerOrderEntity},
        pangkalan, LpgType,
    },
    errors::ServiceError,
    services::{
        lpg_products,
        money::{line_total, validate_price},
    },
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Select,
    Set,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateConsumerOrderRequest {
    /// Required for admins; pangkalan users always record for their own depot
    pub pangkalan_id: Option<Uuid>,
    pub consumer_id: Option<Uuid>,
    #[serde(default)]
    pub lpg_type: LpgType,
    #[validate(range(min = 1))]
    pub quantity: i32,
    /// Defaults to the product's selling price
    #[validate(custom = "validate_price")]
    pub price_per_unit: Option<Decimal>,
    /// Defaults to today
    pub sale_date: Option<NaiveDate>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateConsumerOrderRequest {
    pub consumer_id: Option<Uuid>,
    pub lpg_type: Option<LpgType>,
    #[validate(range(min = 1))]
    pub quantity: Option<i32>,
    #[validate(custom = "validate_price")]
    pub price_per_unit: Option<Decimal>,
    pub sale_date: Option<NaiveDate>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ConsumerOrderFilter {
    pub pangkalan_id: Option<Uuid>,
    pub consumer_id: Option<Uuid>,
    pub lpg_type: Option<LpgType>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl ConsumerOrderFilter {
    fn apply(&self, mut query: Select<ConsumerOrderEntity>) -> Select<ConsumerOrderEntity> {
        if let Some(pangkalan_id) = self.pangkalan_id {
            query = query.filter(consumer_order::Column::PangkalanId.eq(pangkalan_id));
        }
        if let Some(consumer_id) = self.consumer_id {
            query = query.filter(consumer_order::Column::ConsumerId.eq(consumer_id));
        }
        if let Some(lpg_type) = self.lpg_type {
            query = query.filter(consumer_order::Column::LpgType.eq(lpg_type));
        }
        if let Some(start) = self.start_date {
            query = query.filter(consumer_order::Column::SaleDate.gte(start));
        }
        if let Some(end) = self.end_date {
            query = query.filter(consumer_order::Column::SaleDate.lte(end));
        }
        query
    }
}

/// Sales of one cylinder size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ConsumerSalesLine {
    pub lpg_type: LpgType,
    pub transactions: u64,
    pub total_tabung: i64,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConsumerSalesSummary {
    pub lines: Vec<ConsumerSalesLine>,
    pub total_tabung: i64,
    pub total_revenue: Decimal,
}

/// Groups sales by cylinder size, in `LpgType` order.
pub fn summarize(rows: &[consumer_order::Model]) -> ConsumerSalesSummary {
    let mut by_type: BTreeMap<LpgType, ConsumerSalesLine> = BTreeMap::new();
    for row in rows {
        let line = by_type.entry(row.lpg_type).or_insert(ConsumerSalesLine {
            lpg_type: row.lpg_type,
            transactions: 0,
            total_tabung: 0,
            revenue: Decimal::ZERO,
        });
        line.transactions += 1;
        line.total_tabung += i64::from(row.quantity);
        line.revenue += row.total_amount;
    }

    let lines: Vec<_> = by_type.into_values().collect();
    ConsumerSalesSummary {
        total_tabung: lines.iter().map(|l| l.total_tabung).sum(),
        total_revenue: lines.iter().map(|l| l.revenue).sum(),
        lines,
    }
}

#[derive(Clone)]
pub struct ConsumerOrderService {
    db_pool: Arc<DbPool>,
}

impl ConsumerOrderService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// A consumer, when given, must be registered at the same pangkalan.
    async fn check_consumer(
        &self,
        pangkalan_id: Uuid,
        consumer_id: Option<Uuid>,
    ) -> Result<(), ServiceError> {
        let Some(consumer_id) = consumer_id else {
            return Ok(());
        };
        let found = consumer::Entity::find_by_id(consumer_id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| {
                ServiceError::BadRequest(format!("Consumer {consumer_id} does not exist"))
            })?;
        if found.pangkalan_id != pangkalan_id {
            return Err(ServiceError::BadRequest(format!(
                "Consumer {consumer_id} belongs to another pangkalan"
            )));
        }
        Ok(())
    }

    async fn resolve_price(
        &self,
        lpg_type: LpgType,
        price: Option<Decimal>,
    ) -> Result<Decimal, ServiceError> {
        match price {
            Some(p) => Ok(p),
            None => lpg_products::price_for(&*self.db_pool, lpg_type).await,
        }
    }

    #[instrument(skip(self, request), fields(pangkalan_id = %pangkalan_id, lpg_type = %request.lpg_type))]
    pub async fn create(
        &self,
        pangkalan_id: Uuid,
        request: CreateConsumerOrderRequest,
    ) -> Result<consumer_order::Model, ServiceError> {
        request.validate()?;
        if pangkalan::Entity::find_by_id(pangkalan_id)
            .one(&*self.db_pool)
            .await?
            .is_none()
        {
            return Err(ServiceError::BadRequest(format!(
                "Pangkalan {pangkalan_id} does not exist"
            )));
        }
        self.check_consumer(pangkalan_id, request.consumer_id)
            .await?;

        let price = self
            .resolve_price(request.lpg_type, request.price_per_unit)
            .await?;
        let total_amount = line_total(price, request.quantity)?;
        let now = Utc::now();

        let model = consumer_order::ActiveModel {
            id: Set(Uuid::new_v4()),
            pangkalan_id: Set(pangkalan_id),
            consumer_id: Set(request.consumer_id),
            lpg_type: Set(request.lpg_type),
            quantity: Set(request.quantity),
            price_per_unit: Set(price),
            total_amount: Set(total_amount),
            sale_date: Set(request.sale_date.unwrap_or_else(|| now.date_naive())),
            note: Set(request.note),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&*self.db_pool)
        .await?;

        info!(consumer_order_id = %model.id, total = %model.total_amount, "Consumer sale recorded");
        Ok(model)
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        filter: &ConsumerOrderFilter,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<consumer_order::Model>, u64), ServiceError> {
        let paginator = filter
            .apply(ConsumerOrderEntity::find())
            .order_by_desc(consumer_order::Column::SaleDate)
            .order_by_desc(consumer_order::Column::CreatedAt)
            .paginate(&*self.db_pool, per_page);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<consumer_order::Model, ServiceError> {
        ConsumerOrderEntity::find_by_id(id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::not_found("Consumer order", id))
    }

    /// Recomputes the total whenever quantity or price changes.
    #[instrument(skip(self, existing, request), fields(consumer_order_id = %existing.id))]
    pub async fn update(
        &self,
        existing: consumer_order::Model,
        request: UpdateConsumerOrderRequest,
    ) -> Result<consumer_order::Model, ServiceError> {
        request.validate()?;
        if request.consumer_id.is_some() {
            self.check_consumer(existing.pangkalan_id, request.consumer_id)
                .await?;
        }

        let lpg_type = request.lpg_type.unwrap_or(existing.lpg_type);
        let quantity = request.quantity.unwrap_or(existing.quantity);
        let price = match (request.price_per_unit, request.lpg_type) {
            (Some(p), _) => self.resolve_price(lpg_type, Some(p)).await?,
            (None, Some(t)) if t != existing.lpg_type => self.resolve_price(t, None).await?,
            _ => existing.price_per_unit,
        };

        let total_amount = line_total(price, quantity)?;

        let id = existing.id;
        let mut active: consumer_order::ActiveModel = existing.into();
        if request.consumer_id.is_some() {
            active.consumer_id = Set(request.consumer_id);
        }
        active.lpg_type = Set(lpg_type);
        active.quantity = Set(quantity);
        active.price_per_unit = Set(price);
        active.total_amount = Set(total_amount);
        if let Some(sale_date) = request.sale_date {
            active.sale_date = Set(sale_date);
        }
        if request.note.is_some() {
            active.note = Set(request.note);
        }
        active.updated_at = Set(Utc::now());

        let updated = active.update(&*self.db_pool).await?;
        info!(consumer_order_id = %id, "Consumer sale updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let result = ConsumerOrderEntity::delete_by_id(id)
            .exec(&*self.db_pool)
            .await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("Consumer order", id));
        }
        info!(consumer_order_id = %id, "Consumer sale deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn summary(
        &self,
        filter: &ConsumerOrderFilter,
    ) -> Result<ConsumerSalesSummary, ServiceError> {
        let rows = filter
            .apply(ConsumerOrderEntity::find())
            .all(&*self.db_pool)
            .await?;
        Ok(summarize(&rows))
    }
}
