use crate::{
    db::DbPool,
    entities::{
        invoice,
        order::{self, ActiveModel as OrderActiveModel, Entity as OrderEntity},
        order_item::{self, Entity as OrderItemEntity},
        pangkalan, payment_record, ActivityType, LpgType, MovementType, OrderStatus,
        PaymentStatus,
    },
    errors::ServiceError,
    services::{
        activity::{self, ActivityEntry},
        lpg_products,
        money::{checked_sum, line_total, validate_price},
        stock,
    },
};
use chrono::{DateTime, NaiveDate, Utc};
use rand::{distributions::Alphanumeric, Rng};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateOrderItem {
    pub lpg_type: LpgType,
    #[validate(range(min = 1))]
    pub quantity: i32,
    /// Defaults to the product's selling price
    #[validate(custom = "validate_price")]
    pub unit_price: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateOrderRequest {
    /// Required for admins; pangkalan users always order for their own depot
    pub pangkalan_id: Option<Uuid>,
    #[validate(length(min = 1, message = "An order needs at least one item"))]
    pub items: Vec<CreateOrderItem>,
    pub notes: Option<String>,
    pub order_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateOrderRequest {
    pub notes: Option<String>,
    pub order_date: Option<DateTime<Utc>>,
    pub status: Option<OrderStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub pangkalan_id: Option<Uuid>,
    /// Inclusive, `YYYY-MM-DD`
    pub start_date: Option<NaiveDate>,
    /// Inclusive, `YYYY-MM-DD`
    pub end_date: Option<NaiveDate>,
}

/// Order with its line items and payment balance
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderDetail {
    pub order: order::Model,
    pub items: Vec<order_item::Model>,
    pub payment: Option<payment_record::Model>,
}

/// `ORD-YYYYMMDD-XXXXXX`
pub fn generate_order_number(date: DateTime<Utc>) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(|c| char::from(c).to_ascii_uppercase())
        .collect();
    format!("ORD-{}-{}", date.format("%Y%m%d"), suffix)
}

#[derive(Clone)]
pub struct OrderService {
    db_pool: Arc<DbPool>,
}

impl OrderService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Creates the order, its items and an UNPAID payment record in one transaction.
    #[instrument(skip(self, request), fields(pangkalan_id = %pangkalan_id, items = request.items.len()))]
    pub async fn create(
        &self,
        pangkalan_id: Uuid,
        request: CreateOrderRequest,
        created_by: Option<Uuid>,
    ) -> Result<OrderDetail, ServiceError> {
        request.validate()?;
        for item in &request.items {
            item.validate()?;
        }

        let txn = self.db_pool.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start transaction for order creation");
            ServiceError::from(e)
        })?;

        let depot = pangkalan::Entity::find_by_id(pangkalan_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::BadRequest(format!("Pangkalan {pangkalan_id} does not exist"))
            })?;

        let now = Utc::now();
        let order_id = Uuid::new_v4();
        let order_date = request.order_date.unwrap_or(now);

        let mut lines = Vec::with_capacity(request.items.len());
        let mut total_amount = Decimal::ZERO;
        for item in &request.items {
            let unit_price = match item.unit_price {
                Some(price) => price,
                None => lpg_products::price_for(&txn, item.lpg_type).await?,
            };
            let subtotal = line_total(unit_price, item.quantity)?;
            total_amount = checked_sum(total_amount, subtotal, "Order total")?;
            lines.push((item.lpg_type, item.quantity, unit_price, subtotal));
        }

        let order = OrderActiveModel {
            id: Set(order_id),
            order_number: Set(generate_order_number(now)),
            pangkalan_id: Set(pangkalan_id),
            status: Set(OrderStatus::Pending),
            order_date: Set(order_date),
            total_amount: Set(total_amount),
            notes: Set(request.notes),
            created_by: Set(created_by),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to create order in database");
            ServiceError::from(e)
        })?;

        let mut items = Vec::with_capacity(lines.len());
        for (lpg_type, quantity, unit_price, subtotal) in lines {
            let item = order_item::ActiveModel {
                id: Set(Uuid::new_v4()),
                order_id: Set(order_id),
                lpg_type: Set(lpg_type),
                quantity: Set(quantity),
                unit_price: Set(unit_price),
                subtotal: Set(subtotal),
                created_at: Set(now),
            }
            .insert(&txn)
            .await?;
            items.push(item);
        }

        let payment = payment_record::ActiveModel {
            id: Set(Uuid::new_v4()),
            order_id: Set(order_id),
            total_amount: Set(total_amount),
            amount_paid: Set(Decimal::ZERO),
            status: Set(PaymentStatus::Unpaid),
            last_payment_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        activity::record(
            &txn,
            ActivityEntry::new(
                ActivityType::OrderCreated,
                format!("Pesanan baru {}", order.order_number),
                format!("{} memesan senilai Rp {}", depot.name, total_amount),
            )
            .by(created_by)
            .pangkalan(pangkalan_id)
            .order(order_id),
        )
        .await?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to commit order creation transaction");
            ServiceError::from(e)
        })?;

        info!(order_id = %order_id, order_number = %order.order_number, "Order created successfully");
        Ok(OrderDetail {
            order,
            items,
            payment: Some(payment),
        })
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        filter: &OrderFilter,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<order::Model>, u64), ServiceError> {
        let mut query = OrderEntity::find();
        if let Some(status) = filter.status {
            query = query.filter(order::Column::Status.eq(status));
        }
        if let Some(pangkalan_id) = filter.pangkalan_id {
            query = query.filter(order::Column::PangkalanId.eq(pangkalan_id));
        }
        if let Some(start) = filter.start_date {
            query = query.filter(order::Column::OrderDate.gte(stock::day_start(start)));
        }
        if let Some(end) = filter.end_date {
            query = query.filter(order::Column::OrderDate.lt(stock::day_end_exclusive(end)));
        }

        let paginator = query
            .order_by_desc(order::Column::OrderDate)
            .paginate(&*self.db_pool, per_page);
        let total = paginator.num_items().await?;
        let orders = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((orders, total))
    }

    pub async fn find(&self, id: Uuid) -> Result<order::Model, ServiceError> {
        OrderEntity::find_by_id(id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::not_found("Order", id))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<OrderDetail, ServiceError> {
        let order = self.find(id).await?;
        self.detail(order).await
    }

    async fn detail(&self, order: order::Model) -> Result<OrderDetail, ServiceError> {
        let items = order
            .find_related(OrderItemEntity)
            .order_by_asc(order_item::Column::CreatedAt)
            .all(&*self.db_pool)
            .await?;
        let payment = order
            .find_related(payment_record::Entity)
            .one(&*self.db_pool)
            .await?;
        Ok(OrderDetail {
            order,
            items,
            payment,
        })
    }

    /// Updates notes and order date; a status change goes through [`Self::update_status`].
    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateOrderRequest,
        updated_by: Option<Uuid>,
    ) -> Result<OrderDetail, ServiceError> {
        let existing = self.find(id).await?;

        if request.notes.is_some() || request.order_date.is_some() {
            let mut active: OrderActiveModel = existing.into();
            if request.notes.is_some() {
                active.notes = Set(request.notes);
            }
            if let Some(order_date) = request.order_date {
                active.order_date = Set(order_date);
            }
            active.updated_at = Set(Utc::now());
            active.update(&*self.db_pool).await?;
        }

        match request.status {
            Some(status) if status != self.find(id).await?.status => {
                self.update_status(id, status, updated_by).await
            }
            _ => self.get(id).await,
        }
    }

    /// Moves an order along PENDING -> PROCESSING -> DELIVERED (or to CANCELLED).
    /// Delivery books an OUT stock movement for every item.
    #[instrument(skip(self), fields(order_id = %id, new_status = %new_status))]
    pub async fn update_status(
        &self,
        id: Uuid,
        new_status: OrderStatus,
        updated_by: Option<Uuid>,
    ) -> Result<OrderDetail, ServiceError> {
        let txn = self.db_pool.begin().await?;

        let order = OrderEntity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                warn!(order_id = %id, "Order not found for status update");
                ServiceError::not_found("Order", id)
            })?;

        let old_status = order.status;
        if !old_status.can_transition_to(new_status) {
            return Err(ServiceError::InvalidStatus(format!(
                "Cannot change order {} from {} to {}",
                order.order_number, old_status, new_status
            )));
        }

        if new_status == OrderStatus::Delivered {
            let items = order.find_related(OrderItemEntity).all(&txn).await?;
            for item in items {
                let product = lpg_products::find_by_type(&txn, item.lpg_type)
                    .await?
                    .ok_or_else(|| {
                        ServiceError::BadRequest(format!(
                            "No product registered for {}",
                            item.lpg_type
                        ))
                    })?;
                stock::apply_movement(
                    &txn,
                    &product,
                    MovementType::Out,
                    item.quantity,
                    Some(format!("Pengiriman {}", order.order_number)),
                    Some(order.id),
                    updated_by,
                )
                .await?;
            }
        }

        let order_number = order.order_number.clone();
        let pangkalan_id = order.pangkalan_id;
        let mut active: OrderActiveModel = order.into();
        active.status = Set(new_status);
        active.updated_at = Set(Utc::now());
        active.update(&txn).await?;

        activity::record(
            &txn,
            ActivityEntry::new(
                ActivityType::OrderStatusChanged,
                format!("Status pesanan {order_number}"),
                format!("{old_status} -> {new_status}"),
            )
            .by(updated_by)
            .pangkalan(pangkalan_id)
            .order(id),
        )
        .await?;

        txn.commit().await?;
        info!(order_id = %id, old_status = %old_status, new_status = %new_status, "Order status updated successfully");

        self.get(id).await
    }

    /// Only PENDING or CANCELLED orders can be removed; items, payment record
    /// and invoice go with them.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let txn = self.db_pool.begin().await?;
        let order = OrderEntity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Order", id))?;

        if !order.status.is_deletable() {
            return Err(ServiceError::InvalidStatus(format!(
                "Order {} is {} and cannot be deleted",
                order.order_number, order.status
            )));
        }

        order_item::Entity::delete_many()
            .filter(order_item::Column::OrderId.eq(id))
            .exec(&txn)
            .await?;
        payment_record::Entity::delete_many()
            .filter(payment_record::Column::OrderId.eq(id))
            .exec(&txn)
            .await?;
        invoice::Entity::delete_many()
            .filter(invoice::Column::OrderId.eq(id))
            .exec(&txn)
            .await?;
        OrderEntity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        info!(order_id = %id, "Order deleted");
        Ok(())
    }
}
