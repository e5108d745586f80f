use crate::{
    db::DbPool,
    entities::{
        invoice, order,
        payment_record::{self, Entity as PaymentEntity},
        ActivityType, InvoiceStatus, PaymentStatus,
    },
    errors::ServiceError,
    services::{
        activity::{self, ActivityEntry},
        money::{checked_sum, validate_payment},
    },
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Select, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RecordPaymentRequest {
    #[validate(custom = "validate_payment")]
    pub amount: Decimal,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaymentFilter {
    pub status: Option<PaymentStatus>,
}

/// Order row locked for the rest of the transaction (`FOR UPDATE` on Postgres).
/// Concurrent payments for one order queue behind it.
fn order_for_update(order_id: Uuid) -> Select<order::Entity> {
    order::Entity::find_by_id(order_id).lock_exclusive()
}

fn payment_for_update(order_id: Uuid) -> Select<PaymentEntity> {
    PaymentEntity::find()
        .filter(payment_record::Column::OrderId.eq(order_id))
        .lock_exclusive()
}

#[derive(Clone)]
pub struct PaymentService {
    db_pool: Arc<DbPool>,
}

impl PaymentService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Adds `amount` to the order's running balance. The record is created
    /// on first payment if the order has none yet.
    #[instrument(skip(self, request), fields(order_id = %order_id, amount = %request.amount))]
    pub async fn record_payment(
        &self,
        order_id: Uuid,
        request: RecordPaymentRequest,
        received_by: Option<Uuid>,
    ) -> Result<payment_record::Model, ServiceError> {
        request.validate()?;

        let txn = self.db_pool.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start payment transaction");
            ServiceError::from(e)
        })?;

        let order = order_for_update(order_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                warn!(order_id = %order_id, "Payment for unknown order");
                ServiceError::not_found("Order", order_id)
            })?;

        let now = Utc::now();
        let existing = payment_for_update(order_id).one(&txn).await?;

        let record = match existing {
            Some(record) => {
                let amount_paid = checked_sum(record.amount_paid, request.amount, "amount_paid")?;
                let status = PaymentStatus::from_amounts(amount_paid, record.total_amount);
                let mut active: payment_record::ActiveModel = record.into();
                active.amount_paid = Set(amount_paid);
                active.status = Set(status);
                active.last_payment_at = Set(Some(now));
                active.updated_at = Set(now);
                active.update(&txn).await?
            }
            None => payment_record::ActiveModel {
                id: Set(Uuid::new_v4()),
                order_id: Set(order_id),
                total_amount: Set(order.total_amount),
                amount_paid: Set(request.amount),
                status: Set(PaymentStatus::from_amounts(
                    request.amount,
                    order.total_amount,
                )),
                last_payment_at: Set(Some(now)),
                created_at: Set(now),
                updated_at: Set(now),
            }
            .insert(&txn)
            .await?,
        };

        if record.status == PaymentStatus::Paid {
            if let Some(inv) = invoice::Entity::find()
                .filter(invoice::Column::OrderId.eq(order_id))
                .one(&txn)
                .await?
            {
                if inv.status != InvoiceStatus::Paid {
                    let mut active: invoice::ActiveModel = inv.into();
                    active.status = Set(InvoiceStatus::Paid);
                    active.update(&txn).await?;
                }
            }
        }

        let mut description = format!(
            "Rp {} diterima, total dibayar Rp {} ({})",
            request.amount, record.amount_paid, record.status
        );
        if let Some(note) = request.note.as_deref().filter(|n| !n.is_empty()) {
            description.push_str(&format!(": {note}"));
        }
        activity::record(
            &txn,
            ActivityEntry::new(
                ActivityType::PaymentReceived,
                format!("Pembayaran {}", order.order_number),
                description,
            )
            .by(received_by)
            .pangkalan(order.pangkalan_id)
            .order(order_id),
        )
        .await?;

        txn.commit().await?;
        info!(
            order_id = %order_id,
            amount_paid = %record.amount_paid,
            status = %record.status,
            "Payment recorded"
        );
        Ok(record)
    }

    #[instrument(skip(self))]
    pub async fn get_by_order(&self, order_id: Uuid) -> Result<payment_record::Model, ServiceError> {
        PaymentEntity::find()
            .filter(payment_record::Column::OrderId.eq(order_id))
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("No payment record for order {order_id}")))
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        filter: &PaymentFilter,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<payment_record::Model>, u64), ServiceError> {
        let mut query = PaymentEntity::find();
        if let Some(status) = filter.status {
            query = query.filter(payment_record::Column::Status.eq(status));
        }
        let paginator = query
            .order_by_desc(payment_record::Column::UpdatedAt)
            .paginate(&*self.db_pool, per_page);
        let total = paginator.num_items().await?;
        let records = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((records, total))
    }
}
