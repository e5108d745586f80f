use crate::{
    db::DbPool,
    entities::{
        invoice::{self, Entity as InvoiceEntity},
        order, payment_record, ActivityType, InvoiceStatus, OrderStatus, PaymentStatus,
    },
    errors::ServiceError,
    services::activity::{self, ActivityEntry},
};
use chrono::{DateTime, Duration, Utc};
use rand::{distributions::Alphanumeric, Rng};
use rust_decimal::{Decimal, RoundingStrategy};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct GenerateInvoiceRequest {
    /// Overrides the configured tax rate, e.g. `0.11`
    pub tax_rate: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct InvoiceFilter {
    pub status: Option<InvoiceStatus>,
    pub pangkalan_id: Option<Uuid>,
}

/// `INV-YYYYMM-XXXXXX`
pub fn generate_invoice_number(date: DateTime<Utc>) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(|c| char::from(c).to_ascii_uppercase())
        .collect();
    format!("INV-{}-{}", date.format("%Y%m"), suffix)
}

/// Tax rounded to whole sen.
pub fn tax_for(sub_total: Decimal, rate: Decimal) -> Decimal {
    (sub_total * rate).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[derive(Clone)]
pub struct InvoiceService {
    db_pool: Arc<DbPool>,
    default_tax_rate: Decimal,
    due_days: u32,
}

impl InvoiceService {
    pub fn new(db_pool: Arc<DbPool>, default_tax_rate: Decimal, due_days: u32) -> Self {
        Self {
            db_pool,
            default_tax_rate,
            due_days,
        }
    }

    /// Issues the invoice for an order, or returns the one already issued.
    /// The flag is `true` when a new invoice was created.
    #[instrument(skip(self, request), fields(order_id = %order_id))]
    pub async fn generate_for_order(
        &self,
        order_id: Uuid,
        request: GenerateInvoiceRequest,
        issued_by: Option<Uuid>,
    ) -> Result<(invoice::Model, bool), ServiceError> {
        let rate = request.tax_rate.unwrap_or(self.default_tax_rate);
        if rate.is_sign_negative() || rate > Decimal::ONE {
            return Err(ServiceError::ValidationError(
                "tax_rate must be between 0 and 1".to_string(),
            ));
        }

        let txn = self.db_pool.begin().await?;

        let order = order::Entity::find_by_id(order_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Order", order_id))?;

        if let Some(existing) = InvoiceEntity::find()
            .filter(invoice::Column::OrderId.eq(order_id))
            .one(&txn)
            .await?
        {
            txn.commit().await?;
            return Ok((existing, false));
        }

        if order.status == OrderStatus::Cancelled {
            return Err(ServiceError::InvalidStatus(format!(
                "Order {} is cancelled and cannot be invoiced",
                order.order_number
            )));
        }

        let paid = payment_record::Entity::find()
            .filter(payment_record::Column::OrderId.eq(order_id))
            .one(&txn)
            .await?
            .is_some_and(|p| p.status == PaymentStatus::Paid);

        let now = Utc::now();
        let sub_total = order.total_amount;
        let tax_amount = tax_for(sub_total, rate);
        let due_date = (now + Duration::days(i64::from(self.due_days))).date_naive();

        let model = invoice::ActiveModel {
            id: Set(Uuid::new_v4()),
            invoice_number: Set(generate_invoice_number(now)),
            order_id: Set(order_id),
            pangkalan_id: Set(order.pangkalan_id),
            sub_total: Set(sub_total),
            tax_amount: Set(tax_amount),
            total_amount: Set(sub_total + tax_amount),
            issued_at: Set(now),
            due_date: Set(due_date),
            status: Set(if paid {
                InvoiceStatus::Paid
            } else {
                InvoiceStatus::Issued
            }),
            created_at: Set(now),
        }
        .insert(&txn)
        .await?;

        activity::record(
            &txn,
            ActivityEntry::new(
                ActivityType::InvoiceIssued,
                format!("Faktur {}", model.invoice_number),
                format!(
                    "Faktur untuk pesanan {} senilai Rp {}",
                    order.order_number, model.total_amount
                ),
            )
            .by(issued_by)
            .pangkalan(order.pangkalan_id)
            .order(order_id),
        )
        .await?;

        txn.commit().await?;
        info!(invoice_id = %model.id, invoice_number = %model.invoice_number, "Invoice issued");
        Ok((model, true))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<invoice::Model, ServiceError> {
        InvoiceEntity::find_by_id(id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::not_found("Invoice", id))
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        filter: &InvoiceFilter,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<invoice::Model>, u64), ServiceError> {
        let mut query = InvoiceEntity::find();
        if let Some(status) = filter.status {
            query = query.filter(invoice::Column::Status.eq(status));
        }
        if let Some(pangkalan_id) = filter.pangkalan_id {
            query = query.filter(invoice::Column::PangkalanId.eq(pangkalan_id));
        }
        let paginator = query
            .order_by_desc(invoice::Column::IssuedAt)
            .paginate(&*self.db_pool, per_page);
        let total = paginator.num_items().await?;
        let invoices = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((invoices, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    #[test]
    fn invoice_number_carries_year_and_month() {
        let date = Utc.with_ymd_and_hms(2024, 11, 30, 23, 0, 0).unwrap();
        let number = generate_invoice_number(date);
        assert!(number.starts_with("INV-202411-"));
        assert_eq!(number.len(), "INV-202411-".len() + 6);
    }

    #[test]
    fn tax_is_rounded_to_two_places() {
        assert_eq!(tax_for(dec!(190000), dec!(0.11)), dec!(20900.00));
        assert_eq!(tax_for(dec!(10.05), dec!(0.11)), dec!(1.11));
        assert_eq!(tax_for(dec!(500), dec!(0)), dec!(0));
    }
}
