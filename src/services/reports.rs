use crate::{
    db::DbPool,
    entities::{
        lpg_product, order, order_item, pangkalan, payment_record, stock_history, LpgType,
        MovementType, OrderStatus,
    },
    errors::ServiceError,
    services::{
        rekapitulasi::Month,
        stock::{self, StockLevel, StockService},
    },
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Inclusive date range; defaults to the current month up to today.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReportRange {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub pangkalan_id: Option<Uuid>,
}

impl ReportRange {
    pub fn resolve(&self, today: NaiveDate) -> Result<(NaiveDate, NaiveDate), ServiceError> {
        let start = self
            .start_date
            .unwrap_or_else(|| Month::containing(today).first_day());
        let end = self.end_date.unwrap_or(today);
        if start > end {
            return Err(ServiceError::BadRequest(format!(
                "start_date {start} is after end_date {end}"
            )));
        }
        Ok((start, end))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SalesRow {
    pub pangkalan_id: Uuid,
    pub code: String,
    pub name: String,
    pub order_count: u64,
    /// Tabung ordered per cylinder size
    pub tabung: BTreeMap<LpgType, i64>,
    pub total_tabung: i64,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SalesReport {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub rows: Vec<SalesRow>,
    pub total_orders: u64,
    pub total_tabung: i64,
    pub total_revenue: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StockDay {
    pub date: NaiveDate,
    pub total_in: i64,
    pub total_out: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StockReportProduct {
    pub product_id: Uuid,
    pub name: String,
    pub lpg_type: LpgType,
    pub days: Vec<StockDay>,
    pub total_in: i64,
    pub total_out: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StockReport {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub products: Vec<StockReportProduct>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OutstandingRow {
    pub pangkalan_id: Uuid,
    pub code: String,
    pub name: String,
    pub unpaid_orders: u64,
    pub total_amount: Decimal,
    pub amount_paid: Decimal,
    pub outstanding: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaymentReport {
    pub rows: Vec<OutstandingRow>,
    pub total_outstanding: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Dashboard {
    pub active_pangkalans: u64,
    pub orders_today: u64,
    pub pending_orders: u64,
    pub revenue_this_month: Decimal,
    pub stock: Vec<StockLevel>,
}

fn name_index(pangkalans: &[pangkalan::Model]) -> HashMap<Uuid, (&str, &str)> {
    pangkalans
        .iter()
        .map(|p| (p.id, (p.code.as_str(), p.name.as_str())))
        .collect()
}

fn sales_row<'a>(
    rows: &'a mut HashMap<Uuid, SalesRow>,
    names: &HashMap<Uuid, (&str, &str)>,
    pangkalan_id: Uuid,
) -> &'a mut SalesRow {
    rows.entry(pangkalan_id).or_insert_with(|| {
        let (code, name) = names.get(&pangkalan_id).copied().unwrap_or(("-", "-"));
        SalesRow {
            pangkalan_id,
            code: code.to_string(),
            name: name.to_string(),
            order_count: 0,
            tabung: BTreeMap::new(),
            total_tabung: 0,
            revenue: Decimal::ZERO,
        }
    })
}

/// Groups non-cancelled orders and their items by pangkalan, ordered by code.
pub fn aggregate_sales(
    orders: &[order::Model],
    items: &[order_item::Model],
    pangkalans: &[pangkalan::Model],
) -> Vec<SalesRow> {
    let names = name_index(pangkalans);
    let order_owner: HashMap<Uuid, Uuid> = orders
        .iter()
        .filter(|o| o.status != OrderStatus::Cancelled)
        .map(|o| (o.id, o.pangkalan_id))
        .collect();

    let mut rows: HashMap<Uuid, SalesRow> = HashMap::new();

    for o in orders.iter().filter(|o| o.status != OrderStatus::Cancelled) {
        let row = sales_row(&mut rows, &names, o.pangkalan_id);
        row.order_count += 1;
        row.revenue += o.total_amount;
    }
    for item in items {
        let Some(&pangkalan_id) = order_owner.get(&item.order_id) else {
            continue;
        };
        let row = sales_row(&mut rows, &names, pangkalan_id);
        let qty = i64::from(item.quantity);
        *row.tabung.entry(item.lpg_type).or_insert(0) += qty;
        row.total_tabung += qty;
    }

    let mut rows: Vec<SalesRow> = rows.into_values().collect();
    rows.sort_by(|a, b| a.code.cmp(&b.code));
    rows
}

/// Daily IN/OUT totals per product, days ascending.
pub fn aggregate_stock(
    movements: &[stock_history::Model],
    products: &[lpg_product::Model],
) -> Vec<StockReportProduct> {
    let mut per_product: HashMap<Uuid, BTreeMap<NaiveDate, (i64, i64)>> = HashMap::new();
    for m in movements {
        let day = per_product
            .entry(m.product_id)
            .or_default()
            .entry(m.created_at.date_naive())
            .or_default();
        match m.movement_type {
            MovementType::In => day.0 += i64::from(m.quantity),
            MovementType::Out => day.1 += i64::from(m.quantity),
        }
    }

    products
        .iter()
        .map(|product| {
            let days: Vec<StockDay> = per_product
                .remove(&product.id)
                .unwrap_or_default()
                .into_iter()
                .map(|(date, (total_in, total_out))| StockDay {
                    date,
                    total_in,
                    total_out,
                })
                .collect();
            StockReportProduct {
                product_id: product.id,
                name: product.name.clone(),
                lpg_type: product.lpg_type,
                total_in: days.iter().map(|d| d.total_in).sum(),
                total_out: days.iter().map(|d| d.total_out).sum(),
                days,
            }
        })
        .collect()
}

/// Outstanding balances per pangkalan; fully paid and cancelled orders drop out.
pub fn aggregate_outstanding(
    orders: &[order::Model],
    payments: &[payment_record::Model],
    pangkalans: &[pangkalan::Model],
) -> Vec<OutstandingRow> {
    let names = name_index(pangkalans);
    let order_owner: HashMap<Uuid, Uuid> = orders
        .iter()
        .filter(|o| o.status != OrderStatus::Cancelled)
        .map(|o| (o.id, o.pangkalan_id))
        .collect();

    let mut rows: HashMap<Uuid, OutstandingRow> = HashMap::new();
    for payment in payments.iter().filter(|p| p.outstanding() > Decimal::ZERO) {
        let Some(&pangkalan_id) = order_owner.get(&payment.order_id) else {
            continue;
        };
        let row = rows.entry(pangkalan_id).or_insert_with(|| {
            let (code, name) = names.get(&pangkalan_id).copied().unwrap_or(("-", "-"));
            OutstandingRow {
                pangkalan_id,
                code: code.to_string(),
                name: name.to_string(),
                unpaid_orders: 0,
                total_amount: Decimal::ZERO,
                amount_paid: Decimal::ZERO,
                outstanding: Decimal::ZERO,
            }
        });
        row.unpaid_orders += 1;
        row.total_amount += payment.total_amount;
        row.amount_paid += payment.amount_paid;
        row.outstanding += payment.outstanding();
    }

    let mut rows: Vec<OutstandingRow> = rows.into_values().collect();
    rows.sort_by(|a, b| b.outstanding.cmp(&a.outstanding).then_with(|| a.code.cmp(&b.code)));
    rows
}

#[derive(Clone)]
pub struct ReportService {
    db_pool: Arc<DbPool>,
    stock: StockService,
}

impl ReportService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            stock: StockService::new(db_pool.clone()),
            db_pool,
        }
    }

    #[instrument(skip(self))]
    pub async fn sales_report(&self, range: &ReportRange) -> Result<SalesReport, ServiceError> {
        let (start, end) = range.resolve(Utc::now().date_naive())?;

        let mut query = order::Entity::find()
            .filter(order::Column::OrderDate.gte(stock::day_start(start)))
            .filter(order::Column::OrderDate.lt(stock::day_end_exclusive(end)))
            .filter(order::Column::Status.ne(OrderStatus::Cancelled));
        if let Some(pangkalan_id) = range.pangkalan_id {
            query = query.filter(order::Column::PangkalanId.eq(pangkalan_id));
        }
        let orders = query.all(&*self.db_pool).await?;

        let items = if orders.is_empty() {
            Vec::new()
        } else {
            order_item::Entity::find()
                .filter(order_item::Column::OrderId.is_in(orders.iter().map(|o| o.id)))
                .all(&*self.db_pool)
                .await?
        };
        let pangkalans = pangkalan::Entity::find().all(&*self.db_pool).await?;

        let rows = aggregate_sales(&orders, &items, &pangkalans);
        let report = SalesReport {
            start_date: start,
            end_date: end,
            total_orders: rows.iter().map(|r| r.order_count).sum(),
            total_tabung: rows.iter().map(|r| r.total_tabung).sum(),
            total_revenue: rows.iter().map(|r| r.revenue).sum(),
            rows,
        };
        info!(orders = report.total_orders, "Sales report generated");
        Ok(report)
    }

    #[instrument(skip(self))]
    pub async fn stock_report(&self, range: &ReportRange) -> Result<StockReport, ServiceError> {
        let (start, end) = range.resolve(Utc::now().date_naive())?;

        let movements = stock_history::Entity::find()
            .filter(stock_history::Column::CreatedAt.gte(stock::day_start(start)))
            .filter(stock_history::Column::CreatedAt.lt(stock::day_end_exclusive(end)))
            .all(&*self.db_pool)
            .await?;
        let products = lpg_product::Entity::find()
            .order_by_asc(lpg_product::Column::LpgType)
            .all(&*self.db_pool)
            .await?;

        Ok(StockReport {
            start_date: start,
            end_date: end,
            products: aggregate_stock(&movements, &products),
        })
    }

    #[instrument(skip(self))]
    pub async fn payment_report(&self) -> Result<PaymentReport, ServiceError> {
        let payments = payment_record::Entity::find()
            .filter(payment_record::Column::Status.ne(crate::entities::PaymentStatus::Paid))
            .all(&*self.db_pool)
            .await?;
        let orders = if payments.is_empty() {
            Vec::new()
        } else {
            order::Entity::find()
                .filter(order::Column::Id.is_in(payments.iter().map(|p| p.order_id)))
                .all(&*self.db_pool)
                .await?
        };
        let pangkalans = pangkalan::Entity::find().all(&*self.db_pool).await?;

        let rows = aggregate_outstanding(&orders, &payments, &pangkalans);
        Ok(PaymentReport {
            total_outstanding: rows.iter().map(|r| r.outstanding).sum(),
            rows,
        })
    }

    #[instrument(skip(self))]
    pub async fn dashboard(&self) -> Result<Dashboard, ServiceError> {
        let today = Utc::now().date_naive();
        let month = Month::containing(today);

        let active_pangkalans = pangkalan::Entity::find()
            .filter(pangkalan::Column::IsActive.eq(true))
            .count(&*self.db_pool)
            .await?;
        let orders_today = order::Entity::find()
            .filter(order::Column::OrderDate.gte(stock::day_start(today)))
            .filter(order::Column::OrderDate.lt(stock::day_end_exclusive(today)))
            .count(&*self.db_pool)
            .await?;
        let pending_orders = order::Entity::find()
            .filter(order::Column::Status.eq(OrderStatus::Pending))
            .count(&*self.db_pool)
            .await?;
        let revenue_this_month = order::Entity::find()
            .filter(order::Column::OrderDate.gte(stock::day_start(month.first_day())))
            .filter(order::Column::OrderDate.lt(stock::day_end_exclusive(month.last_day())))
            .filter(order::Column::Status.ne(OrderStatus::Cancelled))
            .all(&*self.db_pool)
            .await?
            .iter()
            .map(|o| o.total_amount)
            .sum();

        Ok(Dashboard {
            active_pangkalans,
            orders_today,
            pending_orders,
            revenue_this_month,
            stock: self.stock.stock_levels().await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone};
    use rust_decimal_macros::dec;

    fn depot(code: &str) -> pangkalan::Model {
        let now = Utc::now();
        pangkalan::Model {
            id: Uuid::new_v4(),
            code: code.to_string(),
            name: format!("Pangkalan {code}"),
            address: "-".to_string(),
            region: "Kota".to_string(),
            pic_name: None,
            phone: None,
            alokasi_bulanan: 100,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn order_for(p: &pangkalan::Model, status: OrderStatus, total: Decimal) -> order::Model {
        let now = Utc::now();
        order::Model {
            id: Uuid::new_v4(),
            order_number: "ORD-20240101-AAAAAA".to_string(),
            pangkalan_id: p.id,
            status,
            order_date: now,
            total_amount: total,
            notes: None,
            created_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn item(o: &order::Model, lpg_type: LpgType, quantity: i32) -> order_item::Model {
        order_item::Model {
            id: Uuid::new_v4(),
            order_id: o.id,
            lpg_type,
            quantity,
            unit_price: dec!(16000),
            subtotal: dec!(16000) * Decimal::from(quantity),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn sales_skip_cancelled_orders() {
        let a = depot("PK-002");
        let b = depot("PK-001");
        let o1 = order_for(&a, OrderStatus::Delivered, dec!(160000));
        let o2 = order_for(&a, OrderStatus::Cancelled, dec!(999));
        let o3 = order_for(&b, OrderStatus::Pending, dec!(32000));
        let items = vec![
            item(&o1, LpgType::Kg3, 10),
            item(&o2, LpgType::Kg3, 50),
            item(&o3, LpgType::Kg3, 2),
        ];

        let rows = aggregate_sales(&[o1, o2, o3], &items, &[a.clone(), b.clone()]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].code, "PK-001");
        assert_eq!(rows[1].order_count, 1);
        assert_eq!(rows[1].revenue, dec!(160000));
        assert_eq!(rows[1].tabung.get(&LpgType::Kg3), Some(&10));
        assert_eq!(rows[1].total_tabung, 10);
    }

    #[test]
    fn stock_report_groups_by_day() {
        let now = Utc::now();
        let product = lpg_product::Model {
            id: Uuid::new_v4(),
            name: "Elpiji 3 kg".to_string(),
            lpg_type: LpgType::Kg3,
            selling_price: dec!(18000),
            cost_price: dec!(16000),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        let at = |d: u32, h: u32| -> DateTime<Utc> { Utc.with_ymd_and_hms(2024, 6, d, h, 0, 0).unwrap() };
        let movement = |movement_type, quantity, created_at| stock_history::Model {
            id: Uuid::new_v4(),
            product_id: product.id,
            movement_type,
            quantity,
            note: None,
            order_id: None,
            created_by: None,
            created_at,
        };
        let movements = vec![
            movement(MovementType::In, 100, at(2, 8)),
            movement(MovementType::Out, 30, at(2, 15)),
            movement(MovementType::Out, 20, at(1, 9)),
        ];

        let report = aggregate_stock(&movements, &[product]);
        assert_eq!(report[0].days.len(), 2);
        assert_eq!(report[0].days[0].date, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert_eq!(report[0].days[1].total_in, 100);
        assert_eq!(report[0].days[1].total_out, 30);
        assert_eq!(report[0].total_out, 50);
    }

    #[test]
    fn outstanding_sums_unpaid_balances() {
        let a = depot("PK-001");
        let o1 = order_for(&a, OrderStatus::Delivered, dec!(100000));
        let o2 = order_for(&a, OrderStatus::Pending, dec!(50000));
        let now = Utc::now();
        let payment = |o: &order::Model, paid: Decimal| payment_record::Model {
            id: Uuid::new_v4(),
            order_id: o.id,
            total_amount: o.total_amount,
            amount_paid: paid,
            status: crate::entities::PaymentStatus::from_amounts(paid, o.total_amount),
            last_payment_at: None,
            created_at: now,
            updated_at: now,
        };
        let payments = vec![payment(&o1, dec!(40000)), payment(&o2, dec!(0))];

        let rows = aggregate_outstanding(&[o1, o2], &payments, &[a]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].unpaid_orders, 2);
        assert_eq!(rows[0].outstanding, dec!(110000));
    }

    #[test]
    fn range_defaults_to_current_month() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let (start, end) = ReportRange::default().resolve(today).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(end, today);

        let inverted = ReportRange {
            start_date: NaiveDate::from_ymd_opt(2024, 3, 20),
            end_date: NaiveDate::from_ymd_opt(2024, 3, 1),
            pangkalan_id: None,
        };
        assert!(inverted.resolve(today).is_err());
    }
}
