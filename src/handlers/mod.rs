pub mod auth;
pub mod common;
pub mod consumer_orders;
pub mod consumers;
pub mod distribution;
pub mod health;
pub mod invoices;
pub mod lpg_products;
pub mod notifications;
pub mod orders;
pub mod pangkalans;
pub mod payments;
pub mod reports;
pub mod stock;
pub mod users;

use crate::{
    config::AppConfig,
    db::DbPool,
    services::{
        consumer_orders::ConsumerOrderService,
        consumers::ConsumerService,
        distribution::{PenyaluranService, PerencanaanService},
        invoicing::InvoiceService,
        lpg_products::LpgProductService,
        notifications::NotificationService,
        orders::OrderService,
        pangkalans::PangkalanService,
        payments::PaymentService,
        reports::ReportService,
        stock::StockService,
        users::UserService,
    },
};
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub users: Arc<UserService>,
    pub pangkalans: Arc<PangkalanService>,
    pub consumers: Arc<ConsumerService>,
    pub lpg_products: Arc<LpgProductService>,
    pub stock: Arc<StockService>,
    pub orders: Arc<OrderService>,
    pub consumer_orders: Arc<ConsumerOrderService>,
    pub payments: Arc<PaymentService>,
    pub invoices: Arc<InvoiceService>,
    pub penyaluran: Arc<PenyaluranService>,
    pub perencanaan: Arc<PerencanaanService>,
    pub reports: Arc<ReportService>,
    pub notifications: Arc<NotificationService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>, config: &AppConfig) -> Self {
        Self {
            users: Arc::new(UserService::new(db_pool.clone())),
            pangkalans: Arc::new(PangkalanService::new(db_pool.clone())),
            consumers: Arc::new(ConsumerService::new(db_pool.clone())),
            lpg_products: Arc::new(LpgProductService::new(db_pool.clone())),
            stock: Arc::new(StockService::new(db_pool.clone())),
            orders: Arc::new(OrderService::new(db_pool.clone())),
            consumer_orders: Arc::new(ConsumerOrderService::new(db_pool.clone())),
            payments: Arc::new(PaymentService::new(db_pool.clone())),
            invoices: Arc::new(InvoiceService::new(
                db_pool.clone(),
                config.tax_rate(),
                config.invoice_due_days,
            )),
            penyaluran: Arc::new(PenyaluranService::new(db_pool.clone())),
            perencanaan: Arc::new(PerencanaanService::new(db_pool.clone())),
            reports: Arc::new(ReportService::new(db_pool.clone())),
            notifications: Arc::new(NotificationService::new(db_pool)),
        }
    }
}
