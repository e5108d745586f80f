//! LPG Agent API Library
//!
//! Backend for an LPG agent: pangkalan master data, orders with payments and
//! invoices, consumer sales, stock movements and monthly distribution
//! rekapitulasi.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod middleware_helpers;
pub mod migrator;
pub mod openapi;
pub mod services;
pub mod tracing;

use axum::{
    extract::Extension,
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use chrono::Utc;
use http::HeaderValue;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
};
use utoipa::ToSchema;

use crate::auth::{AuthRouterExt, AuthService};
use crate::entities::UserRole;
use crate::handlers as h;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub services: handlers::AppServices,
    pub auth: Arc<AuthService>,
}

impl AppState {
    /// Wires every service onto one shared connection.
    pub fn new(db: Arc<DatabaseConnection>, config: config::AppConfig) -> Self {
        let auth = Arc::new(AuthService::new(
            auth::AuthConfig::from_app_config(&config),
            db.clone(),
        ));
        Self {
            services: handlers::AppServices::new(db.clone(), &config),
            db,
            config,
            auth,
        }
    }
}

// Common response wrappers
#[derive(Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub errors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
}

#[derive(Serialize, ToSchema)]
pub struct ResponseMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub timestamp: String,
}

impl ResponseMeta {
    fn capture() -> Self {
        Self {
            request_id: crate::tracing::current_request_id().map(|rid| rid.as_str().to_string()),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            errors: None,
            meta: Some(ResponseMeta::capture()),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message),
            errors: None,
            meta: Some(ResponseMeta::capture()),
        }
    }

    pub fn validation_errors(errors: Vec<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some("Validation failed".to_string()),
            errors: Some(errors),
            meta: Some(ResponseMeta::capture()),
        }
    }
}


/// Standard API result type for JSON responses
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, errors::ServiceError>;

/// Everything under `/api/v1`.
///
/// Routes readable by pangkalan users sit behind `with_auth` and scope
/// themselves in the handler; the rest require `ADMIN`.
pub fn api_v1_routes() -> Router<AppState> {
    let public = Router::new().route("/auth/login", post(h::auth::login));

    let shared = Router::new()
        .route("/auth/me", get(h::auth::me))
        .route("/pangkalans/:id", get(h::pangkalans::get_pangkalan))
        // Consumers
        .route(
            "/consumers",
            get(h::consumers::list_consumers).post(h::consumers::create_consumer),
        )
        .route(
            "/consumers/:id",
            get(h::consumers::get_consumer)
                .put(h::consumers::update_consumer)
                .delete(h::consumers::delete_consumer),
        )
        // Products and stock (read)
        .route("/lpg-products", get(h::lpg_products::list_products))
        .route("/lpg-products/:id", get(h::lpg_products::get_product))
        .route(
            "/lpg-products/price/:lpg_type",
            get(h::lpg_products::get_price),
        )
        .route("/stock", get(h::stock::stock_levels))
        .route("/stock/movements", get(h::stock::list_movements))
        // Orders
        .route(
            "/orders",
            get(h::orders::list_orders).post(h::orders::create_order),
        )
        .route("/orders/:id", get(h::orders::get_order))
        .route("/orders/:id/payment", get(h::payments::get_order_payment))
        .route("/invoices", get(h::invoices::list_invoices))
        .route("/invoices/:id", get(h::invoices::get_invoice))
        // Consumer sales
        .route(
            "/consumer-orders",
            get(h::consumer_orders::list_consumer_orders)
                .post(h::consumer_orders::create_consumer_order),
        )
        .route(
            "/consumer-orders/summary",
            get(h::consumer_orders::consumer_sales_summary),
        )
        .route(
            "/consumer-orders/:id",
            get(h::consumer_orders::get_consumer_order)
                .put(h::consumer_orders::update_consumer_order)
                .delete(h::consumer_orders::delete_consumer_order),
        )
        // Distribution (read)
        .route("/penyaluran", get(h::distribution::penyaluran::list))
        .route(
            "/penyaluran/rekapitulasi",
            get(h::distribution::penyaluran::rekapitulasi),
        )
        .route("/perencanaan", get(h::distribution::perencanaan::list))
        .route(
            "/perencanaan/rekapitulasi",
            get(h::distribution::perencanaan::rekapitulasi),
        )
        .route(
            "/perencanaan/realisasi",
            get(h::distribution::perencanaan::realisasi),
        )
        .with_auth();

    let admin = Router::new()
        // Users
        .route(
            "/users",
            get(h::users::list_users).post(h::users::create_user),
        )
        .route(
            "/users/:id",
            get(h::users::get_user)
                .put(h::users::update_user)
                .delete(h::users::delete_user),
        )
        // Pangkalans (write)
        .route(
            "/pangkalans",
            get(h::pangkalans::list_pangkalans).post(h::pangkalans::create_pangkalan),
        )
        .route(
            "/pangkalans/:id",
            put(h::pangkalans::update_pangkalan).delete(h::pangkalans::delete_pangkalan),
        )
        // Products and stock (write)
        .route("/lpg-products", post(h::lpg_products::create_product))
        .route(
            "/lpg-products/:id",
            put(h::lpg_products::update_product).delete(h::lpg_products::delete_product),
        )
        .route("/stock/movements", post(h::stock::record_movement))
        // Orders (write)
        .route(
            "/orders/:id",
            put(h::orders::update_order).delete(h::orders::delete_order),
        )
        .route("/orders/:id/status", put(h::orders::update_order_status))
        .route("/orders/:id/payments", post(h::payments::record_payment))
        .route("/orders/:id/invoice", post(h::invoices::generate_invoice))
        .route("/payments", get(h::payments::list_payments))
        // Distribution (write)
        .route("/penyaluran", post(h::distribution::penyaluran::upsert))
        .route(
            "/penyaluran/bulk",
            post(h::distribution::penyaluran::bulk_upsert),
        )
        .route(
            "/penyaluran/:id",
            delete(h::distribution::penyaluran::delete),
        )
        .route("/perencanaan", post(h::distribution::perencanaan::upsert))
        .route(
            "/perencanaan/bulk",
            post(h::distribution::perencanaan::bulk_upsert),
        )
        .route(
            "/perencanaan/:id",
            delete(h::distribution::perencanaan::delete),
        )
        // Reports and notifications
        .route("/reports/sales", get(h::reports::sales_report))
        .route("/reports/stock", get(h::reports::stock_report))
        .route("/reports/payments", get(h::reports::payment_report))
        .route("/reports/dashboard", get(h::reports::dashboard))
        .route(
            "/notifications",
            get(h::notifications::list_notifications),
        )
        .with_role(UserRole::Admin);

    Router::new().merge(public).merge(shared).merge(admin)
}

/// CORS from configuration: explicit origins win; otherwise permissive in
/// development or when explicitly allowed. `None` means misconfigured.
pub fn cors_layer(cfg: &config::AppConfig) -> Option<CorsLayer> {
    let origins: Vec<HeaderValue> = cfg
        .cors_allowed_origins
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    if !origins.is_empty() {
        Some(
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else if cfg.should_allow_permissive_cors() {
        Some(CorsLayer::permissive())
    } else {
        None
    }
}

/// Full application router: health, `/api/v1`, Swagger UI and the shared
/// middleware stack.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/", get(|| async { "lpg-api up" }))
        .merge(h::health::health_routes())
        .nest("/api/v1", api_v1_routes())
        .merge(openapi::swagger_ui())
        .layer(crate::tracing::configure_http_tracing())
        .layer(CompressionLayer::new())
        .layer(cors)
        // The auth middleware reads the service from request extensions
        .layer(Extension(state.auth.clone()))
        .layer(axum::middleware::from_fn(
            middleware_helpers::request_id_middleware,
        ))
        .with_state(state)
}
