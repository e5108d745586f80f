use crate::handlers;
use utoipa::{
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

/// Registers the `Bearer` JWT scheme referenced by the secured paths
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "Bearer",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "LPG Agent API",
        version = "1.0.0",
        description = r#"
# LPG Agent API

Backend for an LPG agent supplying its pangkalan (sub-distributors).

## Features

- **Pangkalan & consumers**: master data per depot
- **Orders**: agent-to-pangkalan orders with status flow, payments and invoices
- **Stock**: movement ledger; deliveries take cylinders out of stock
- **Penyaluran / Perencanaan**: daily actual and planned distribution with monthly rekapitulasi
- **Reports & notifications**: sales, stock, outstanding balances and alerts

## Authentication

Obtain a token from `POST /api/v1/auth/login` and send it as:

```
Authorization: Bearer <your-jwt-token>
```

Admins can reach every endpoint. Pangkalan users are limited to their own depot.

## Pagination

List endpoints take `page` (default 1) and `per_page` (default 20, max 100).
        "#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers((url = "http://localhost:8080", description = "Local development")),
    modifiers(&BearerAuth),
    tags(
        (name = "auth", description = "Login and current account"),
        (name = "users", description = "Account management (admin)"),
        (name = "pangkalans", description = "Pangkalan master data"),
        (name = "consumers", description = "End consumers of a pangkalan"),
        (name = "lpg-products", description = "Cylinder products and prices"),
        (name = "stock", description = "Stock movements and levels"),
        (name = "orders", description = "Agent to pangkalan orders"),
        (name = "payments", description = "Order payment balances"),
        (name = "invoices", description = "Invoices issued for orders"),
        (name = "consumer-orders", description = "Pangkalan sales to consumers"),
        (name = "penyaluran", description = "Daily actual distribution"),
        (name = "perencanaan", description = "Daily planned distribution"),
        (name = "reports", description = "Sales, stock and payment reports"),
        (name = "notifications", description = "Activity feed and stock alerts"),
        (name = "health", description = "Health check endpoints")
    ),
    paths(
        handlers::health::health_check,
        handlers::health::status,

        handlers::auth::login,
        handlers::auth::me,

        handlers::users::list_users,
        handlers::users::get_user,
        handlers::users::create_user,
        handlers::users::update_user,
        handlers::users::delete_user,

        handlers::pangkalans::list_pangkalans,
        handlers::pangkalans::get_pangkalan,
        handlers::pangkalans::create_pangkalan,
        handlers::pangkalans::update_pangkalan,
        handlers::pangkalans::delete_pangkalan,

        handlers::consumers::list_consumers,
        handlers::consumers::get_consumer,
        handlers::consumers::create_consumer,
        handlers::consumers::update_consumer,
        handlers::consumers::delete_consumer,

        handlers::lpg_products::list_products,
        handlers::lpg_products::get_product,
        handlers::lpg_products::create_product,
        handlers::lpg_products::update_product,
        handlers::lpg_products::delete_product,
        handlers::lpg_products::get_price,

        handlers::stock::stock_levels,
        handlers::stock::list_movements,
        handlers::stock::record_movement,

        handlers::orders::list_orders,
        handlers::orders::get_order,
        handlers::orders::create_order,
        handlers::orders::update_order,
        handlers::orders::update_order_status,
        handlers::orders::delete_order,

        handlers::payments::list_payments,
        handlers::payments::get_order_payment,
        handlers::payments::record_payment,

        handlers::invoices::list_invoices,
        handlers::invoices::get_invoice,
        handlers::invoices::generate_invoice,

        handlers::consumer_orders::list_consumer_orders,
        handlers::consumer_orders::consumer_sales_summary,
        handlers::consumer_orders::get_consumer_order,
        handlers::consumer_orders::create_consumer_order,
        handlers::consumer_orders::update_consumer_order,
        handlers::consumer_orders::delete_consumer_order,

        handlers::distribution::penyaluran::list,
        handlers::distribution::penyaluran::upsert,
        handlers::distribution::penyaluran::bulk_upsert,
        handlers::distribution::penyaluran::delete,
        handlers::distribution::penyaluran::rekapitulasi,
        handlers::distribution::perencanaan::list,
        handlers::distribution::perencanaan::upsert,
        handlers::distribution::perencanaan::bulk_upsert,
        handlers::distribution::perencanaan::delete,
        handlers::distribution::perencanaan::rekapitulasi,
        handlers::distribution::perencanaan::realisasi,

        handlers::reports::sales_report,
        handlers::reports::stock_report,
        handlers::reports::payment_report,
        handlers::reports::dashboard,

        handlers::notifications::list_notifications,
    ),
    components(
        schemas(
            crate::errors::ErrorResponse,
            crate::ResponseMeta,
            crate::entities::UserRole,
            crate::entities::LpgType,
            crate::entities::OrderStatus,
            crate::entities::PaymentStatus,
            crate::entities::InvoiceStatus,
            crate::entities::Kondisi,
            crate::entities::MovementType,
            crate::entities::ConsumerType,
            crate::entities::ActivityType,
        )
    )
)]
pub struct ApiDocV1;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_routes_and_bearer_scheme() {
        let json = ApiDocV1::openapi().to_pretty_json().unwrap();
        assert!(json.contains("LPG Agent API"));
        assert!(json.contains("/api/v1/orders/{id}/status"));
        assert!(json.contains("/api/v1/penyaluran/rekapitulasi"));
        assert!(json.contains("/api/v1/perencanaan/realisasi"));
        assert!(json.contains("\"Bearer\""));
    }
}
