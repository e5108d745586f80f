mod common;

use axum::http::{Method, StatusCode};
use lpg_api::entities::LpgType;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use common::{dec, TestApp};

async fn place_order(app: &TestApp, quantity: i32) -> Value {
    let (status, body) = app
        .as_depot(
            Method::POST,
            "/api/v1/orders",
            Some(json!({
                "items": [{ "lpg_type": "KG3", "quantity": quantity }],
                "notes": "Kiriman minggu ini"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"].clone()
}

async fn set_status(app: &TestApp, order_id: &str, status: &str) -> (StatusCode, Value) {
    app.as_admin(
        Method::PUT,
        &format!("/api/v1/orders/{order_id}/status"),
        Some(json!({ "status": status })),
    )
    .await
}

#[tokio::test]
async fn order_uses_product_price_and_opens_unpaid_balance() {
    let app = TestApp::new().await;
    app.create_product(LpgType::Kg3, 16_000).await;

    let detail = place_order(&app, 10).await;

    let number = detail["order"]["order_number"].as_str().unwrap();
    assert!(number.starts_with("ORD-"));
    assert_eq!(number.len(), "ORD-20240101-ABC123".len());
    assert_eq!(detail["order"]["status"], "PENDING");
    assert_eq!(detail["order"]["pangkalan_id"], app.depot.id.to_string());
    assert_eq!(dec(&detail["order"]["total_amount"]), Decimal::from(160_000));
    assert_eq!(dec(&detail["items"][0]["unit_price"]), Decimal::from(16_000));
    assert_eq!(detail["payment"]["status"], "UNPAID");
    assert_eq!(dec(&detail["payment"]["amount_paid"]), Decimal::ZERO);
}

#[tokio::test]
async fn order_without_items_is_rejected() {
    let app = TestApp::new().await;

    let (status, _) = app
        .as_depot(Method::POST, "/api/v1/orders", Some(json!({ "items": [] })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn item_without_price_or_product_is_rejected() {
    let app = TestApp::new().await;

    let (status, _) = app
        .as_depot(
            Method::POST,
            "/api/v1/orders",
            Some(json!({ "items": [{ "lpg_type": "KG12", "quantity": 1 }] })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn status_flow_books_stock_on_delivery() {
    let app = TestApp::new().await;
    let product = app.create_product(LpgType::Kg3, 16_000).await;
    app.stock_in(&product, 100).await;

    let detail = place_order(&app, 30).await;
    let id = detail["order"]["id"].as_str().unwrap().to_string();

    // Skipping PROCESSING is not allowed
    let (status, _) = set_status(&app, &id, "DELIVERED").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = set_status(&app, &id, "PROCESSING").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["order"]["status"], "PROCESSING");

    let (status, body) = set_status(&app, &id, "DELIVERED").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["order"]["status"], "DELIVERED");

    let (_, body) = app.as_admin(Method::GET, "/api/v1/stock", None).await;
    let level = &body["data"][0];
    assert_eq!(level["total_in"], 100);
    assert_eq!(level["total_out"], 30);
    assert_eq!(level["current"], 70);

    // Delivered is final
    let (status, _) = set_status(&app, &id, "CANCELLED").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Only PENDING or CANCELLED orders can be deleted
    let (status, _) = app
        .as_admin(Method::DELETE, &format!("/api/v1/orders/{id}"), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delivery_beyond_stock_is_unprocessable_and_rolled_back() {
    let app = TestApp::new().await;
    let product = app.create_product(LpgType::Kg3, 16_000).await;
    app.stock_in(&product, 5).await;

    let detail = place_order(&app, 6).await;
    let id = detail["order"]["id"].as_str().unwrap().to_string();
    let (status, _) = set_status(&app, &id, "PROCESSING").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = set_status(&app, &id, "DELIVERED").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Unprocessable Entity");

    let (_, body) = app
        .as_depot(Method::GET, &format!("/api/v1/orders/{id}"), None)
        .await;
    assert_eq!(body["data"]["order"]["status"], "PROCESSING");

    let (_, body) = app.as_admin(Method::GET, "/api/v1/stock", None).await;
    assert_eq!(body["data"][0]["current"], 5);
}

#[tokio::test]
async fn manual_stock_out_beyond_balance_is_unprocessable() {
    let app = TestApp::new().await;
    let product = app.create_product(LpgType::Kg12, 190_000).await;
    app.stock_in(&product, 3).await;

    let (status, _) = app
        .as_admin(
            Method::POST,
            "/api/v1/stock/movements",
            Some(json!({
                "product_id": product.id,
                "movement_type": "OUT",
                "quantity": 4
            })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = app
        .as_admin(Method::GET, "/api/v1/stock/movements?movement_type=IN", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["pagination"]["total"], 1);
}

#[tokio::test]
async fn payments_accumulate_until_paid() {
    let app = TestApp::new().await;
    app.create_product(LpgType::Kg3, 16_000).await;
    let detail = place_order(&app, 10).await;
    let id = detail["order"]["id"].as_str().unwrap().to_string();
    let uri = format!("/api/v1/orders/{id}/payments");

    let (status, body) = app
        .as_admin(Method::POST, &uri, Some(json!({ "amount": 60000 })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "PARTIAL");
    assert_eq!(dec(&body["data"]["amount_paid"]), Decimal::from(60_000));

    let (status, body) = app
        .as_admin(Method::POST, &uri, Some(json!({ "amount": "100000" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "PAID");
    assert_eq!(dec(&body["data"]["amount_paid"]), Decimal::from(160_000));

    let (status, body) = app
        .as_depot(Method::GET, &format!("/api/v1/orders/{id}/payment"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "PAID");

    let (status, _) = app
        .as_admin(Method::POST, &uri, Some(json!({ "amount": 0 })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn payment_for_missing_order_is_not_found() {
    let app = TestApp::new().await;

    let (status, _) = app
        .as_admin(
            Method::POST,
            &format!("/api/v1/orders/{}/payments", uuid::Uuid::new_v4()),
            Some(json!({ "amount": 1000 })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invoice_is_issued_once_per_order() {
    let app = TestApp::new().await;
    app.create_product(LpgType::Kg3, 16_000).await;
    let detail = place_order(&app, 10).await;
    let id = detail["order"]["id"].as_str().unwrap().to_string();
    let uri = format!("/api/v1/orders/{id}/invoice");

    let (status, first) = app
        .as_admin(Method::POST, &uri, Some(json!({ "tax_rate": "0.11" })))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let number = first["data"]["invoice_number"].as_str().unwrap();
    assert!(number.starts_with("INV-"));
    assert_eq!(dec(&first["data"]["sub_total"]), Decimal::from(160_000));
    assert_eq!(dec(&first["data"]["tax_amount"]), Decimal::from(17_600));
    assert_eq!(dec(&first["data"]["total_amount"]), Decimal::from(177_600));

    let (status, second) = app.as_admin(Method::POST, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["data"]["id"], first["data"]["id"]);

    let (status, body) = app.as_depot(Method::GET, "/api/v1/invoices", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["pagination"]["total"], 1);
}

#[tokio::test]
async fn deleted_order_disappears() {
    let app = TestApp::new().await;
    app.create_product(LpgType::Kg3, 16_000).await;
    let detail = place_order(&app, 2).await;
    let id = detail["order"]["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .as_admin(Method::DELETE, &format!("/api/v1/orders/{id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .as_admin(Method::GET, &format!("/api/v1/orders/{id}"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .as_admin(Method::GET, &format!("/api/v1/orders/{id}/payment"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn pangkalan_user_only_sees_own_orders() {
    let app = TestApp::new().await;
    app.create_product(LpgType::Kg3, 16_000).await;
    let other = app.create_pangkalan("PKL-002", 100).await;

    place_order(&app, 1).await;
    let (status, body) = app
        .as_admin(
            Method::POST,
            "/api/v1/orders",
            Some(json!({
                "pangkalan_id": other.id,
                "items": [{ "lpg_type": "KG3", "quantity": 4, "unit_price": 15500 }]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let foreign = body["data"]["order"]["id"].as_str().unwrap().to_string();

    let (_, body) = app.as_depot(Method::GET, "/api/v1/orders", None).await;
    assert_eq!(body["data"]["pagination"]["total"], 1);

    let (_, body) = app.as_admin(Method::GET, "/api/v1/orders", None).await;
    assert_eq!(body["data"]["pagination"]["total"], 2);

    let (status, _) = app
        .as_depot(Method::GET, &format!("/api/v1/orders/{foreign}"), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Order status is admin-only
    let (status, _) = app
        .as_depot(
            Method::PUT,
            &format!("/api/v1/orders/{foreign}/status"),
            Some(json!({ "status": "PROCESSING" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
