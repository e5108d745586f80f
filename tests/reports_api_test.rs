mod common;

use axum::http::{Method, StatusCode};
use lpg_api::entities::LpgType;
use rust_decimal::Decimal;
use serde_json::json;

use common::{dec, id_of, TestApp};

/// One order paid in part and one cancelled order, both for the depot.
async fn seed_orders(app: &TestApp) {
    let mut ids = Vec::new();
    for quantity in [10, 5] {
        let (status, body) = app
            .as_depot(
                Method::POST,
                "/api/v1/orders",
                Some(json!({ "items": [{ "lpg_type": "KG3", "quantity": quantity }] })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        ids.push(body["data"]["order"]["id"].as_str().unwrap().to_string());
    }

    let (status, _) = app
        .as_admin(
            Method::POST,
            &format!("/api/v1/orders/{}/payments", ids[0]),
            Some(json!({ "amount": 60000 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .as_admin(
            Method::PUT,
            &format!("/api/v1/orders/{}/status", ids[1]),
            Some(json!({ "status": "CANCELLED" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn sales_report_skips_cancelled_orders() {
    let app = TestApp::new().await;
    app.create_product(LpgType::Kg3, 16_000).await;
    seed_orders(&app).await;

    let (status, body) = app.as_admin(Method::GET, "/api/v1/reports/sales", None).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let report = &body["data"];
    assert_eq!(report["total_orders"], 1);
    assert_eq!(report["total_tabung"], 10);
    assert_eq!(dec(&report["total_revenue"]), Decimal::from(160_000));
    assert_eq!(report["rows"][0]["code"], "PKL-001");
    assert_eq!(report["rows"][0]["tabung"]["KG3"], 10);
}

#[tokio::test]
async fn reversed_range_is_a_bad_request() {
    let app = TestApp::new().await;

    let (status, _) = app
        .as_admin(
            Method::GET,
            "/api/v1/reports/sales?start_date=2024-03-01&end_date=2024-02-01",
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn payment_report_lists_outstanding_balances() {
    let app = TestApp::new().await;
    app.create_product(LpgType::Kg3, 16_000).await;
    seed_orders(&app).await;

    let (status, body) = app
        .as_admin(Method::GET, "/api/v1/reports/payments", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let report = &body["data"];
    assert_eq!(report["rows"].as_array().unwrap().len(), 1);
    assert_eq!(report["rows"][0]["unpaid_orders"], 1);
    assert_eq!(dec(&report["rows"][0]["amount_paid"]), Decimal::from(60_000));
    assert_eq!(dec(&report["total_outstanding"]), Decimal::from(100_000));
}

#[tokio::test]
async fn dashboard_summarises_today() {
    let app = TestApp::new().await;
    let product = app.create_product(LpgType::Kg3, 16_000).await;
    app.stock_in(&product, 200).await;
    seed_orders(&app).await;

    let (status, body) = app
        .as_admin(Method::GET, "/api/v1/reports/dashboard", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let dashboard = &body["data"];
    assert_eq!(dashboard["active_pangkalans"], 1);
    assert_eq!(dashboard["orders_today"], 2);
    assert_eq!(dashboard["pending_orders"], 1);
    assert_eq!(dec(&dashboard["revenue_this_month"]), Decimal::from(160_000));
    assert_eq!(dashboard["stock"][0]["current"], 200);
}

#[tokio::test]
async fn stock_report_groups_movements_by_day() {
    let app = TestApp::new().await;
    let product = app.create_product(LpgType::Kg12, 190_000).await;
    app.stock_in(&product, 8).await;
    app.stock_in(&product, 4).await;

    let (status, body) = app.as_admin(Method::GET, "/api/v1/reports/stock", None).await;
    assert_eq!(status, StatusCode::OK);
    let entry = &body["data"]["products"][0];
    assert_eq!(entry["lpg_type"], "KG12");
    assert_eq!(entry["days"].as_array().unwrap().len(), 1);
    assert_eq!(entry["total_in"], 12);
    assert_eq!(entry["total_out"], 0);
}

#[tokio::test]
async fn critical_stock_comes_first_in_notifications() {
    let app = TestApp::new().await;
    let product = app.create_product(LpgType::Kg3, 16_000).await;
    app.stock_in(&product, 5).await;

    let (status, body) = app
        .as_admin(Method::GET, "/api/v1/notifications", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let all = body["data"].as_array().unwrap();
    assert!(all.len() >= 2);
    assert_eq!(all[0]["kind"], "STOCK_ALERT");
    assert_eq!(all[0]["priority"], "CRITICAL");
    assert!(all
        .iter()
        .any(|n| n["activity_type"] == "STOCK_IN"));

    let (_, body) = app
        .as_admin(Method::GET, "/api/v1/notifications?limit=1", None)
        .await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn consumer_sales_are_scoped_and_summarised() {
    let app = TestApp::new().await;
    app.create_product(LpgType::Kg3, 16_000).await;
    let other = app.create_pangkalan("PKL-002", 100).await;

    let (status, body) = app
        .as_depot(
            Method::POST,
            "/api/v1/consumer-orders",
            Some(json!({ "quantity": 3, "sale_date": "2024-02-10" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(dec(&body["data"]["total_amount"]), Decimal::from(48_000));

    let (status, body) = app
        .as_admin(
            Method::POST,
            "/api/v1/consumer-orders",
            Some(json!({
                "pangkalan_id": other.id,
                "lpg_type": "KG3",
                "quantity": 2,
                "price_per_unit": 18000
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let foreign = id_of(&body);

    let (status, body) = app
        .as_depot(Method::GET, "/api/v1/consumer-orders/summary", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_tabung"], 3);

    let (_, body) = app
        .as_admin(Method::GET, "/api/v1/consumer-orders/summary", None)
        .await;
    assert_eq!(body["data"]["total_tabung"], 5);
    assert_eq!(dec(&body["data"]["total_revenue"]), Decimal::from(84_000));
    assert_eq!(body["data"]["lines"][0]["transactions"], 2);

    let (status, _) = app
        .as_depot(Method::GET, &format!("/api/v1/consumer-orders/{foreign}"), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn consumer_from_another_pangkalan_is_rejected() {
    let app = TestApp::new().await;
    app.create_product(LpgType::Kg3, 16_000).await;
    let other = app.create_pangkalan("PKL-002", 100).await;

    let (status, body) = app
        .as_admin(
            Method::POST,
            "/api/v1/consumers",
            Some(json!({
                "pangkalan_id": other.id,
                "name": "Warung Bu Tini",
                "consumer_type": "USAHA_MIKRO"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let consumer_id = id_of(&body);

    let (status, _) = app
        .as_depot(
            Method::POST,
            "/api/v1/consumer-orders",
            Some(json!({ "consumer_id": consumer_id, "quantity": 1 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
