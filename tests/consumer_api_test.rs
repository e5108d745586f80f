mod common;

use axum::http::{Method, StatusCode};
use lpg_api::entities::LpgType;
use rust_decimal::Decimal;
use serde_json::json;

use common::{dec, id_of, TestApp};

#[tokio::test]
async fn consumer_update_and_delete() {
    let app = TestApp::new().await;
    let other = app.create_pangkalan("PKL-002", 100).await;

    let (status, body) = app
        .as_depot(
            Method::POST,
            "/api/v1/consumers",
            Some(json!({ "name": "Ibu Sari", "consumer_type": "RUMAH_TANGGA" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let id = id_of(&body);

    let (status, body) = app
        .as_depot(
            Method::PUT,
            &format!("/api/v1/consumers/{id}"),
            Some(json!({
                "name": "Warung Ibu Sari",
                "consumer_type": "USAHA_MIKRO",
                "is_active": false
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Warung Ibu Sari");
    assert_eq!(body["data"]["consumer_type"], "USAHA_MIKRO");
    assert_eq!(body["data"]["is_active"], false);

    let (status, body) = app
        .as_admin(
            Method::POST,
            "/api/v1/consumers",
            Some(json!({
                "pangkalan_id": other.id,
                "name": "Pak Joko",
                "consumer_type": "RUMAH_TANGGA"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let foreign = id_of(&body);

    let (status, _) = app
        .as_depot(
            Method::PUT,
            &format!("/api/v1/consumers/{foreign}"),
            Some(json!({ "name": "Diambil alih" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app
        .as_depot(Method::DELETE, &format!("/api/v1/consumers/{foreign}"), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .as_depot(Method::DELETE, &format!("/api/v1/consumers/{id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["deleted"], true);

    let (status, _) = app
        .as_depot(Method::GET, &format!("/api/v1/consumers/{id}"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn consumer_sale_update_recomputes_total() {
    let app = TestApp::new().await;
    app.create_product(LpgType::Kg3, 16_000).await;
    app.create_product(LpgType::Kg12, 190_000).await;

    let (status, body) = app
        .as_depot(
            Method::POST,
            "/api/v1/consumer-orders",
            Some(json!({ "quantity": 3, "sale_date": "2024-02-10" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let id = id_of(&body);
    let uri = format!("/api/v1/consumer-orders/{id}");
    assert_eq!(dec(&body["data"]["total_amount"]), Decimal::from(48_000));

    // Quantity only: the stored price is kept
    let (status, body) = app
        .as_depot(Method::PUT, &uri, Some(json!({ "quantity": 5 })))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(dec(&body["data"]["price_per_unit"]), Decimal::from(16_000));
    assert_eq!(dec(&body["data"]["total_amount"]), Decimal::from(80_000));

    let (_, body) = app
        .as_depot(Method::PUT, &uri, Some(json!({ "price_per_unit": 17000 })))
        .await;
    assert_eq!(dec(&body["data"]["total_amount"]), Decimal::from(85_000));

    // New size without a price takes that size's default price
    let (status, body) = app
        .as_depot(Method::PUT, &uri, Some(json!({ "lpg_type": "KG12" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["lpg_type"], "KG12");
    assert_eq!(dec(&body["data"]["price_per_unit"]), Decimal::from(190_000));
    assert_eq!(dec(&body["data"]["total_amount"]), Decimal::from(950_000));
    assert_eq!(body["data"]["sale_date"], "2024-02-10");

    let (status, _) = app
        .as_depot(
            Method::PUT,
            &uri,
            Some(json!({ "price_per_unit": "79228162514264337593543950335" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.as_depot(Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.as_depot(Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn oversized_amounts_are_rejected_without_overflow() {
    let app = TestApp::new().await;
    app.create_product(LpgType::Kg3, 16_000).await;

    let (status, _) = app
        .as_depot(
            Method::POST,
            "/api/v1/orders",
            Some(json!({
                "items": [{
                    "lpg_type": "KG3",
                    "quantity": 2,
                    "unit_price": "79228162514264337593543950335"
                }]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .as_depot(
            Method::POST,
            "/api/v1/orders",
            Some(json!({ "items": [{ "lpg_type": "KG3", "quantity": 1 }] })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let order_id = body["data"]["order"]["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .as_admin(
            Method::POST,
            &format!("/api/v1/orders/{order_id}/payments"),
            Some(json!({ "amount": "79228162514264337593543950335" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
