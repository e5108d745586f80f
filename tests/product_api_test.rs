mod common;

use axum::http::{Method, StatusCode};
use rust_decimal::Decimal;
use serde_json::json;

use common::{dec, id_of, TestApp};

#[tokio::test]
async fn product_crud_and_unique_cylinder_size() {
    let app = TestApp::new().await;

    let (status, body) = app
        .as_admin(
            Method::POST,
            "/api/v1/lpg-products",
            Some(json!({
                "name": "Elpiji 12 kg",
                "lpg_type": "KG12",
                "selling_price": 190000,
                "cost_price": "185000"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let id = id_of(&body);
    assert_eq!(body["data"]["is_active"], true);
    assert_eq!(dec(&body["data"]["selling_price"]), Decimal::from(190_000));

    let (status, body) = app
        .as_admin(
            Method::POST,
            "/api/v1/lpg-products",
            Some(json!({
                "name": "Elpiji 12 kg kedua",
                "lpg_type": "KG12",
                "selling_price": 195000,
                "cost_price": 185000
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["message"].as_str().unwrap().contains("KG12"));

    let (status, body) = app
        .as_admin(
            Method::PUT,
            &format!("/api/v1/lpg-products/{id}"),
            Some(json!({ "selling_price": 192500, "name": "Bright Gas 12 kg" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Bright Gas 12 kg");
    assert_eq!(dec(&body["data"]["selling_price"]), Decimal::from(192_500));
    assert_eq!(dec(&body["data"]["cost_price"]), Decimal::from(185_000));

    let (status, body) = app
        .as_depot(Method::GET, "/api/v1/lpg-products/price/KG12", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dec(&body["data"]["price"]), Decimal::from(192_500));

    let (status, _) = app
        .as_admin(Method::DELETE, &format!("/api/v1/lpg-products/{id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .as_admin(Method::GET, &format!("/api/v1/lpg-products/{id}"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .as_admin(
            Method::PUT,
            &format!("/api/v1/lpg-products/{id}"),
            Some(json!({ "selling_price": 1 })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .as_admin(Method::DELETE, &format!("/api/v1/lpg-products/{id}"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn product_writes_are_admin_only() {
    let app = TestApp::new().await;

    let (status, _) = app
        .as_depot(
            Method::POST,
            "/api/v1/lpg-products",
            Some(json!({
                "name": "Elpiji 3 kg",
                "lpg_type": "KG3",
                "selling_price": 16000,
                "cost_price": 14000
            })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn price_out_of_range_is_rejected() {
    let app = TestApp::new().await;

    for price in [json!(-1), json!("1000000000001")] {
        let (status, _) = app
            .as_admin(
                Method::POST,
                "/api/v1/lpg-products",
                Some(json!({
                    "name": "Elpiji 3 kg",
                    "lpg_type": "KG3",
                    "selling_price": price,
                    "cost_price": 14000
                })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn inactive_product_has_no_default_price() {
    let app = TestApp::new().await;
    let product = app.create_product(lpg_api::entities::LpgType::Kg3, 16_000).await;

    let (status, _) = app
        .as_admin(
            Method::PUT,
            &format!("/api/v1/lpg-products/{}", product.id),
            Some(json!({ "is_active": false })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .as_depot(Method::GET, "/api/v1/lpg-products/price/KG3", None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .as_depot(
            Method::POST,
            "/api/v1/orders",
            Some(json!({ "items": [{ "lpg_type": "KG3", "quantity": 1 }] })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // An explicit price still works
    let (status, _) = app
        .as_depot(
            Method::POST,
            "/api/v1/orders",
            Some(json!({ "items": [{ "lpg_type": "KG3", "quantity": 1, "unit_price": 16000 }] })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
}
