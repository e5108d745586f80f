mod common;

use axum::http::{Method, StatusCode};
use rstest::rstest;
use serde_json::json;

use common::{TestApp, ADMIN_EMAIL, DEPOT_EMAIL, PASSWORD};

#[tokio::test]
async fn login_returns_token_and_profile() {
    let app = TestApp::new().await;

    let (status, body) = app
        .request(
            Method::POST,
            "/api/v1/auth/login",
            Some(json!({ "email": DEPOT_EMAIL, "password": PASSWORD })),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["token_type"], "Bearer");
    assert_eq!(body["data"]["user"]["role"], "PANGKALAN");
    assert_eq!(
        body["data"]["user"]["pangkalan_id"],
        app.depot.id.to_string()
    );
    assert!(body["data"]["access_token"].as_str().is_some());
}

#[rstest]
#[case(ADMIN_EMAIL, "wrong-password")]
#[case("nobody@agen.test", PASSWORD)]
#[tokio::test]
async fn bad_credentials_are_rejected_alike(#[case] email: &str, #[case] password: &str) {
    let app = TestApp::new().await;

    let (status, body) = app
        .request(
            Method::POST,
            "/api/v1/auth/login",
            Some(json!({ "email": email, "password": password })),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid email or password");
}

#[rstest]
#[case(None)]
#[case(Some("not-a-jwt"))]
#[tokio::test]
async fn protected_routes_require_a_valid_token(#[case] token: Option<&str>) {
    let app = TestApp::new().await;

    let (status, body) = app.request(Method::GET, "/api/v1/orders", None, token).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn me_returns_the_caller() {
    let app = TestApp::new().await;

    let (status, body) = app.as_admin(Method::GET, "/api/v1/auth/me", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], ADMIN_EMAIL);
    assert_eq!(body["data"]["role"], "ADMIN");
}

#[rstest]
#[case(Method::GET, "/api/v1/users")]
#[case(Method::GET, "/api/v1/pangkalans")]
#[case(Method::GET, "/api/v1/reports/dashboard")]
#[case(Method::GET, "/api/v1/notifications")]
#[case(Method::GET, "/api/v1/payments")]
#[tokio::test]
async fn pangkalan_users_cannot_reach_admin_routes(#[case] method: Method, #[case] uri: &str) {
    let app = TestApp::new().await;

    let (status, _) = app.as_depot(method.clone(), uri, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.as_admin(method, uri, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn pangkalan_user_cannot_read_another_pangkalan() {
    let app = TestApp::new().await;
    let other = app.create_pangkalan("PKL-002", 100).await;

    let (status, _) = app
        .as_depot(Method::GET, &format!("/api/v1/pangkalans/{}", other.id), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .as_depot(Method::GET, &format!("/api/v1/pangkalans/{}", app.depot.id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["code"], "PKL-001");
}

#[tokio::test]
async fn health_and_status_are_public() {
    let app = TestApp::new().await;

    let (status, body) = app.request(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], "up");

    let (status, body) = app.request(Method::GET, "/status", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["environment"], "test");
}
