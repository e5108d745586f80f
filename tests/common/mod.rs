#![allow(dead_code)]

use std::{str::FromStr, sync::Arc};

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use lpg_api::{
    auth::LoginCredentials,
    config::AppConfig,
    db,
    entities::{lpg_product, pangkalan, LpgType, MovementType, UserRole},
    services::{
        lpg_products::CreateLpgProductRequest, pangkalans::CreatePangkalanRequest,
        stock::RecordMovementRequest, users::CreateUserRequest,
    },
    AppState,
};
use rust_decimal::Decimal;
use serde_json::Value;
use tower::ServiceExt;
use tower_http::cors::CorsLayer;

pub const ADMIN_EMAIL: &str = "admin@agen.test";
pub const DEPOT_EMAIL: &str = "depot@agen.test";
pub const PASSWORD: &str = "rahasia-123";

/// Application backed by a fresh in-memory SQLite database, with one admin,
/// one pangkalan and a user bound to that pangkalan.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    pub admin_token: String,
    pub depot_token: String,
    pub depot: pangkalan::Model,
}

impl TestApp {
    pub async fn new() -> Self {
        let mut cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "test_secret_key_for_testing_purposes_only_32chars".to_string(),
            3600,
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let state = AppState::new(Arc::new(pool), cfg);
        let router = lpg_api::build_router(state.clone(), CorsLayer::permissive());

        let depot = state
            .services
            .pangkalans
            .create(pangkalan_request("PKL-001", "Pangkalan Sumber Rejeki", 300))
            .await
            .expect("seed pangkalan");

        state
            .services
            .users
            .create(user_request(ADMIN_EMAIL, UserRole::Admin, None))
            .await
            .expect("seed admin");
        state
            .services
            .users
            .create(user_request(DEPOT_EMAIL, UserRole::Pangkalan, Some(depot.id)))
            .await
            .expect("seed pangkalan user");

        let admin_token = login(&state, ADMIN_EMAIL).await;
        let depot_token = login(&state, DEPOT_EMAIL).await;

        Self {
            router,
            state,
            admin_token,
            depot_token,
            depot,
        }
    }

    /// Sends a request with an optional bearer token and JSON body.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(tok) = token {
            builder = builder.header("authorization", format!("Bearer {}", tok));
        }

        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(serde_json::to_vec(&json).expect("serialize request body"))
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).expect("build request"))
            .await
            .expect("router error during test request");

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read response body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn as_admin(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let token = self.admin_token.clone();
        self.request(method, uri, body, Some(&token)).await
    }

    pub async fn as_depot(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let token = self.depot_token.clone();
        self.request(method, uri, body, Some(&token)).await
    }

    pub async fn create_pangkalan(&self, code: &str, alokasi: i32) -> pangkalan::Model {
        self.state
            .services
            .pangkalans
            .create(pangkalan_request(code, &format!("Pangkalan {code}"), alokasi))
            .await
            .expect("seed pangkalan")
    }

    pub async fn create_product(&self, lpg_type: LpgType, selling_price: i64) -> lpg_product::Model {
        self.state
            .services
            .lpg_products
            .create(CreateLpgProductRequest {
                name: format!("Elpiji {lpg_type}"),
                lpg_type,
                selling_price: Decimal::from(selling_price),
                cost_price: Decimal::from(selling_price - 2_000),
                is_active: Some(true),
            })
            .await
            .expect("seed product")
    }

    pub async fn stock_in(&self, product: &lpg_product::Model, quantity: i32) {
        self.state
            .services
            .stock
            .record_movement(
                RecordMovementRequest {
                    product_id: product.id,
                    movement_type: MovementType::In,
                    quantity,
                    note: Some("Penerimaan SPBE".to_string()),
                },
                None,
            )
            .await
            .expect("seed stock");
    }
}

fn pangkalan_request(code: &str, name: &str, alokasi: i32) -> CreatePangkalanRequest {
    CreatePangkalanRequest {
        code: code.to_string(),
        name: name.to_string(),
        address: "Jl. Merdeka No. 1".to_string(),
        region: "Kecamatan Utara".to_string(),
        pic_name: Some("Budi".to_string()),
        phone: Some("081200000000".to_string()),
        alokasi_bulanan: alokasi,
        is_active: Some(true),
    }
}

fn user_request(email: &str, role: UserRole, pangkalan_id: Option<uuid::Uuid>) -> CreateUserRequest {
    CreateUserRequest {
        email: email.to_string(),
        password: PASSWORD.to_string(),
        name: email.to_string(),
        role,
        pangkalan_id,
        is_active: Some(true),
    }
}

async fn login(state: &AppState, email: &str) -> String {
    state
        .auth
        .login(&LoginCredentials {
            email: email.to_string(),
            password: PASSWORD.to_string(),
        })
        .await
        .expect("login seeded user")
        .access_token
}

/// Decimal fields serialize as strings; accept numbers too.
pub fn dec(value: &Value) -> Decimal {
    match value {
        Value::String(s) => Decimal::from_str(s).expect("decimal string"),
        Value::Number(n) => Decimal::from_str(&n.to_string()).expect("decimal number"),
        other => panic!("expected a decimal, got {other}"),
    }
}

pub fn id_of(body: &Value) -> String {
    body["data"]["id"]
        .as_str()
        .expect("response data carries an id")
        .to_string()
}
