use super::common::{created, Deleted};
use crate::{
    entities::{lpg_product, LpgType},
    errors::ServiceError,
    services::lpg_products::{CreateLpgProductRequest, UpdateLpgProductRequest},
    ApiResponse, ApiResult, AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Default unit price for one cylinder size
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PriceQuote {
    pub lpg_type: LpgType,
    pub price: Decimal,
}

#[utoipa::path(
    get,
    path = "/api/v1/lpg-products",
    summary = "List LPG products and prices",
    responses(
        (status = 200, description = "Products", body = ApiResponse<Vec<lpg_product::Model>>),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "lpg-products"
)]
pub async fn list_products(State(state): State<AppState>) -> ApiResult<Vec<lpg_product::Model>> {
    Ok(Json(ApiResponse::success(
        state.services.lpg_products.list().await?,
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/lpg-products/{id}",
    summary = "Get LPG product",
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product", body = ApiResponse<lpg_product::Model>),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "lpg-products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<lpg_product::Model> {
    Ok(Json(ApiResponse::success(
        state.services.lpg_products.get(id).await?,
    )))
}

#[utoipa::path(
    post,
    path = "/api/v1/lpg-products",
    summary = "Create LPG product",
    request_body = CreateLpgProductRequest,
    responses(
        (status = 201, description = "Product created", body = ApiResponse<lpg_product::Model>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 409, description = "Cylinder size already priced", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "lpg-products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    Json(request): Json<CreateLpgProductRequest>,
) -> Result<(StatusCode, Json<ApiResponse<lpg_product::Model>>), ServiceError> {
    Ok(created(state.services.lpg_products.create(request).await?))
}

#[utoipa::path(
    put,
    path = "/api/v1/lpg-products/{id}",
    summary = "Update LPG product",
    params(("id" = Uuid, Path, description = "Product id")),
    request_body = UpdateLpgProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ApiResponse<lpg_product::Model>),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "lpg-products"
)]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateLpgProductRequest>,
) -> ApiResult<lpg_product::Model> {
    Ok(Json(ApiResponse::success(
        state.services.lpg_products.update(id, request).await?,
    )))
}

#[utoipa::path(
    delete,
    path = "/api/v1/lpg-products/{id}",
    summary = "Delete LPG product",
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product deleted", body = ApiResponse<Deleted>),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "lpg-products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Deleted> {
    state.services.lpg_products.delete(id).await?;
    Ok(Json(ApiResponse::success(Deleted::new(id))))
}

#[utoipa::path(
    get,
    path = "/api/v1/lpg-products/price/{lpg_type}",
    summary = "Default price of a cylinder size",
    params(("lpg_type" = LpgType, Path, description = "KG3, KG5, KG12 or KG50")),
    responses(
        (status = 200, description = "Price", body = ApiResponse<PriceQuote>),
        (status = 400, description = "No product for this size", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "lpg-products"
)]
pub async fn get_price(
    State(state): State<AppState>,
    Path(lpg_type): Path<LpgType>,
) -> ApiResult<PriceQuote> {
    let price = state.services.lpg_products.price_for(lpg_type).await?;
    Ok(Json(ApiResponse::success(PriceQuote { lpg_type, price })))
}
