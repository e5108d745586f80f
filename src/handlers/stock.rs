use super::common::{created, PaginatedResponse, PaginationParams};
use crate::{
    auth::AuthUser,
    entities::stock_history,
    errors::ServiceError,
    services::stock::{MovementFilter, RecordMovementRequest, StockLevel},
    ApiResponse, ApiResult, AppState,
};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};

#[utoipa::path(
    get,
    path = "/api/v1/stock",
    summary = "Current stock per product",
    responses(
        (status = 200, description = "Stock levels", body = ApiResponse<Vec<StockLevel>>),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "stock"
)]
pub async fn stock_levels(State(state): State<AppState>) -> ApiResult<Vec<StockLevel>> {
    Ok(Json(ApiResponse::success(
        state.services.stock.stock_levels().await?,
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/stock/movements",
    summary = "Stock movement history",
    params(PaginationParams, MovementFilter),
    responses(
        (status = 200, description = "Movements", body = ApiResponse<PaginatedResponse<stock_history::Model>>),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "stock"
)]
pub async fn list_movements(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
    Query(filter): Query<MovementFilter>,
) -> ApiResult<PaginatedResponse<stock_history::Model>> {
    let (page, per_page) = pagination.normalized();
    let (items, total) = state
        .services
        .stock
        .list_movements(&filter, page, per_page)
        .await?;
    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        items, page, per_page, total,
    ))))
}

#[utoipa::path(
    post,
    path = "/api/v1/stock/movements",
    summary = "Record stock in or out",
    request_body = RecordMovementRequest,
    responses(
        (status = 201, description = "Movement recorded", body = ApiResponse<stock_history::Model>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Unknown product", body = crate::errors::ErrorResponse),
        (status = 422, description = "Insufficient stock", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "stock"
)]
pub async fn record_movement(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(request): Json<RecordMovementRequest>,
) -> Result<(StatusCode, Json<ApiResponse<stock_history::Model>>), ServiceError> {
    let movement = state
        .services
        .stock
        .record_movement(request, Some(auth_user.user_id))
        .await?;
    Ok(created(movement))
}
