use super::common::{created, target_pangkalan, Deleted, PaginatedResponse, PaginationParams};
use crate::{
    auth::AuthUser,
    entities::order,
    errors::ServiceError,
    services::orders::{
        CreateOrderRequest, OrderDetail, OrderFilter, UpdateOrderRequest, UpdateOrderStatusRequest,
    },
    ApiResponse, ApiResult, AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/api/v1/orders",
    summary = "List orders",
    description = "Pangkalan users only see their own orders",
    params(PaginationParams, OrderFilter),
    responses(
        (status = 200, description = "Orders", body = ApiResponse<PaginatedResponse<order::Model>>),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 403, description = "Another pangkalan", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(pagination): Query<PaginationParams>,
    Query(mut filter): Query<OrderFilter>,
) -> ApiResult<PaginatedResponse<order::Model>> {
    filter.pangkalan_id = auth_user.scope_pangkalan(filter.pangkalan_id)?;
    let (page, per_page) = pagination.normalized();
    let (orders, total) = state.services.orders.list(&filter, page, per_page).await?;
    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        orders, page, per_page, total,
    ))))
}

#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}",
    summary = "Get order with items",
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order", body = ApiResponse<OrderDetail>),
        (status = 403, description = "Another pangkalan", body = crate::errors::ErrorResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<OrderDetail> {
    let detail = state.services.orders.get(id).await?;
    auth_user.ensure_pangkalan_access(detail.order.pangkalan_id)?;
    Ok(Json(ApiResponse::success(detail)))
}

#[utoipa::path(
    post,
    path = "/api/v1/orders",
    summary = "Create order",
    description = "Items without a unit price use the product's selling price",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = ApiResponse<OrderDetail>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 403, description = "Another pangkalan", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "orders"
)]
pub async fn create_order(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(request): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<ApiResponse<OrderDetail>>), ServiceError> {
    let pangkalan_id = target_pangkalan(&auth_user, request.pangkalan_id)?;
    let detail = state
        .services
        .orders
        .create(pangkalan_id, request, Some(auth_user.user_id))
        .await?;
    Ok(created(detail))
}

#[utoipa::path(
    put,
    path = "/api/v1/orders/{id}",
    summary = "Update order",
    params(("id" = Uuid, Path, description = "Order id")),
    request_body = UpdateOrderRequest,
    responses(
        (status = 200, description = "Order updated", body = ApiResponse<OrderDetail>),
        (status = 400, description = "Invalid status change", body = crate::errors::ErrorResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "orders"
)]
pub async fn update_order(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateOrderRequest>,
) -> ApiResult<OrderDetail> {
    let detail = state
        .services
        .orders
        .update(id, request, Some(auth_user.user_id))
        .await?;
    Ok(Json(ApiResponse::success(detail)))
}

#[utoipa::path(
    put,
    path = "/api/v1/orders/{id}/status",
    summary = "Change order status",
    description = "PENDING -> PROCESSING -> DELIVERED, or PENDING/PROCESSING -> CANCELLED. Delivery takes the items out of stock.",
    params(("id" = Uuid, Path, description = "Order id")),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = ApiResponse<OrderDetail>),
        (status = 400, description = "Transition not allowed", body = crate::errors::ErrorResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
        (status = 422, description = "Insufficient stock for delivery", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "orders"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateOrderStatusRequest>,
) -> ApiResult<OrderDetail> {
    let detail = state
        .services
        .orders
        .update_status(id, request.status, Some(auth_user.user_id))
        .await?;
    info!(order_id = %id, status = %request.status, "order status changed");
    Ok(Json(ApiResponse::success(detail)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/orders/{id}",
    summary = "Delete order",
    description = "Only PENDING or CANCELLED orders can be deleted",
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order deleted", body = ApiResponse<Deleted>),
        (status = 400, description = "Order already in progress", body = crate::errors::ErrorResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "orders"
)]
pub async fn delete_order(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Deleted> {
    state.services.orders.delete(id).await?;
    Ok(Json(ApiResponse::success(Deleted::new(id))))
}
