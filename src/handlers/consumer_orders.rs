use super::common::{created, target_pangkalan, Deleted, PaginatedResponse, PaginationParams};
use crate::{
    auth::AuthUser,
    entities::consumer_order,
    errors::ServiceError,
    services::consumer_orders::{
        ConsumerOrderFilter, ConsumerSalesSummary, CreateConsumerOrderRequest,
        UpdateConsumerOrderRequest,
    },
    ApiResponse, ApiResult, AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

async fn load_owned(
    state: &AppState,
    auth_user: &AuthUser,
    id: Uuid,
) -> Result<consumer_order::Model, ServiceError> {
    let found = state.services.consumer_orders.get(id).await?;
    auth_user.ensure_pangkalan_access(found.pangkalan_id)?;
    Ok(found)
}

#[utoipa::path(
    get,
    path = "/api/v1/consumer-orders",
    summary = "List consumer sales",
    params(PaginationParams, ConsumerOrderFilter),
    responses(
        (status = 200, description = "Consumer sales", body = ApiResponse<PaginatedResponse<consumer_order::Model>>),
        (status = 403, description = "Another pangkalan", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "consumer-orders"
)]
pub async fn list_consumer_orders(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(pagination): Query<PaginationParams>,
    Query(mut filter): Query<ConsumerOrderFilter>,
) -> ApiResult<PaginatedResponse<consumer_order::Model>> {
    filter.pangkalan_id = auth_user.scope_pangkalan(filter.pangkalan_id)?;
    let (page, per_page) = pagination.normalized();
    let (items, total) = state
        .services
        .consumer_orders
        .list(&filter, page, per_page)
        .await?;
    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        items, page, per_page, total,
    ))))
}

#[utoipa::path(
    get,
    path = "/api/v1/consumer-orders/summary",
    summary = "Consumer sales per cylinder size",
    params(ConsumerOrderFilter),
    responses(
        (status = 200, description = "Summary", body = ApiResponse<ConsumerSalesSummary>),
        (status = 403, description = "Another pangkalan", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "consumer-orders"
)]
pub async fn consumer_sales_summary(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(mut filter): Query<ConsumerOrderFilter>,
) -> ApiResult<ConsumerSalesSummary> {
    filter.pangkalan_id = auth_user.scope_pangkalan(filter.pangkalan_id)?;
    Ok(Json(ApiResponse::success(
        state.services.consumer_orders.summary(&filter).await?,
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/consumer-orders/{id}",
    summary = "Get consumer sale",
    params(("id" = Uuid, Path, description = "Consumer order id")),
    responses(
        (status = 200, description = "Consumer sale", body = ApiResponse<consumer_order::Model>),
        (status = 403, description = "Another pangkalan", body = crate::errors::ErrorResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "consumer-orders"
)]
pub async fn get_consumer_order(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<consumer_order::Model> {
    Ok(Json(ApiResponse::success(
        load_owned(&state, &auth_user, id).await?,
    )))
}

#[utoipa::path(
    post,
    path = "/api/v1/consumer-orders",
    summary = "Record a consumer sale",
    description = "Price defaults to the product's selling price",
    request_body = CreateConsumerOrderRequest,
    responses(
        (status = 201, description = "Sale recorded", body = ApiResponse<consumer_order::Model>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 403, description = "Another pangkalan", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "consumer-orders"
)]
pub async fn create_consumer_order(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(request): Json<CreateConsumerOrderRequest>,
) -> Result<(StatusCode, Json<ApiResponse<consumer_order::Model>>), ServiceError> {
    let pangkalan_id = target_pangkalan(&auth_user, request.pangkalan_id)?;
    Ok(created(
        state
            .services
            .consumer_orders
            .create(pangkalan_id, request)
            .await?,
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/consumer-orders/{id}",
    summary = "Update consumer sale",
    params(("id" = Uuid, Path, description = "Consumer order id")),
    request_body = UpdateConsumerOrderRequest,
    responses(
        (status = 200, description = "Sale updated", body = ApiResponse<consumer_order::Model>),
        (status = 403, description = "Another pangkalan", body = crate::errors::ErrorResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "consumer-orders"
)]
pub async fn update_consumer_order(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateConsumerOrderRequest>,
) -> ApiResult<consumer_order::Model> {
    let existing = load_owned(&state, &auth_user, id).await?;
    Ok(Json(ApiResponse::success(
        state
            .services
            .consumer_orders
            .update(existing, request)
            .await?,
    )))
}

#[utoipa::path(
    delete,
    path = "/api/v1/consumer-orders/{id}",
    summary = "Delete consumer sale",
    params(("id" = Uuid, Path, description = "Consumer order id")),
    responses(
        (status = 200, description = "Sale deleted", body = ApiResponse<Deleted>),
        (status = 403, description = "Another pangkalan", body = crate::errors::ErrorResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "consumer-orders"
)]
pub async fn delete_consumer_order(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Deleted> {
    load_owned(&state, &auth_user, id).await?;
    state.services.consumer_orders.delete(id).await?;
    Ok(Json(ApiResponse::success(Deleted::new(id))))
}
