use super::common::{created, target_pangkalan, Deleted, PaginatedResponse, PaginationParams};
use crate::{
    auth::AuthUser,
    entities::consumer,
    errors::ServiceError,
    services::consumers::{ConsumerFilter, CreateConsumerRequest, UpdateConsumerRequest},
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
) -> Result<consumer::Model, ServiceError> {
    let found = state.services.consumers.get(id).await?;
    auth_user.ensure_pangkalan_access(found.pangkalan_id)?;
    Ok(found)
}

#[utoipa::path(
    get,
    path = "/api/v1/consumers",
    summary = "List consumers",
    params(PaginationParams, ConsumerFilter),
    responses(
        (status = 200, description = "Consumers", body = ApiResponse<PaginatedResponse<consumer::Model>>),
        (status = 403, description = "Another pangkalan", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "consumers"
)]
pub async fn list_consumers(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(pagination): Query<PaginationParams>,
    Query(mut filter): Query<ConsumerFilter>,
) -> ApiResult<PaginatedResponse<consumer::Model>> {
    filter.pangkalan_id = auth_user.scope_pangkalan(filter.pangkalan_id)?;
    let (page, per_page) = pagination.normalized();
    let (items, total) = state
        .services
        .consumers
        .list(&filter, page, per_page)
        .await?;
    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        items, page, per_page, total,
    ))))
}

#[utoipa::path(
    get,
    path = "/api/v1/consumers/{id}",
    summary = "Get consumer",
    params(("id" = Uuid, Path, description = "Consumer id")),
    responses(
        (status = 200, description = "Consumer", body = ApiResponse<consumer::Model>),
        (status = 403, description = "Another pangkalan", body = crate::errors::ErrorResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "consumers"
)]
pub async fn get_consumer(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<consumer::Model> {
    let found = load_owned(&state, &auth_user, id).await?;
    Ok(Json(ApiResponse::success(found)))
}

#[utoipa::path(
    post,
    path = "/api/v1/consumers",
    summary = "Register consumer",
    request_body = CreateConsumerRequest,
    responses(
        (status = 201, description = "Consumer registered", body = ApiResponse<consumer::Model>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 403, description = "Another pangkalan", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "consumers"
)]
pub async fn create_consumer(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(request): Json<CreateConsumerRequest>,
) -> Result<(StatusCode, Json<ApiResponse<consumer::Model>>), ServiceError> {
    let pangkalan_id = target_pangkalan(&auth_user, request.pangkalan_id)?;
    Ok(created(
        state.services.consumers.create(pangkalan_id, request).await?,
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/consumers/{id}",
    summary = "Update consumer",
    params(("id" = Uuid, Path, description = "Consumer id")),
    request_body = UpdateConsumerRequest,
    responses(
        (status = 200, description = "Consumer updated", body = ApiResponse<consumer::Model>),
        (status = 403, description = "Another pangkalan", body = crate::errors::ErrorResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "consumers"
)]
pub async fn update_consumer(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateConsumerRequest>,
) -> ApiResult<consumer::Model> {
    let existing = load_owned(&state, &auth_user, id).await?;
    Ok(Json(ApiResponse::success(
        state.services.consumers.update(existing, request).await?,
    )))
}

#[utoipa::path(
    delete,
    path = "/api/v1/consumers/{id}",
    summary = "Delete consumer",
    params(("id" = Uuid, Path, description = "Consumer id")),
    responses(
        (status = 200, description = "Consumer deleted", body = ApiResponse<Deleted>),
        (status = 403, description = "Another pangkalan", body = crate::errors::ErrorResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "consumers"
)]
pub async fn delete_consumer(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Deleted> {
    load_owned(&state, &auth_user, id).await?;
    state.services.consumers.delete(id).await?;
    Ok(Json(ApiResponse::success(Deleted::new(id))))
}
