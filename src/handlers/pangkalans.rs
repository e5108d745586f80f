use super::common::{created, Deleted, PaginatedResponse, PaginationParams};
use crate::{
    auth::AuthUser,
    entities::pangkalan,
    errors::ServiceError,
    services::pangkalans::{CreatePangkalanRequest, PangkalanFilter, UpdatePangkalanRequest},
    ApiResponse, ApiResult, AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/api/v1/pangkalans",
    summary = "List pangkalans",
    params(PaginationParams, PangkalanFilter),
    responses(
        (status = 200, description = "Pangkalans", body = ApiResponse<PaginatedResponse<pangkalan::Model>>),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "pangkalans"
)]
pub async fn list_pangkalans(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
    Query(filter): Query<PangkalanFilter>,
) -> ApiResult<PaginatedResponse<pangkalan::Model>> {
    let (page, per_page) = pagination.normalized();
    let (items, total) = state
        .services
        .pangkalans
        .list(&filter, page, per_page)
        .await?;
    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        items, page, per_page, total,
    ))))
}

/// Pangkalan users may read their own depot only
#[utoipa::path(
    get,
    path = "/api/v1/pangkalans/{id}",
    summary = "Get pangkalan",
    params(("id" = Uuid, Path, description = "Pangkalan id")),
    responses(
        (status = 200, description = "Pangkalan", body = ApiResponse<pangkalan::Model>),
        (status = 403, description = "Another pangkalan", body = crate::errors::ErrorResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "pangkalans"
)]
pub async fn get_pangkalan(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<pangkalan::Model> {
    auth_user.ensure_pangkalan_access(id)?;
    Ok(Json(ApiResponse::success(
        state.services.pangkalans.get(id).await?,
    )))
}

#[utoipa::path(
    post,
    path = "/api/v1/pangkalans",
    summary = "Create pangkalan",
    request_body = CreatePangkalanRequest,
    responses(
        (status = 201, description = "Pangkalan created", body = ApiResponse<pangkalan::Model>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 409, description = "Code already used", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "pangkalans"
)]
pub async fn create_pangkalan(
    State(state): State<AppState>,
    Json(request): Json<CreatePangkalanRequest>,
) -> Result<(StatusCode, Json<ApiResponse<pangkalan::Model>>), ServiceError> {
    Ok(created(state.services.pangkalans.create(request).await?))
}

#[utoipa::path(
    put,
    path = "/api/v1/pangkalans/{id}",
    summary = "Update pangkalan",
    params(("id" = Uuid, Path, description = "Pangkalan id")),
    request_body = UpdatePangkalanRequest,
    responses(
        (status = 200, description = "Pangkalan updated", body = ApiResponse<pangkalan::Model>),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Code already used", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "pangkalans"
)]
pub async fn update_pangkalan(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdatePangkalanRequest>,
) -> ApiResult<pangkalan::Model> {
    Ok(Json(ApiResponse::success(
        state.services.pangkalans.update(id, request).await?,
    )))
}

#[utoipa::path(
    delete,
    path = "/api/v1/pangkalans/{id}",
    summary = "Delete pangkalan",
    params(("id" = Uuid, Path, description = "Pangkalan id")),
    responses(
        (status = 200, description = "Pangkalan deleted", body = ApiResponse<Deleted>),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "pangkalans"
)]
pub async fn delete_pangkalan(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Deleted> {
    state.services.pangkalans.delete(id).await?;
    Ok(Json(ApiResponse::success(Deleted::new(id))))
}
