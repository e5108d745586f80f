use super::common::{created, Deleted, PaginatedResponse, PaginationParams};
use crate::{
    auth::{AuthUser, UserProfile},
    errors::ServiceError,
    services::users::{CreateUserRequest, UpdateUserRequest, UserFilter},
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
    path = "/api/v1/users",
    summary = "List users",
    params(PaginationParams, UserFilter),
    responses(
        (status = 200, description = "Users", body = ApiResponse<PaginatedResponse<UserProfile>>),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "users"
)]
pub async fn list_users(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
    Query(filter): Query<UserFilter>,
) -> ApiResult<PaginatedResponse<UserProfile>> {
    let (page, per_page) = pagination.normalized();
    let (users, total) = state.services.users.list(&filter, page, per_page).await?;
    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        users, page, per_page, total,
    ))))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    summary = "Get user",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "User", body = ApiResponse<UserProfile>),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "users"
)]
pub async fn get_user(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<UserProfile> {
    Ok(Json(ApiResponse::success(state.services.users.get(id).await?)))
}

#[utoipa::path(
    post,
    path = "/api/v1/users",
    summary = "Create user",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = ApiResponse<UserProfile>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 409, description = "Email already registered", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "users"
)]
pub async fn create_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserProfile>>), ServiceError> {
    let user = state.services.users.create(request).await?;
    info!(created_by = %auth_user.user_id, user_id = %user.id, "user account created");
    Ok(created(user))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    summary = "Update user",
    params(("id" = Uuid, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = ApiResponse<UserProfile>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "users"
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateUserRequest>,
) -> ApiResult<UserProfile> {
    Ok(Json(ApiResponse::success(
        state.services.users.update(id, request).await?,
    )))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    summary = "Delete user",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted", body = ApiResponse<Deleted>),
        (status = 400, description = "Cannot delete own account", body = crate::errors::ErrorResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "users"
)]
pub async fn delete_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Deleted> {
    if auth_user.user_id == id {
        return Err(ServiceError::BadRequest(
            "You cannot delete your own account".to_string(),
        ));
    }
    state.services.users.delete(id).await?;
    Ok(Json(ApiResponse::success(Deleted::new(id))))
}
