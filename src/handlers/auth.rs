use crate::{
    auth::{AuthError, AuthUser, LoginCredentials, TokenPair, UserProfile},
    ApiResponse, ApiResult, AppState,
};
use axum::{extract::State, Json};
use tracing::info;

/// Exchange email and password for a bearer token
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    summary = "Log in",
    request_body = LoginCredentials,
    responses(
        (status = 200, description = "Token issued", body = ApiResponse<TokenPair>),
        (status = 401, description = "Invalid credentials", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse),
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(credentials): Json<LoginCredentials>,
) -> Result<Json<ApiResponse<TokenPair>>, AuthError> {
    let tokens = state.auth.login(&credentials).await?;
    info!(user_id = %tokens.user.id, "login succeeded");
    Ok(Json(ApiResponse::success(tokens)))
}

/// Profile of the account behind the bearer token
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    summary = "Current user",
    responses(
        (status = 200, description = "Current user", body = ApiResponse<UserProfile>),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 404, description = "Account no longer exists", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "auth"
)]
pub async fn me(State(state): State<AppState>, auth_user: AuthUser) -> ApiResult<UserProfile> {
    let profile = state.services.users.get(auth_user.user_id).await?;
    Ok(Json(ApiResponse::success(profile)))
}
