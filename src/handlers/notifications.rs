use crate::{
    services::notifications::{Notification, NotificationQuery},
    ApiResponse, ApiResult, AppState,
};
use axum::{
    extract::{Query, State},
    Json,
};

/// Recent activity and stock alerts, most urgent first
#[utoipa::path(
    get,
    path = "/api/v1/notifications",
    summary = "List notifications",
    params(NotificationQuery),
    responses(
        (status = 200, description = "Notifications", body = ApiResponse<Vec<Notification>>),
        (status = 403, description = "Admins only", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "notifications"
)]
pub async fn list_notifications(
    State(state): State<AppState>,
    Query(query): Query<NotificationQuery>,
) -> ApiResult<Vec<Notification>> {
    Ok(Json(ApiResponse::success(
        state.services.notifications.list(&query).await?,
    )))
}
