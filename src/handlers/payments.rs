use super::common::{PaginatedResponse, PaginationParams};
use crate::{
    auth::AuthUser,
    entities::payment_record,
    services::payments::{PaymentFilter, RecordPaymentRequest},
    ApiResponse, ApiResult, AppState,
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/api/v1/payments",
    summary = "List payment balances",
    params(PaginationParams, PaymentFilter),
    responses(
        (status = 200, description = "Payment records", body = ApiResponse<PaginatedResponse<payment_record::Model>>),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "payments"
)]
pub async fn list_payments(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
    Query(filter): Query<PaymentFilter>,
) -> ApiResult<PaginatedResponse<payment_record::Model>> {
    let (page, per_page) = pagination.normalized();
    let (records, total) = state
        .services
        .payments
        .list(&filter, page, per_page)
        .await?;
    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        records, page, per_page, total,
    ))))
}

#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}/payment",
    summary = "Payment balance of an order",
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "Payment record", body = ApiResponse<payment_record::Model>),
        (status = 403, description = "Another pangkalan", body = crate::errors::ErrorResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "payments"
)]
pub async fn get_order_payment(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(order_id): Path<Uuid>,
) -> ApiResult<payment_record::Model> {
    let order = state.services.orders.find(order_id).await?;
    auth_user.ensure_pangkalan_access(order.pangkalan_id)?;
    Ok(Json(ApiResponse::success(
        state.services.payments.get_by_order(order_id).await?,
    )))
}

#[utoipa::path(
    post,
    path = "/api/v1/orders/{id}/payments",
    summary = "Record a payment",
    description = "Adds the amount to what has been paid so far",
    params(("id" = Uuid, Path, description = "Order id")),
    request_body = RecordPaymentRequest,
    responses(
        (status = 200, description = "Updated balance", body = ApiResponse<payment_record::Model>),
        (status = 400, description = "Invalid amount", body = crate::errors::ErrorResponse),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "payments"
)]
pub async fn record_payment(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(order_id): Path<Uuid>,
    Json(request): Json<RecordPaymentRequest>,
) -> ApiResult<payment_record::Model> {
    let record = state
        .services
        .payments
        .record_payment(order_id, request, Some(auth_user.user_id))
        .await?;
    Ok(Json(ApiResponse::success(record)))
}
