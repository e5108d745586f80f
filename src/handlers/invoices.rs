use super::common::{PaginatedResponse, PaginationParams};
use crate::{
    auth::AuthUser,
    entities::invoice,
    errors::ServiceError,
    services::invoicing::{GenerateInvoiceRequest, InvoiceFilter},
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
    path = "/api/v1/invoices",
    summary = "List invoices",
    params(PaginationParams, InvoiceFilter),
    responses(
        (status = 200, description = "Invoices", body = ApiResponse<PaginatedResponse<invoice::Model>>),
        (status = 403, description = "Another pangkalan", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "invoices"
)]
pub async fn list_invoices(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(pagination): Query<PaginationParams>,
    Query(mut filter): Query<InvoiceFilter>,
) -> ApiResult<PaginatedResponse<invoice::Model>> {
    filter.pangkalan_id = auth_user.scope_pangkalan(filter.pangkalan_id)?;
    let (page, per_page) = pagination.normalized();
    let (invoices, total) = state
        .services
        .invoices
        .list(&filter, page, per_page)
        .await?;
    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        invoices, page, per_page, total,
    ))))
}

#[utoipa::path(
    get,
    path = "/api/v1/invoices/{id}",
    summary = "Get invoice",
    params(("id" = Uuid, Path, description = "Invoice id")),
    responses(
        (status = 200, description = "Invoice", body = ApiResponse<invoice::Model>),
        (status = 403, description = "Another pangkalan", body = crate::errors::ErrorResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "invoices"
)]
pub async fn get_invoice(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<invoice::Model> {
    let found = state.services.invoices.get(id).await?;
    auth_user.ensure_pangkalan_access(found.pangkalan_id)?;
    Ok(Json(ApiResponse::success(found)))
}

/// Returns 201 when a new invoice was issued and 200 when it already existed
#[utoipa::path(
    post,
    path = "/api/v1/orders/{id}/invoice",
    summary = "Issue invoice for an order",
    params(("id" = Uuid, Path, description = "Order id")),
    request_body = GenerateInvoiceRequest,
    responses(
        (status = 201, description = "Invoice issued", body = ApiResponse<invoice::Model>),
        (status = 200, description = "Invoice already existed", body = ApiResponse<invoice::Model>),
        (status = 400, description = "Cancelled order or bad tax rate", body = crate::errors::ErrorResponse),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "invoices"
)]
pub async fn generate_invoice(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(order_id): Path<Uuid>,
    request: Option<Json<GenerateInvoiceRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<invoice::Model>>), ServiceError> {
    let request = request.map(|Json(r)| r).unwrap_or_default();
    let (invoice, issued) = state
        .services
        .invoices
        .generate_for_order(order_id, request, Some(auth_user.user_id))
        .await?;
    let status = if issued {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(ApiResponse::success(invoice))))
}
