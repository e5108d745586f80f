use crate::{
    services::reports::{Dashboard, PaymentReport, ReportRange, SalesReport, StockReport},
    ApiResponse, ApiResult, AppState,
};
use axum::{
    extract::{Query, State},
    Json,
};

#[utoipa::path(
    get,
    path = "/api/v1/reports/sales",
    summary = "Sales per pangkalan",
    description = "Cancelled orders are excluded. Defaults to the current month.",
    params(ReportRange),
    responses(
        (status = 200, description = "Sales report", body = ApiResponse<SalesReport>),
        (status = 400, description = "Invalid range", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "reports"
)]
pub async fn sales_report(
    State(state): State<AppState>,
    Query(range): Query<ReportRange>,
) -> ApiResult<SalesReport> {
    Ok(Json(ApiResponse::success(
        state.services.reports.sales_report(&range).await?,
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/stock",
    summary = "Stock movements per product and day",
    params(ReportRange),
    responses(
        (status = 200, description = "Stock report", body = ApiResponse<StockReport>),
        (status = 400, description = "Invalid range", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "reports"
)]
pub async fn stock_report(
    State(state): State<AppState>,
    Query(range): Query<ReportRange>,
) -> ApiResult<StockReport> {
    Ok(Json(ApiResponse::success(
        state.services.reports.stock_report(&range).await?,
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/payments",
    summary = "Outstanding balances",
    responses((status = 200, description = "Unpaid and partially paid orders", body = ApiResponse<PaymentReport>)),
    security(("Bearer" = [])),
    tag = "reports"
)]
pub async fn payment_report(State(state): State<AppState>) -> ApiResult<PaymentReport> {
    Ok(Json(ApiResponse::success(
        state.services.reports.payment_report().await?,
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/dashboard",
    summary = "Headline figures",
    responses((status = 200, description = "Dashboard", body = ApiResponse<Dashboard>)),
    security(("Bearer" = [])),
    tag = "reports"
)]
pub async fn dashboard(State(state): State<AppState>) -> ApiResult<Dashboard> {
    Ok(Json(ApiResponse::success(
        state.services.reports.dashboard().await?,
    )))
}
