//! Handlers for daily distribution: `/penyaluran` (actual) and
//! `/perencanaan` (planned). Writes are admin-only; reads are scoped to the
//! caller's pangkalan.

use super::common::{created, target_pangkalan, Deleted, PaginatedResponse, PaginationParams};
use crate::{
    auth::AuthUser,
    errors::ServiceError,
    services::distribution::{BulkUpsertRequest, UpsertDistributionRequest},
    AppState,
};
use uuid::Uuid;
use validator::Validate;

fn resolve_bulk(
    auth_user: &AuthUser,
    request: BulkUpsertRequest,
) -> Result<Vec<(Uuid, UpsertDistributionRequest)>, ServiceError> {
    request.validate()?;
    request
        .rows
        .into_iter()
        .map(|row| Ok((target_pangkalan(auth_user, row.pangkalan_id)?, row)))
        .collect()
}

pub mod penyaluran {
    use super::*;
    use crate::{
        entities::penyaluran_harian,
        services::{
            distribution::{DistributionFilter, RekapQuery},
            rekapitulasi::Rekapitulasi,
        },
        ApiResponse, ApiResult,
    };
    use axum::{
        extract::{Path, Query, State},
        http::StatusCode,
        Json,
    };

    #[utoipa::path(
        get,
        path = "/api/v1/penyaluran",
        summary = "List daily distribution",
        params(PaginationParams, DistributionFilter),
        responses(
            (status = 200, description = "Rows", body = ApiResponse<PaginatedResponse<penyaluran_harian::Model>>),
            (status = 400, description = "Invalid month", body = crate::errors::ErrorResponse),
        ),
        security(("Bearer" = [])),
        tag = "penyaluran"
    )]
    pub async fn list(
        State(state): State<AppState>,
        auth_user: AuthUser,
        Query(pagination): Query<PaginationParams>,
        Query(mut filter): Query<DistributionFilter>,
    ) -> ApiResult<PaginatedResponse<penyaluran_harian::Model>> {
        filter.pangkalan_id = auth_user.scope_pangkalan(filter.pangkalan_id)?;
        let (page, per_page) = pagination.normalized();
        let (rows, total) = state
            .services
            .penyaluran
            .list(&filter, page, per_page)
            .await?;
        Ok(Json(ApiResponse::success(PaginatedResponse::new(
            rows, page, per_page, total,
        ))))
    }

    #[utoipa::path(
        post,
        path = "/api/v1/penyaluran",
        summary = "Save one day's distribution",
        description = "Replaces the existing row for the same pangkalan, date and cylinder size",
        request_body = UpsertDistributionRequest,
        responses(
            (status = 200, description = "Saved row", body = ApiResponse<penyaluran_harian::Model>),
            (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        ),
        security(("Bearer" = [])),
        tag = "penyaluran"
    )]
    pub async fn upsert(
        State(state): State<AppState>,
        auth_user: AuthUser,
        Json(request): Json<UpsertDistributionRequest>,
    ) -> ApiResult<penyaluran_harian::Model> {
        let pangkalan_id = target_pangkalan(&auth_user, request.pangkalan_id)?;
        Ok(Json(ApiResponse::success(
            state
                .services
                .penyaluran
                .upsert(pangkalan_id, request)
                .await?,
        )))
    }

    #[utoipa::path(
        post,
        path = "/api/v1/penyaluran/bulk",
        summary = "Save many days at once",
        request_body = BulkUpsertRequest,
        responses(
            (status = 201, description = "Saved rows", body = ApiResponse<Vec<penyaluran_harian::Model>>),
            (status = 400, description = "Invalid row", body = crate::errors::ErrorResponse),
        ),
        security(("Bearer" = [])),
        tag = "penyaluran"
    )]
    pub async fn bulk_upsert(
        State(state): State<AppState>,
        auth_user: AuthUser,
        Json(request): Json<BulkUpsertRequest>,
    ) -> Result<(StatusCode, Json<ApiResponse<Vec<penyaluran_harian::Model>>>), ServiceError> {
        let rows = resolve_bulk(&auth_user, request)?;
        Ok(created(state.services.penyaluran.bulk_upsert(rows).await?))
    }

    #[utoipa::path(
        delete,
        path = "/api/v1/penyaluran/{id}",
        summary = "Delete a distribution row",
        params(("id" = Uuid, Path, description = "Row id")),
        responses(
            (status = 200, description = "Row deleted", body = ApiResponse<Deleted>),
            (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
        ),
        security(("Bearer" = [])),
        tag = "penyaluran"
    )]
    pub async fn delete(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Deleted> {
        state.services.penyaluran.delete(id).await?;
        Ok(Json(ApiResponse::success(Deleted::new(id))))
    }

    #[utoipa::path(
        get,
        path = "/api/v1/penyaluran/rekapitulasi",
        summary = "Monthly distribution grid",
        params(RekapQuery),
        responses(
            (status = 200, description = "Grid with totals and remaining allocation", body = ApiResponse<Rekapitulasi>),
            (status = 400, description = "Invalid month", body = crate::errors::ErrorResponse),
        ),
        security(("Bearer" = [])),
        tag = "penyaluran"
    )]
    pub async fn rekapitulasi(
        State(state): State<AppState>,
        auth_user: AuthUser,
        Query(mut query): Query<RekapQuery>,
    ) -> ApiResult<Rekapitulasi> {
        query.pangkalan_id = auth_user.scope_pangkalan(query.pangkalan_id)?;
        Ok(Json(ApiResponse::success(
            state.services.penyaluran.rekapitulasi(&query).await?,
        )))
    }
}

pub mod perencanaan {
    use super::*;
    use crate::{
        entities::perencanaan_harian,
        services::{
            distribution::{DistributionFilter, RekapQuery},
            rekapitulasi::{Realisasi, Rekapitulasi},
        },
        ApiResponse, ApiResult,
    };
    use axum::{
        extract::{Path, Query, State},
        http::StatusCode,
        Json,
    };

    #[utoipa::path(
        get,
        path = "/api/v1/perencanaan",
        summary = "List planned distribution",
        params(PaginationParams, DistributionFilter),
        responses(
            (status = 200, description = "Rows", body = ApiResponse<PaginatedResponse<perencanaan_harian::Model>>),
            (status = 400, description = "Invalid month", body = crate::errors::ErrorResponse),
        ),
        security(("Bearer" = [])),
        tag = "perencanaan"
    )]
    pub async fn list(
        State(state): State<AppState>,
        auth_user: AuthUser,
        Query(pagination): Query<PaginationParams>,
        Query(mut filter): Query<DistributionFilter>,
    ) -> ApiResult<PaginatedResponse<perencanaan_harian::Model>> {
        filter.pangkalan_id = auth_user.scope_pangkalan(filter.pangkalan_id)?;
        let (page, per_page) = pagination.normalized();
        let (rows, total) = state
            .services
            .perencanaan
            .list(&filter, page, per_page)
            .await?;
        Ok(Json(ApiResponse::success(PaginatedResponse::new(
            rows, page, per_page, total,
        ))))
    }

    #[utoipa::path(
        post,
        path = "/api/v1/perencanaan",
        summary = "Save one day's plan",
        description = "Replaces the existing row for the same pangkalan, date and cylinder size",
        request_body = UpsertDistributionRequest,
        responses(
            (status = 200, description = "Saved row", body = ApiResponse<perencanaan_harian::Model>),
            (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        ),
        security(("Bearer" = [])),
        tag = "perencanaan"
    )]
    pub async fn upsert(
        State(state): State<AppState>,
        auth_user: AuthUser,
        Json(request): Json<UpsertDistributionRequest>,
    ) -> ApiResult<perencanaan_harian::Model> {
        let pangkalan_id = target_pangkalan(&auth_user, request.pangkalan_id)?;
        Ok(Json(ApiResponse::success(
            state
                .services
                .perencanaan
                .upsert(pangkalan_id, request)
                .await?,
        )))
    }

    #[utoipa::path(
        post,
        path = "/api/v1/perencanaan/bulk",
        summary = "Save many planned days at once",
        request_body = BulkUpsertRequest,
        responses(
            (status = 201, description = "Saved rows", body = ApiResponse<Vec<perencanaan_harian::Model>>),
            (status = 400, description = "Invalid row", body = crate::errors::ErrorResponse),
        ),
        security(("Bearer" = [])),
        tag = "perencanaan"
    )]
    pub async fn bulk_upsert(
        State(state): State<AppState>,
        auth_user: AuthUser,
        Json(request): Json<BulkUpsertRequest>,
    ) -> Result<(StatusCode, Json<ApiResponse<Vec<perencanaan_harian::Model>>>), ServiceError> {
        let rows = resolve_bulk(&auth_user, request)?;
        Ok(created(state.services.perencanaan.bulk_upsert(rows).await?))
    }

    #[utoipa::path(
        delete,
        path = "/api/v1/perencanaan/{id}",
        summary = "Delete a planned row",
        params(("id" = Uuid, Path, description = "Row id")),
        responses(
            (status = 200, description = "Row deleted", body = ApiResponse<Deleted>),
            (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
        ),
        security(("Bearer" = [])),
        tag = "perencanaan"
    )]
    pub async fn delete(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Deleted> {
        state.services.perencanaan.delete(id).await?;
        Ok(Json(ApiResponse::success(Deleted::new(id))))
    }

    #[utoipa::path(
        get,
        path = "/api/v1/perencanaan/rekapitulasi",
        summary = "Monthly planning grid",
        params(RekapQuery),
        responses(
            (status = 200, description = "Grid with totals and remaining allocation", body = ApiResponse<Rekapitulasi>),
            (status = 400, description = "Invalid month", body = crate::errors::ErrorResponse),
        ),
        security(("Bearer" = [])),
        tag = "perencanaan"
    )]
    pub async fn rekapitulasi(
        State(state): State<AppState>,
        auth_user: AuthUser,
        Query(mut query): Query<RekapQuery>,
    ) -> ApiResult<Rekapitulasi> {
        query.pangkalan_id = auth_user.scope_pangkalan(query.pangkalan_id)?;
        Ok(Json(ApiResponse::success(
            state.services.perencanaan.rekapitulasi(&query).await?,
        )))
    }

    #[utoipa::path(
        get,
        path = "/api/v1/perencanaan/realisasi",
        summary = "Plan against actual distribution",
        params(RekapQuery),
        responses(
            (status = 200, description = "Planned and actual totals per pangkalan", body = ApiResponse<Realisasi>),
            (status = 400, description = "Invalid month", body = crate::errors::ErrorResponse),
        ),
        security(("Bearer" = [])),
        tag = "perencanaan"
    )]
    pub async fn realisasi(
        State(state): State<AppState>,
        auth_user: AuthUser,
        Query(mut query): Query<RekapQuery>,
    ) -> ApiResult<Realisasi> {
        query.pangkalan_id = auth_user.scope_pangkalan(query.pangkalan_id)?;
        Ok(Json(ApiResponse::success(
            state.services.perencanaan.realisasi(&query).await?,
        )))
    }
}
