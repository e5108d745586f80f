use crate::{
    db::DbPool,
    entities::pangkalan::{self, Entity as PangkalanEntity},
    errors::ServiceError,
};
use chrono::Utc;
use sea_orm::{
    sea_query::{Expr, Func}, ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreatePangkalanRequest {
    #[validate(length(min = 1, max = 32))]
    pub code: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1))]
    pub address: String,
    #[validate(length(min = 1, max = 100))]
    pub region: String,
    pub pic_name: Option<String>,
    pub phone: Option<String>,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub alokasi_bulanan: i32,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdatePangkalanRequest {
    #[validate(length(min = 1, max = 32))]
    pub code: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub address: Option<String>,
    pub region: Option<String>,
    pub pic_name: Option<String>,
    pub phone: Option<String>,
    #[validate(range(min = 0))]
    pub alokasi_bulanan: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PangkalanFilter {
    /// Matches name or code
    pub search: Option<String>,
    pub region: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Clone)]
pub struct PangkalanService {
    db_pool: Arc<DbPool>,
}

impl PangkalanService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        filter: &PangkalanFilter,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<pangkalan::Model>, u64), ServiceError> {
        let mut query = PangkalanEntity::find();

        if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = format!("%{}%", search.to_lowercase());
            query = query.filter(
                Condition::any()
                    .add(Expr::expr(Func::lower(Expr::col(pangkalan::Column::Name))).like(pattern.clone()))
                    .add(Expr::expr(Func::lower(Expr::col(pangkalan::Column::Code))).like(pattern)),
            );
        }
        if let Some(region) = &filter.region {
            query = query.filter(pangkalan::Column::Region.eq(region.clone()));
        }
        if let Some(is_active) = filter.is_active {
            query = query.filter(pangkalan::Column::IsActive.eq(is_active));
        }

        let paginator = query
            .order_by_asc(pangkalan::Column::Code)
            .paginate(&*self.db_pool, per_page);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<pangkalan::Model, ServiceError> {
        PangkalanEntity::find_by_id(id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::not_found("Pangkalan", id))
    }

    #[instrument(skip(self, request), fields(code = %request.code))]
    pub async fn create(
        &self,
        request: CreatePangkalanRequest,
    ) -> Result<pangkalan::Model, ServiceError> {
        request.validate()?;
        let now = Utc::now();

        let model = pangkalan::ActiveModel {
            id: Set(Uuid::new_v4()),
            code: Set(request.code.trim().to_string()),
            name: Set(request.name),
            address: Set(request.address),
            region: Set(request.region),
            pic_name: Set(request.pic_name),
            phone: Set(request.phone),
            alokasi_bulanan: Set(request.alokasi_bulanan),
            is_active: Set(request.is_active.unwrap_or(true)),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&*self.db_pool)
        .await
        .map_err(|e| match ServiceError::from(e) {
            ServiceError::Conflict(_) => {
                ServiceError::Conflict(format!("Pangkalan code {} already exists", request.code))
            }
            other => other,
        })?;

        info!(pangkalan_id = %model.id, code = %model.code, "Pangkalan created");
        Ok(model)
    }

    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        id: Uuid,
        request: UpdatePangkalanRequest,
    ) -> Result<pangkalan::Model, ServiceError> {
        request.validate()?;
        let existing = self.get(id).await?;
        let mut active: pangkalan::ActiveModel = existing.into();

        if let Some(code) = request.code {
            active.code = Set(code.trim().to_string());
        }
        if let Some(name) = request.name {
            active.name = Set(name);
        }
        if let Some(address) = request.address {
            active.address = Set(address);
        }
        if let Some(region) = request.region {
            active.region = Set(region);
        }
        if request.pic_name.is_some() {
            active.pic_name = Set(request.pic_name);
        }
        if request.phone.is_some() {
            active.phone = Set(request.phone);
        }
        if let Some(alokasi) = request.alokasi_bulanan {
            active.alokasi_bulanan = Set(alokasi);
        }
        if let Some(is_active) = request.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Utc::now());

        let updated = active.update(&*self.db_pool).await?;
        info!(pangkalan_id = %id, "Pangkalan updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let result = PangkalanEntity::delete_by_id(id)
            .exec(&*self.db_pool)
            .await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("Pangkalan", id));
        }
        info!(pangkalan_id = %id, "Pangkalan deleted");
        Ok(())
    }
}
