use crate::{
    db::DbPool,
    entities::{
        consumer::{self, Entity as ConsumerEntity},
        pangkalan, ConsumerType,
    },
    errors::ServiceError,
};
use chrono::Utc;
use sea_orm::{
    sea_query::{Expr, Func},
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateConsumerRequest {
    /// Required for admins; pangkalan users always create for their own depot
    pub pangkalan_id: Option<Uuid>,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 16, max = 16))]
    pub nik: Option<String>,
    pub consumer_type: ConsumerType,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateConsumerRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(min = 16, max = 16))]
    pub nik: Option<String>,
    pub consumer_type: Option<ConsumerType>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ConsumerFilter {
    pub pangkalan_id: Option<Uuid>,
    pub consumer_type: Option<ConsumerType>,
    /// Matches name or NIK
    pub search: Option<String>,
}

#[derive(Clone)]
pub struct ConsumerService {
    db_pool: Arc<DbPool>,
}

impl ConsumerService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        filter: &ConsumerFilter,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<consumer::Model>, u64), ServiceError> {
        let mut query = ConsumerEntity::find();
        if let Some(pangkalan_id) = filter.pangkalan_id {
            query = query.filter(consumer::Column::PangkalanId.eq(pangkalan_id));
        }
        if let Some(consumer_type) = filter.consumer_type {
            query = query.filter(consumer::Column::ConsumerType.eq(consumer_type));
        }
        if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = format!("%{}%", search.to_lowercase());
            query = query.filter(
                Condition::any()
                    .add(Expr::expr(Func::lower(Expr::col(consumer::Column::Name))).like(pattern.clone()))
                    .add(consumer::Column::Nik.like(pattern)),
            );
        }

        let paginator = query
            .order_by_asc(consumer::Column::Name)
            .paginate(&*self.db_pool, per_page);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<consumer::Model, ServiceError> {
        ConsumerEntity::find_by_id(id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::not_found("Consumer", id))
    }

    /// `pangkalan_id` has already been resolved against the caller's scope.
    #[instrument(skip(self, request))]
    pub async fn create(
        &self,
        pangkalan_id: Uuid,
        request: CreateConsumerRequest,
    ) -> Result<consumer::Model, ServiceError> {
        request.validate()?;
        if pangkalan::Entity::find_by_id(pangkalan_id)
            .one(&*self.db_pool)
            .await?
            .is_none()
        {
            return Err(ServiceError::BadRequest(format!(
                "Pangkalan {pangkalan_id} does not exist"
            )));
        }

        let now = Utc::now();
        let model = consumer::ActiveModel {
            id: Set(Uuid::new_v4()),
            pangkalan_id: Set(pangkalan_id),
            name: Set(request.name),
            nik: Set(request.nik),
            consumer_type: Set(request.consumer_type),
            phone: Set(request.phone),
            address: Set(request.address),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&*self.db_pool)
        .await?;

        info!(consumer_id = %model.id, pangkalan_id = %pangkalan_id, "Consumer registered");
        Ok(model)
    }

    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        existing: consumer::Model,
        request: UpdateConsumerRequest,
    ) -> Result<consumer::Model, ServiceError> {
        request.validate()?;
        let id = existing.id;
        let mut active: consumer::ActiveModel = existing.into();

        if let Some(name) = request.name {
            active.name = Set(name);
        }
        if request.nik.is_some() {
            active.nik = Set(request.nik);
        }
        if let Some(consumer_type) = request.consumer_type {
            active.consumer_type = Set(consumer_type);
        }
        if request.phone.is_some() {
            active.phone = Set(request.phone);
        }
        if request.address.is_some() {
            active.address = Set(request.address);
        }
        if let Some(is_active) = request.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Utc::now());

        let updated = active.update(&*self.db_pool).await?;
        info!(consumer_id = %id, "Consumer updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let result = ConsumerEntity::delete_by_id(id)
            .exec(&*self.db_pool)
            .await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("Consumer", id));
        }
        info!(consumer_id = %id, "Consumer deleted");
        Ok(())
    }
}
