use crate::{
    db::DbPool,
    entities::{
        lpg_product::{self, Entity as ProductEntity},
        LpgType,
    },
    errors::ServiceError,
    services::money::validate_price,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateLpgProductRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub lpg_type: LpgType,
    #[validate(custom = "validate_price")]
    pub selling_price: Decimal,
    #[validate(custom = "validate_price")]
    pub cost_price: Decimal,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateLpgProductRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(custom = "validate_price")]
    pub selling_price: Option<Decimal>,
    #[validate(custom = "validate_price")]
    pub cost_price: Option<Decimal>,
    pub is_active: Option<bool>,
}

/// Looks up the product row for a cylinder size on any connection.
pub async fn find_by_type<C: ConnectionTrait>(
    conn: &C,
    lpg_type: LpgType,
) -> Result<Option<lpg_product::Model>, ServiceError> {
    Ok(ProductEntity::find()
        .filter(lpg_product::Column::LpgType.eq(lpg_type))
        .one(conn)
        .await?)
}

/// Default unit price for `lpg_type`, used when a request omits its price.
/// Inactive products have no default price.
pub async fn price_for<C: ConnectionTrait>(
    conn: &C,
    lpg_type: LpgType,
) -> Result<Decimal, ServiceError> {
    find_by_type(conn, lpg_type)
        .await?
        .filter(|product| product.is_active)
        .map(|product| product.selling_price)
        .ok_or_else(|| {
            ServiceError::BadRequest(format!(
                "No price configured for {lpg_type}; supply a unit price"
            ))
        })
}

#[derive(Clone)]
pub struct LpgProductService {
    db_pool: Arc<DbPool>,
}

impl LpgProductService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<lpg_product::Model>, ServiceError> {
        Ok(ProductEntity::find()
            .order_by_asc(lpg_product::Column::LpgType)
            .all(&*self.db_pool)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<lpg_product::Model, ServiceError> {
        ProductEntity::find_by_id(id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::not_found("LPG product", id))
    }

    #[instrument(skip(self))]
    pub async fn price_for(&self, lpg_type: LpgType) -> Result<Decimal, ServiceError> {
        price_for(&*self.db_pool, lpg_type).await
    }

    #[instrument(skip(self, request), fields(lpg_type = %request.lpg_type))]
    pub async fn create(
        &self,
        request: CreateLpgProductRequest,
    ) -> Result<lpg_product::Model, ServiceError> {
        request.validate()?;
        let now = Utc::now();
        let lpg_type = request.lpg_type;

        let model = lpg_product::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(request.name),
            lpg_type: Set(lpg_type),
            selling_price: Set(request.selling_price),
            cost_price: Set(request.cost_price),
            is_active: Set(request.is_active.unwrap_or(true)),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&*self.db_pool)
        .await
        .map_err(|e| match ServiceError::from(e) {
            ServiceError::Conflict(_) => {
                ServiceError::Conflict(format!("A product for {lpg_type} already exists"))
            }
            other => other,
        })?;

        info!(product_id = %model.id, "LPG product created");
        Ok(model)
    }

    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateLpgProductRequest,
    ) -> Result<lpg_product::Model, ServiceError> {
        request.validate()?;
        let mut active: lpg_product::ActiveModel = self.get(id).await?.into();

        if let Some(name) = request.name {
            active.name = Set(name);
        }
        if let Some(price) = request.selling_price {
            active.selling_price = Set(price);
        }
        if let Some(price) = request.cost_price {
            active.cost_price = Set(price);
        }
        if let Some(is_active) = request.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Utc::now());

        let updated = active.update(&*self.db_pool).await?;
        info!(product_id = %id, "LPG product updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let result = ProductEntity::delete_by_id(id)
            .exec(&*self.db_pool)
            .await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("LPG product", id));
        }
        info!(product_id = %id, "LPG product deleted");
        Ok(())
    }
}
