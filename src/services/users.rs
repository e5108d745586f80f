use crate::{
    auth::{hash_password, UserProfile},
    db::DbPool,
    entities::{
        pangkalan,
        user::{self, Entity as UserEntity},
        UserRole,
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
pub struct CreateUserRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub role: UserRole,
    pub pangkalan_id: Option<Uuid>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub role: Option<UserRole>,
    pub pangkalan_id: Option<Uuid>,
    pub is_active: Option<bool>,
    #[validate(length(min = 8, max = 128))]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserFilter {
    pub role: Option<UserRole>,
    /// Matches name or email
    pub search: Option<String>,
}

#[derive(Clone)]
pub struct UserService {
    db_pool: Arc<DbPool>,
}

impl UserService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        filter: &UserFilter,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<UserProfile>, u64), ServiceError> {
        let mut query = UserEntity::find();
        if let Some(role) = filter.role {
            query = query.filter(user::Column::Role.eq(role));
        }
        if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = format!("%{}%", search.to_lowercase());
            query = query.filter(
                Condition::any()
                    .add(Expr::expr(Func::lower(Expr::col(user::Column::Name))).like(pattern.clone()))
                    .add(Expr::expr(Func::lower(Expr::col(user::Column::Email))).like(pattern)),
            );
        }

        let paginator = query
            .order_by_asc(user::Column::Email)
            .paginate(&*self.db_pool, per_page);
        let total = paginator.num_items().await?;
        let users = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((users.into_iter().map(UserProfile::from).collect(), total))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<UserProfile, ServiceError> {
        Ok(self.find(id).await?.into())
    }

    async fn find(&self, id: Uuid) -> Result<user::Model, ServiceError> {
        UserEntity::find_by_id(id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", id))
    }

    /// A PANGKALAN account must point at an existing depot.
    async fn check_assignment(
        &self,
        role: UserRole,
        pangkalan_id: Option<Uuid>,
    ) -> Result<(), ServiceError> {
        if role != UserRole::Pangkalan {
            return Ok(());
        }
        let id = pangkalan_id.ok_or_else(|| {
            ServiceError::BadRequest("PANGKALAN users require a pangkalan_id".to_string())
        })?;
        let exists = pangkalan::Entity::find_by_id(id)
            .one(&*self.db_pool)
            .await?
            .is_some();
        if !exists {
            return Err(ServiceError::BadRequest(format!(
                "Pangkalan {id} does not exist"
            )));
        }
        Ok(())
    }

    #[instrument(skip(self, request), fields(email = %request.email, role = %request.role))]
    pub async fn create(&self, request: CreateUserRequest) -> Result<UserProfile, ServiceError> {
        request.validate()?;
        self.check_assignment(request.role, request.pangkalan_id)
            .await?;

        let email = request.email.trim().to_lowercase();
        let now = Utc::now();
        let pangkalan_id = match request.role {
            UserRole::Pangkalan => request.pangkalan_id,
            UserRole::Admin => None,
        };

        let model = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(email.clone()),
            password_hash: Set(hash_password(&request.password)?),
            name: Set(request.name),
            role: Set(request.role),
            pangkalan_id: Set(pangkalan_id),
            is_active: Set(request.is_active.unwrap_or(true)),
            last_login_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&*self.db_pool)
        .await
        .map_err(|e| match ServiceError::from(e) {
            ServiceError::Conflict(_) => {
                ServiceError::Conflict(format!("Email {email} is already registered"))
            }
            other => other,
        })?;

        info!(user_id = %model.id, "User created");
        Ok(model.into())
    }

    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateUserRequest,
    ) -> Result<UserProfile, ServiceError> {
        request.validate()?;
        let existing = self.find(id).await?;

        let role = request.role.unwrap_or(existing.role);
        let pangkalan_id = match role {
            UserRole::Admin => None,
            UserRole::Pangkalan => request.pangkalan_id.or(existing.pangkalan_id),
        };
        self.check_assignment(role, pangkalan_id).await?;

        let mut active: user::ActiveModel = existing.into();
        if let Some(name) = request.name {
            active.name = Set(name);
        }
        active.role = Set(role);
        active.pangkalan_id = Set(pangkalan_id);
        if let Some(is_active) = request.is_active {
            active.is_active = Set(is_active);
        }
        if let Some(password) = request.password {
            active.password_hash = Set(hash_password(&password)?);
        }
        active.updated_at = Set(Utc::now());

        let updated = active.update(&*self.db_pool).await?;
        info!(user_id = %id, "User updated");
        Ok(updated.into())
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let result = UserEntity::delete_by_id(id).exec(&*self.db_pool).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("User", id));
        }
        info!(user_id = %id, "User deleted");
        Ok(())
    }

    /// Creates the first admin account unless one already exists.
    /// Returns `None` when an admin was already present.
    #[instrument(skip(self, password))]
    pub async fn ensure_admin(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<Option<UserProfile>, ServiceError> {
        let existing_admins = UserEntity::find()
            .filter(user::Column::Role.eq(UserRole::Admin))
            .count(&*self.db_pool)
            .await?;
        if existing_admins > 0 {
            return Ok(None);
        }

        let created = self
            .create(CreateUserRequest {
                email: email.to_string(),
                password: password.to_string(),
                name: name.to_string(),
                role: UserRole::Admin,
                pangkalan_id: None,
                is_active: Some(true),
            })
            .await?;
        info!(user_id = %created.id, "Bootstrap admin created");
        Ok(Some(created))
    }
}
