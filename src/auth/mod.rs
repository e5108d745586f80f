/*!
 * # Authentication and Authorization
 *
 * Bearer-token authentication for the LPG API. Tokens are HS256 JWTs issued
 * on login; the middleware in this module validates them and places an
 * [`AuthUser`] into the request extensions. Role guards are attached to
 * routers through [`AuthRouterExt`].
 *
 * Two roles exist. `ADMIN` passes every guard. `PANGKALAN` users are bound
 * to a single depot and may only touch that depot's data.
 */

use crate::config::AppConfig;
use crate::entities::{user, UserRole};
use crate::errors::{ErrorResponse, ServiceError};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;

mod password;

pub use password::{hash_password, verify_password};

/// Claim structure for JWT tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,                // Subject (user ID)
    pub email: String,              // User's email
    pub role: UserRole,             // ADMIN or PANGKALAN
    pub pangkalan_id: Option<Uuid>, // Depot a PANGKALAN user is bound to
    pub jti: String,                // JWT ID
    pub iat: i64,                   // Issued at time
    pub exp: i64,                   // Expiration time
    pub iss: String,                // Issuer
}

/// Authenticated user data extracted from the JWT token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
    pub role: UserRole,
    pub pangkalan_id: Option<Uuid>,
    pub token_id: String,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Admins satisfy every role requirement.
    pub fn has_role(&self, role: UserRole) -> bool {
        self.is_admin() || self.role == role
    }

    pub fn can_access_pangkalan(&self, pangkalan_id: Uuid) -> bool {
        self.is_admin() || self.pangkalan_id == Some(pangkalan_id)
    }

    /// Fails with 403 unless the user may act on `pangkalan_id`.
    pub fn ensure_pangkalan_access(&self, pangkalan_id: Uuid) -> Result<(), ServiceError> {
        if self.can_access_pangkalan(pangkalan_id) {
            Ok(())
        } else {
            Err(ServiceError::Forbidden(
                "Access to another pangkalan is not allowed".to_string(),
            ))
        }
    }

    /// Resolves the pangkalan filter for a list query.
    ///
    /// Admins get whatever they asked for. Pangkalan users are pinned to their
    /// own depot; asking for a different one is rejected.
    pub fn scope_pangkalan(&self, requested: Option<Uuid>) -> Result<Option<Uuid>, ServiceError> {
        if self.is_admin() {
            return Ok(requested);
        }
        let own = self.pangkalan_id.ok_or_else(|| {
            ServiceError::Forbidden("User is not assigned to a pangkalan".to_string())
        })?;
        match requested {
            Some(other) if other != own => Err(ServiceError::Forbidden(
                "Access to another pangkalan is not allowed".to_string(),
            )),
            _ => Ok(Some(own)),
        }
    }
}

/// Handlers take `AuthUser` directly; it is only present behind `auth_middleware`.
#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(AuthError::MissingToken)
    }
}

/// Authentication configuration
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub access_token_expiration: Duration,
}

impl AuthConfig {
    pub fn new(jwt_secret: String, jwt_issuer: String, access_token_expiration: Duration) -> Self {
        Self {
            jwt_secret,
            jwt_issuer,
            access_token_expiration,
        }
    }

    pub fn from_app_config(cfg: &AppConfig) -> Self {
        Self::new(
            cfg.jwt_secret.clone(),
            cfg.jwt_issuer.clone(),
            Duration::from_secs(cfg.jwt_expiration),
        )
    }
}

/// Authentication service that handles login, token issuance and validation
#[derive(Debug, Clone)]
pub struct AuthService {
    pub config: AuthConfig,
    pub db: Arc<DatabaseConnection>,
}

impl AuthService {
    pub fn new(config: AuthConfig, db: Arc<DatabaseConnection>) -> Self {
        Self { config, db }
    }

    /// Verifies credentials of an active user and issues an access token.
    ///
    /// Unknown email, wrong password and deactivated accounts all produce the
    /// same [`AuthError::InvalidCredentials`].
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<TokenPair, AuthError> {
        let email = credentials.email.trim().to_lowercase();
        let found = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&*self.db)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        let account = match found {
            Some(account) if account.is_active => account,
            _ => {
                warn!("login rejected: unknown or inactive account");
                return Err(AuthError::InvalidCredentials);
            }
        };

        if !verify_password(&credentials.password, &account.password_hash) {
            warn!(user_id = %account.id, "login rejected: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let mut active: user::ActiveModel = account.clone().into();
        active.last_login_at = Set(Some(Utc::now()));
        active
            .update(&*self.db)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        info!(user_id = %account.id, role = %account.role, "user logged in");
        self.generate_token(&account)
    }

    /// Issues an access token for `account`.
    pub fn generate_token(&self, account: &user::Model) -> Result<TokenPair, AuthError> {
        let now = Utc::now();
        let exp = now
            + ChronoDuration::from_std(self.config.access_token_expiration)
                .map_err(|_| AuthError::InternalError("Invalid token duration".to_string()))?;

        let claims = Claims {
            sub: account.id.to_string(),
            email: account.email.clone(),
            role: account.role,
            pangkalan_id: account.pangkalan_id,
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            iss: self.config.jwt_issuer.clone(),
        };

        let access_token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| AuthError::TokenCreation(e.to_string()))?;

        Ok(TokenPair {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.config.access_token_expiration.as_secs() as i64,
            user: UserProfile::from(account.clone()),
        })
    }

    /// Resolves validated claims against the current account row.
    ///
    /// Role and pangkalan are taken from the row, so deactivation and
    /// reassignment apply to tokens that are already issued.
    pub async fn authenticate(&self, claims: Claims) -> Result<AuthUser, AuthError> {
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidToken)?;
        let account = user::Entity::find_by_id(user_id)
            .one(&*self.db)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        match account {
            Some(account) if account.is_active => Ok(AuthUser {
                user_id,
                email: account.email,
                role: account.role,
                pangkalan_id: account.pangkalan_id,
                token_id: claims.jti,
            }),
            _ => {
                warn!(user_id = %user_id, "token rejected: account missing or inactive");
                Err(AuthError::AccountDisabled)
            }
        }
    }

    /// Validate a JWT token and extract the claims
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.config.jwt_issuer.as_str()]);

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        })
    }
}

/// Access token returned by `/auth/login`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenPair {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: UserProfile,
}

/// Login credentials
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

/// Public view of a user account
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub pangkalan_id: Option<Uuid>,
    pub is_active: bool,
}

impl From<user::Model> for UserProfile {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            name: model.name,
            role: model.role,
            pangkalan_id: model.pangkalan_id,
            is_active: model.is_active,
        }
    }
}

/// Authentication error types
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Missing token")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token has expired")]
    TokenExpired,

    #[error("Account is inactive or no longer exists")]
    AccountDisabled,

    #[error("Token creation failed: {0}")]
    TokenCreation(String),

    #[error("Insufficient permissions")]
    InsufficientPermissions,

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl AuthError {
    fn parts(&self) -> (StatusCode, &'static str, &'static str) {
        match self {
            Self::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "AUTH_INVALID_CREDENTIALS",
                "Invalid email or password",
            ),
            Self::MissingToken => (
                StatusCode::UNAUTHORIZED,
                "AUTH_MISSING_TOKEN",
                "No authentication token provided",
            ),
            Self::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "AUTH_INVALID_TOKEN",
                "Invalid authentication token",
            ),
            Self::TokenExpired => (
                StatusCode::UNAUTHORIZED,
                "AUTH_TOKEN_EXPIRED",
                "Token has expired",
            ),
            Self::AccountDisabled => (
                StatusCode::UNAUTHORIZED,
                "AUTH_ACCOUNT_DISABLED",
                "Account is inactive or no longer exists",
            ),
            Self::InsufficientPermissions => (
                StatusCode::FORBIDDEN,
                "AUTH_INSUFFICIENT_PERMISSIONS",
                "Insufficient permissions",
            ),
            Self::TokenCreation(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "AUTH_TOKEN_CREATION_FAILED",
                "Internal server error",
            ),
            Self::DatabaseError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "AUTH_DATABASE_ERROR",
                "Internal server error",
            ),
            Self::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "AUTH_INTERNAL_ERROR",
                "Internal server error",
            ),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        if status.is_server_error() {
            tracing::error!(error = %self, "authentication failed internally");
        }

        let body = ErrorResponse {
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            message: message.to_string(),
            details: Some(code.to_string()),
            request_id: crate::tracing::current_request_id().map(|rid| rid.0),
            timestamp: Utc::now().to_rfc3339(),
        };

        (status, Json(body)).into_response()
    }
}

/// Role middleware: admins pass, everyone else must hold `required_role`
pub async fn role_middleware(
    State(required_role): State<UserRole>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let user = request
        .extensions()
        .get::<AuthUser>()
        .cloned()
        .ok_or(AuthError::MissingToken)?;

    if !user.has_role(required_role) {
        debug!(user_id = %user.user_id, role = %user.role, required = %required_role, "role guard rejected request");
        return Err(AuthError::InsufficientPermissions);
    }

    Ok(next.run(request).await)
}

/// Authentication middleware that extracts and validates bearer tokens
pub async fn auth_middleware(mut request: Request, next: Next) -> Response {
    let auth_service = match request.extensions().get::<Arc<AuthService>>() {
        Some(service) => service.clone(),
        None => {
            return AuthError::InternalError("Authentication service not available".to_string())
                .into_response();
        }
    };

    let claims = match extract_claims_from_headers(request.headers(), &auth_service) {
        Ok(claims) => claims,
        Err(e) => return e.into_response(),
    };

    match auth_service.authenticate(claims).await {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}

fn extract_claims_from_headers(
    headers: &HeaderMap,
    auth_service: &AuthService,
) -> Result<Claims, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::InvalidToken)?;

    let token = value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::InvalidToken)?;

    auth_service.validate_token(token)
}

/// Extension methods for Router to add auth middleware
pub trait AuthRouterExt {
    fn with_auth(self) -> Self;
    fn with_role(self, role: UserRole) -> Self;
}

impl<S> AuthRouterExt for axum::Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_auth(self) -> Self {
        self.layer(axum::middleware::from_fn(auth_middleware))
    }

    fn with_role(self, role: UserRole) -> Self {
        self.layer(axum::middleware::from_fn_with_state(role, role_middleware))
            .with_auth()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use axum::{body::Body, extract::Extension, http::Request as HttpRequest, routing::get, Router};
    use tower::ServiceExt;

    const SECRET: &str = "unit_test_secret_that_is_long_enough_for_hs256";

    fn service() -> Arc<AuthService> {
        Arc::new(AuthService::new(
            AuthConfig::new(SECRET.into(), "lpg-api".into(), Duration::from_secs(3600)),
            Arc::new(DatabaseConnection::Disconnected),
        ))
    }

    fn account(role: UserRole, pangkalan_id: Option<Uuid>) -> user::Model {
        let now = Utc::now();
        user::Model {
            id: Uuid::new_v4(),
            email: "op@agen.id".into(),
            password_hash: String::new(),
            name: "Operator".into(),
            role,
            pangkalan_id,
            is_active: true,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn issued_token_round_trips_claims() {
        let svc = service();
        let depot = Uuid::new_v4();
        let acct = account(UserRole::Pangkalan, Some(depot));
        let pair = svc.generate_token(&acct).unwrap();

        let claims = svc.validate_token(&pair.access_token).unwrap();
        assert_eq!(claims.sub, acct.id.to_string());
        assert_eq!(claims.role, UserRole::Pangkalan);
        assert_eq!(claims.pangkalan_id, Some(depot));
        assert_eq!(claims.iss, "lpg-api");
    }

    #[test]
    fn tampered_and_foreign_tokens_are_rejected() {
        let svc = service();
        let pair = svc.generate_token(&account(UserRole::Admin, None)).unwrap();

        let mut tampered = pair.access_token.clone();
        tampered.push('x');
        assert_matches!(svc.validate_token(&tampered), Err(AuthError::InvalidToken));

        let other = AuthService::new(
            AuthConfig::new(
                "another_secret_that_is_also_long_enough_xyz".into(),
                "lpg-api".into(),
                Duration::from_secs(3600),
            ),
            svc.db.clone(),
        );
        assert_matches!(
            other.validate_token(&pair.access_token),
            Err(AuthError::InvalidToken)
        );
    }

    #[test]
    fn expired_token_is_rejected() {
        let svc = service();
        let past = Utc::now() - ChronoDuration::hours(2);
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            email: "old@agen.id".into(),
            role: UserRole::Admin,
            pangkalan_id: None,
            jti: Uuid::new_v4().to_string(),
            iat: past.timestamp(),
            exp: (past + ChronoDuration::minutes(5)).timestamp(),
            iss: "lpg-api".into(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        assert_matches!(svc.validate_token(&token), Err(AuthError::TokenExpired));
    }

    #[test]
    fn pangkalan_scope_rules() {
        let own = Uuid::new_v4();
        let user = AuthUser {
            user_id: Uuid::new_v4(),
            email: "p@agen.id".into(),
            role: UserRole::Pangkalan,
            pangkalan_id: Some(own),
            token_id: "t".into(),
        };
        assert_eq!(user.scope_pangkalan(None).unwrap(), Some(own));
        assert_eq!(user.scope_pangkalan(Some(own)).unwrap(), Some(own));
        assert_matches!(
            user.scope_pangkalan(Some(Uuid::new_v4())),
            Err(ServiceError::Forbidden(_))
        );
        assert!(user.ensure_pangkalan_access(Uuid::new_v4()).is_err());

        let admin = AuthUser {
            role: UserRole::Admin,
            pangkalan_id: None,
            ..user
        };
        let any = Uuid::new_v4();
        assert_eq!(admin.scope_pangkalan(Some(any)).unwrap(), Some(any));
        assert!(admin.has_role(UserRole::Pangkalan));
    }

    fn guarded_app(svc: Arc<AuthService>) -> Router {
        Router::new()
            .route("/admin", get(|| async { "ok" }))
            .with_role(UserRole::Admin)
            .layer(Extension(svc))
    }

    async fn status_for(app: Router, auth: Option<String>) -> StatusCode {
        let mut builder = HttpRequest::builder().uri("/admin");
        if let Some(value) = auth {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        app.oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    /// Auth service over a migrated in-memory database holding `accounts`.
    async fn service_with(accounts: &[user::Model]) -> Arc<AuthService> {
        let db = crate::db::establish_connection("sqlite::memory:")
            .await
            .unwrap();
        crate::db::run_migrations(&db).await.unwrap();
        for acct in accounts {
            user::ActiveModel::from(acct.clone())
                .reset_all()
                .insert(&db)
                .await
                .unwrap();
        }
        Arc::new(AuthService::new(
            AuthConfig::new(SECRET.into(), "lpg-api".into(), Duration::from_secs(3600)),
            Arc::new(db),
        ))
    }

    #[tokio::test]
    async fn middleware_enforces_token_and_role() {
        let mut admin = account(UserRole::Admin, None);
        admin.email = "admin@agen.id".into();
        let depot = account(UserRole::Pangkalan, None);
        let svc = service_with(&[admin.clone(), depot.clone()]).await;
        let admin_token = svc.generate_token(&admin).unwrap().access_token;
        let depot_token = svc.generate_token(&depot).unwrap().access_token;

        assert_eq!(status_for(guarded_app(svc.clone()), None).await, StatusCode::UNAUTHORIZED);
        assert_eq!(
            status_for(guarded_app(svc.clone()), Some("Basic abc".into())).await,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_for(guarded_app(svc.clone()), Some(format!("Bearer {depot_token}"))).await,
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_for(guarded_app(svc), Some(format!("Bearer {admin_token}"))).await,
            StatusCode::OK
        );
    }

    #[tokio::test]
    async fn role_comes_from_the_account_not_the_token() {
        let demoted = account(UserRole::Pangkalan, None);
        let svc = service_with(&[demoted.clone()]).await;
        let issued_as_admin = svc
            .generate_token(&user::Model {
                role: UserRole::Admin,
                ..demoted
            })
            .unwrap()
            .access_token;

        assert_eq!(
            status_for(guarded_app(svc), Some(format!("Bearer {issued_as_admin}"))).await,
            StatusCode::FORBIDDEN
        );
    }

    #[tokio::test]
    async fn token_of_inactive_or_unknown_account_is_rejected() {
        let mut inactive = account(UserRole::Admin, None);
        inactive.is_active = false;
        let svc = service_with(&[inactive.clone()]).await;

        for acct in [inactive, account(UserRole::Admin, None)] {
            let token = svc.generate_token(&acct).unwrap().access_token;
            let claims = svc.validate_token(&token).unwrap();
            assert_matches!(svc.authenticate(claims).await, Err(AuthError::AccountDisabled));
            assert_eq!(
                status_for(guarded_app(svc.clone()), Some(format!("Bearer {token}"))).await,
                StatusCode::UNAUTHORIZED
            );
        }
    }
}
