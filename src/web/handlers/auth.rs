//! Authentication handlers.

use axum::{extract::State, Json};
use jsonwebtoken::{encode, EncodingKey, Header};
use std::sync::Arc;

use crate::db::{NewRefreshToken, NewUser, RefreshTokenRepository, User, UserRepository};
use crate::file::ObjectStore;
use crate::web::dto::{
    ApiResponse, LoginRequest, LogoutRequest, MeResponse, RefreshRequest, RegisterRequest,
    SessionResponse, UserInfo, ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::middleware::{AuthUser, JwtClaims};
use crate::Database;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database handle.
    pub db: Arc<Database>,
    /// Object store for uploaded materials.
    pub store: Arc<ObjectStore>,
    /// JWT encoding key.
    pub encoding_key: EncodingKey,
    /// Access token expiry in seconds.
    pub access_token_expiry: u64,
    /// Refresh token expiry in days.
    pub refresh_token_expiry: u64,
    /// Maximum upload size in bytes.
    pub max_upload_size: u64,
}

impl AppState {
    /// Create a new application state.
    pub fn new(
        db: Arc<Database>,
        store: Arc<ObjectStore>,
        jwt_secret: &str,
        access_expiry: u64,
        refresh_expiry: u64,
        max_upload_size: u64,
    ) -> Self {
        Self {
            db,
            store,
            encoding_key: EncodingKey::from_secret(jwt_secret.as_bytes()),
            access_token_expiry: access_expiry,
            refresh_token_expiry: refresh_expiry,
            max_upload_size,
        }
    }

    /// Generate an access token for a user.
    pub fn generate_access_token(&self, user_id: i64, email: &str) -> Result<String, ApiError> {
        let now = chrono::Utc::now().timestamp() as u64;
        let claims = JwtClaims {
            sub: user_id,
            email: email.to_string(),
            iat: now,
            exp: now + self.access_token_expiry,
            jti: uuid::Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to encode JWT: {}", e);
            ApiError::internal("Failed to generate token")
        })
    }

    /// Generate a refresh token.
    pub fn generate_refresh_token(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Issue a new session for a user: access token plus a stored refresh token.
async fn issue_session(state: &AppState, user: &User) -> Result<SessionResponse, ApiError> {
    let access_token = state.generate_access_token(user.id, &user.email)?;
    let refresh_token = state.generate_refresh_token();

    let repo = RefreshTokenRepository::new(state.db.pool());
    let expires_at =
        chrono::Utc::now() + chrono::Duration::days(state.refresh_token_expiry as i64);
    let new_token = NewRefreshToken {
        user_id: user.id,
        token: refresh_token.clone(),
        expires_at: expires_at.format("%Y-%m-%d %H:%M:%S").to_string(),
    };
    repo.create(&new_token).await.map_err(|e| {
        tracing::error!("Failed to store refresh token: {}", e);
        ApiError::internal("Failed to create session")
    })?;

    Ok(SessionResponse {
        access_token,
        refresh_token,
        expires_in: state.access_token_expiry,
        user: UserInfo {
            id: user.id,
            email: user.email.clone(),
        },
    })
}

/// POST /api/auth/register - Account registration.
///
/// This deployment runs without an email-confirmation step, so a
/// successful registration immediately yields a session.
pub async fn register(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<Json<ApiResponse<SessionResponse>>, ApiError> {
    crate::auth::validation::validate_email(&req.email)
        .map_err(|e| ApiError::unprocessable(e.to_string()))?;
    crate::validate_password(&req.password)
        .map_err(|e| ApiError::unprocessable(e.to_string()))?;

    let password_hash =
        crate::hash_password(&req.password).map_err(|_| ApiError::internal("Failed to hash password"))?;

    let repo = UserRepository::new(state.db.pool());
    let new_user = NewUser {
        email: req.email.clone(),
        password: password_hash,
    };
    let user = repo.create(&new_user).await.map_err(|e| {
        if e.to_string().contains("UNIQUE") {
            ApiError::conflict("Email already registered")
        } else {
            tracing::error!("User creation failed: {}", e);
            ApiError::internal("Failed to create user")
        }
    })?;

    let session = issue_session(&state, &user).await?;
    Ok(Json(ApiResponse::new(session)))
}

/// POST /api/auth/login - Sign in with email and password.
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<SessionResponse>>, ApiError> {
    // Uniform error for unknown email and wrong password
    let repo = UserRepository::new(state.db.pool());
    let user = repo
        .get_by_email(&req.email)
        .await
        .map_err(|_| ApiError::unauthorized("Invalid email or password"))?
        .ok_or_else(|| ApiError::unauthorized("Invalid email or password"))?;

    crate::verify_password(&req.password, &user.password)
        .map_err(|_| ApiError::unauthorized("Invalid email or password"))?;

    if !user.is_active {
        return Err(ApiError::forbidden("Account is disabled"));
    }

    let session = issue_session(&state, &user).await?;

    let _ = repo.update_last_login(user.id).await;

    Ok(Json(ApiResponse::new(session)))
}

/// POST /api/auth/logout - Revoke the presented refresh token.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LogoutRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let repo = RefreshTokenRepository::new(state.db.pool());
    let _ = repo.revoke(&req.refresh_token).await;

    Ok(Json(ApiResponse::new(())))
}

/// POST /api/auth/refresh - Exchange a refresh token for a new session.
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<ApiResponse<SessionResponse>>, ApiError> {
    let token_repo = RefreshTokenRepository::new(state.db.pool());
    let token = token_repo
        .get_valid_token(&req.refresh_token)
        .await
        .map_err(|_| ApiError::internal("Database error"))?
        .ok_or_else(|| ApiError::unauthorized("Invalid or expired refresh token"))?;

    let user_repo = UserRepository::new(state.db.pool());
    let user = user_repo
        .get_by_id(token.user_id)
        .await
        .map_err(|_| ApiError::internal("Database error"))?
        .ok_or_else(|| ApiError::unauthorized("User not found"))?;

    if !user.is_active {
        return Err(ApiError::forbidden("Account is disabled"));
    }

    // Rotate: the presented token is revoked before the new one is issued
    let _ = token_repo.revoke(&req.refresh_token).await;

    let session = issue_session(&state, &user).await?;
    Ok(Json(ApiResponse::new(session)))
}

/// GET /api/auth/me - Current session's user info.
pub async fn me(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
) -> Result<Json<ApiResponse<MeResponse>>, ApiError> {
    let repo = UserRepository::new(state.db.pool());
    let user = repo
        .get_by_id(claims.sub)
        .await
        .map_err(|_| ApiError::internal("Database error"))?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let response = MeResponse {
        id: user.id,
        email: user.email,
        created_at: user.created_at.clone(),
        last_login_at: user.last_login.clone(),
    };

    Ok(Json(ApiResponse::new(response)))
}
