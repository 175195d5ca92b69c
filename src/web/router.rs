//! Router configuration for the Web API.

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{
    delete_material, download_material, list_materials, login, logout, me, refresh, register,
    upload_material, AppState,
};
use super::middleware::{create_cors_layer, jwt_auth, JwtState};

/// Headroom added to the body limit for multipart framing overhead.
const BODY_LIMIT_OVERHEAD: usize = 1024 * 1024;

/// Create the main API router.
pub fn create_router(
    app_state: Arc<AppState>,
    jwt_state: Arc<JwtState>,
    cors_origins: &[String],
) -> Router {
    // Auth routes (no authentication required)
    let auth_public_routes = Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/refresh", post(refresh))
        .route("/register", post(register));

    // Auth routes (authentication required)
    let auth_protected_routes = Router::new().route("/me", get(me));

    let auth_routes = Router::new()
        .merge(auth_public_routes)
        .merge(auth_protected_routes);

    // Material routes (all require authentication via the AuthUser extractor)
    let material_routes = Router::new()
        .route("/", get(list_materials).post(upload_material))
        .route("/:id", delete(delete_material))
        .route("/:id/download", get(download_material));

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/materials", material_routes);

    // Body limit sized to the upload cap plus headroom; requests inside the
    // window are rejected by the size rule, bodies that blow past it fail
    // during the multipart read and the upload handler maps that failure to
    // the same message
    let body_limit = app_state.max_upload_size as usize + BODY_LIMIT_OVERHEAD;

    let jwt_state_for_middleware = jwt_state.clone();

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins))
                .layer(middleware::from_fn(move |req, next| {
                    let state = jwt_state_for_middleware.clone();
                    jwt_auth(state, req, next)
                })),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}
