//! Web server for Materials Hub.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;

use crate::config::{StorageConfig, WebConfig};
use crate::db::RefreshTokenRepository;
use crate::file::ObjectStore;
use crate::{Database, Result};

use super::handlers::AppState;
use super::middleware::JwtState;
use super::router::{create_health_router, create_router};

/// Web server for the API.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Application state.
    app_state: Arc<AppState>,
    /// JWT state.
    jwt_state: Arc<JwtState>,
    /// CORS allowed origins.
    cors_origins: Vec<String>,
}

impl WebServer {
    /// Create a new web server.
    pub fn new(
        web_config: &WebConfig,
        storage_config: &StorageConfig,
        db: Arc<Database>,
    ) -> Result<Self> {
        let addr = format!("{}:{}", web_config.host, web_config.port)
            .parse()
            .map_err(|e| {
                crate::HubError::Config(format!(
                    "invalid web server address {}:{}: {e}",
                    web_config.host, web_config.port
                ))
            })?;

        let store = Arc::new(ObjectStore::new(
            &storage_config.path,
            &storage_config.public_base_url,
        )?);
        tracing::info!("Object store initialized at: {}", storage_config.path);

        let app_state = AppState::new(
            db,
            store,
            &web_config.jwt_secret,
            web_config.jwt_access_token_expiry_secs,
            web_config.jwt_refresh_token_expiry_days,
            storage_config.max_upload_size_mb * 1024 * 1024,
        );

        let jwt_state = Arc::new(JwtState::new(&web_config.jwt_secret));

        Ok(Self {
            addr,
            app_state: Arc::new(app_state),
            jwt_state,
            cors_origins: web_config.cors_origins.clone(),
        })
    }

    /// Get the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Start the refresh-token cleanup background task.
    ///
    /// Runs every hour and removes expired and revoked refresh tokens.
    fn start_token_cleanup_task(db: Arc<Database>) {
        tokio::spawn(async move {
            const CLEANUP_INTERVAL_SECS: u64 = 3600;

            let mut interval = tokio::time::interval(Duration::from_secs(CLEANUP_INTERVAL_SECS));

            // Skip the first immediate tick
            interval.tick().await;

            loop {
                interval.tick().await;

                let repo = RefreshTokenRepository::new(db.pool());
                match repo.cleanup_expired().await {
                    Ok(count) => {
                        if count > 0 {
                            tracing::info!(
                                deleted_count = count,
                                "Cleaned up expired/revoked refresh tokens"
                            );
                        } else {
                            tracing::debug!("No expired refresh tokens to clean up");
                        }
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to cleanup refresh tokens");
                    }
                }
            }
        });
    }

    fn build_router(&self) -> axum::Router {
        create_router(
            self.app_state.clone(),
            self.jwt_state.clone(),
            &self.cors_origins,
        )
        .merge(create_health_router())
        .layer(CompressionLayer::new())
    }

    /// Run the web server.
    pub async fn run(self) -> std::result::Result<(), std::io::Error> {
        let db = self.app_state.db.clone();
        let router = self.build_router();

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;

        // Start token cleanup background task after successful bind
        Self::start_token_cleanup_task(db);
        tracing::info!("Token cleanup task started (runs every hour)");

        tracing::info!("Web server listening on http://{}", local_addr);

        axum::serve(listener, router).await
    }

    /// Run the server and return the actual bound address.
    ///
    /// This is useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> std::result::Result<SocketAddr, std::io::Error> {
        let db = self.app_state.db.clone();
        let router = self.build_router();

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;

        Self::start_token_cleanup_task(db);
        tracing::info!("Web server listening on http://{}", local_addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}
