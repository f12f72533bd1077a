use shelf_crypto::SigningSecret;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;
use crate::state::AppState;

/// Shelf HTTP server.
pub struct ShelfServer {
    config: ServerConfig,
    state: AppState,
}

impl ShelfServer {
    /// Open the data directory and prepare the services. Without a
    /// configured secret a random one is generated, so issued tokens stop
    /// verifying on restart.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let secret = match config.signing_secret() {
            Some(secret) => secret,
            None => {
                tracing::warn!("no token secret configured; generated an ephemeral one");
                SigningSecret::generate()
            }
        };
        let state = AppState::from_config(&config, &secret)?;
        Ok(Self { config, state })
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Build the router with tracing and CORS layers applied.
    pub fn router(&self) -> axum::Router {
        let router = build_router(self.state.clone()).layer(TraceLayer::new_for_http());
        if self.config.cors_permissive {
            router.layer(CorsLayer::permissive())
        } else {
            router
        }
    }

    /// Start serving requests until Ctrl-C.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!(
            data_dir = %self.config.data_dir.display(),
            "Shelf server listening on {}",
            self.config.bind_addr
        );
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
