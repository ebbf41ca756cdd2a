use crate::config::RelayConfig;
use crate::signaling::{RelayService, ws_handler};
use anyhow::{Context, Result};
use axum::Router;
use axum::routing::get;
use opticlink_core::utils::SIGNALING_PATH;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::{error, info};

pub fn router(service: RelayService, config: &RelayConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let router = Router::new()
        .route(SIGNALING_PATH, get(ws_handler))
        .with_state(service);

    let router = match &config.static_dir {
        Some(dir) => {
            info!("Serving phone client from {}", dir.display());
            router.fallback_service(ServeDir::new(dir))
        }
        None => router,
    };

    router.layer(cors)
}

/// A relay bound to its socket and running in the background.
pub struct RelayServer {
    pub local_addr: SocketAddr,
    pub service: RelayService,
    handle: JoinHandle<()>,
}

impl RelayServer {
    pub async fn bind(config: RelayConfig) -> Result<Self> {
        let listener = TcpListener::bind(config.bind_addr)
            .await
            .with_context(|| format!("Failed to bind relay on {}", config.bind_addr))?;
        let local_addr = listener.local_addr()?;

        let service = RelayService::new();
        let app = router(service.clone(), &config);

        info!("Signaling relay listening on ws://{}{}", local_addr, SIGNALING_PATH);
        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                error!("Relay server stopped: {}", e);
            }
        });

        Ok(Self {
            local_addr,
            service,
            handle,
        })
    }

    pub fn url(&self) -> String {
        format!("ws://{}{}", self.local_addr, SIGNALING_PATH)
    }

    /// Runs until the server task ends.
    pub async fn wait(self) -> Result<()> {
        self.handle.await.context("Relay task panicked")
    }

    pub fn shutdown(self) {
        self.handle.abort();
    }
}

pub async fn serve(config: RelayConfig) -> Result<()> {
    RelayServer::bind(config).await?.wait().await
}
