//! HTTP API over a single in-memory [`MenuTree`].
//!
//! The tree lives behind one async mutex; every request takes it for the whole operation, so
//! mutations are serialized and readers always see a finished state.

use std::sync::Arc;

use axum::{
    http::{header, Method},
    Router,
};
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use menutree_core::MenuTree;

pub mod config;
mod endpoints;
mod http_error;

pub use config::{ConfigError, ServerConfig};
pub use endpoints::{Data, PingResponse};
pub use http_error::ApiError;

pub type SharedTree = Arc<Mutex<MenuTree>>;

/// Application state shared across all endpoints
#[derive(Clone)]
pub struct AppState {
    pub tree: SharedTree,
    pub ping_message: Arc<str>,
}

impl AppState {
    pub fn new(tree: MenuTree, ping_message: impl Into<Arc<str>>) -> Self {
        Self {
            tree: Arc::new(Mutex::new(tree)),
            ping_message: ping_message.into(),
        }
    }

    /// In-memory tree built according to `config`.
    pub fn from_config(config: &ServerConfig) -> menutree_core::Result<Self> {
        let mut tree = MenuTree::in_memory();
        if config.seed {
            tree.seed()?;
        }
        Ok(Self::new(tree, config.ping_message.as_str()))
    }
}

pub fn create_router(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .merge(endpoints::routes(state))
        .layer(cors_layer(config))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE]);
    match &config.cors_allow_origin {
        Some(origin) => layer.allow_origin(origin.clone()),
        None => layer.allow_origin(Any),
    }
}

/// Bind to the configured address and serve until ctrl-c.
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    let state = AppState::from_config(&config)?;
    let app = create_router(state, &config);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(
        addr = %listener.local_addr()?,
        seeded = config.seed,
        cors_origin = ?config.cors_allow_origin,
        "menutree server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("menutree server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
