//! HTTP server: JSON API, raw table view and static front-end assets.

pub mod html;
pub mod routes;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tracing::{info, warn};

use crate::analysis::TradeAnalyzer;
use crate::config::ServerConfig;
use crate::monitoring::health::HealthState;
use crate::store::PlayerStore;

/// Shared state accessible by all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<PlayerStore>,
    pub analyzer: Arc<TradeAnalyzer>,
    pub health: HealthState,
}

impl AppState {
    pub fn new(store: Arc<PlayerStore>, analyzer: TradeAnalyzer) -> Self {
        let health = HealthState::new(store.clone(), analyzer.is_enabled());
        Self {
            store,
            analyzer: Arc::new(analyzer),
            health,
        }
    }
}

fn cors_layer(origin: &str) -> Result<CorsLayer> {
    let origin = HeaderValue::from_str(origin)
        .with_context(|| format!("Invalid CORS origin: {origin}"))?;
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true))
}

pub fn build_router(state: AppState, config: &ServerConfig) -> Result<Router> {
    let static_dir = &config.static_dir;

    Ok(Router::new()
        .route("/api/players", get(routes::list_players))
        .route("/api/analyze-trade", post(routes::analyze_trade))
        .route("/api/health", get(routes::health))
        .route("/htmltable", get(routes::html_table))
        .route_service("/", ServeFile::new(static_dir.join("index.html")))
        .route_service(
            "/filtertable",
            ServeFile::new(static_dir.join("filtertable.html")),
        )
        .fallback_service(ServeDir::new(static_dir))
        .layer(cors_layer(&config.cors_origin())?)
        .with_state(state))
}

/// Serve until Ctrl-C, then drain in-flight requests.
pub async fn serve(router: Router, addr: &str) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(addr, "HTTP server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C — running until killed");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
