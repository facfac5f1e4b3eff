mod config;
mod models;
mod routes;
mod services;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::services::{
    discovery::{CacheHints, DiscoveryService},
    tmdb::TmdbClient,
};

/// Application state shared across handlers
pub struct AppState {
    pub config: Config,
    pub discovery: DiscoveryService,
    pub cache_hints: CacheHints,
    pub upstream_configured: bool,
    pub start_time: Instant,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing/logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "discovery_server=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    // Load configuration
    let config = Config::from_env();
    let port = config.port;

    tracing::info!("Starting Discovery Server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.node_env);

    let upstream_configured = config.tmdb_api_key.is_some();
    if !upstream_configured {
        tracing::warn!("TMDB_API_KEY not set, searches will answer with empty pages");
    }

    // Upstream catalog client
    let timeout = Duration::from_millis(config.upstream_timeout_ms);
    let client = TmdbClient::new(
        &config.tmdb_base_url,
        config.tmdb_api_key.as_deref().unwrap_or_default(),
        &config.tmdb_language,
        timeout,
        &config.user_agent,
    )?;
    tracing::info!(
        "TMDB client initialized: {} ({}ms deadline)",
        config.tmdb_base_url,
        config.upstream_timeout_ms
    );

    let discovery = DiscoveryService::new(Arc::new(client), timeout);
    let cache_hints = CacheHints {
        fresh_max_age: config.search_cache_max_age_secs,
        fallback_max_age: config.degraded_cache_max_age_secs,
    };

    // Build application state
    let state = Arc::new(AppState {
        config,
        discovery,
        cache_hints,
        upstream_configured,
        start_time: Instant::now(),
    });

    let app = routes::router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
