mod advisor;
mod catalog;
mod config;
mod errors;
mod i18n;
mod llm_client;
mod models;
mod routes;
mod session;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::advisor::Advisor;
use crate::catalog::Catalog;
use crate::config::Config;
use crate::llm_client::GeminiClient;
use crate::routes::build_router;
use crate::session::store::SessionStore;
use crate::state::AppState;

const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting DataHub API v{}", env!("CARGO_PKG_VERSION"));

    // Dataset: embedded unless overridden; integrity failures abort startup
    let catalog = Arc::new(match &config.catalog_dir {
        Some(dir) => {
            info!("Loading catalog from {}", dir.display());
            Catalog::from_dir(dir)?
        }
        None => Catalog::embedded()?,
    });

    // Initialize the Gemini client
    if config.gemini_api_key.is_none() {
        warn!("GEMINI_API_KEY is not set; AI features will answer with fallbacks");
    }
    let gemini = GeminiClient::new(
        config.gemini_api_key.clone(),
        Duration::from_secs(config.llm_timeout_secs),
    )?;
    info!(
        "LLM client initialized (model: {}, cache: {}, capacity {})",
        llm_client::MODEL,
        config.ai_cache_enabled,
        config.ai_cache_capacity
    );
    let advisor = Arc::new(Advisor::new(
        Arc::new(gemini),
        catalog.clone(),
        config.ai_cache_enabled,
        config.ai_cache_capacity,
    ));

    let sessions = SessionStore::new();
    if config.session_ttl_secs > 0 {
        let ttl = chrono::Duration::from_std(Duration::from_secs(config.session_ttl_secs))?;
        sessions.spawn_sweeper(ttl, SESSION_SWEEP_INTERVAL);
        info!("Idle sessions expire after {}s", config.session_ttl_secs);
    }

    let state = AppState {
        catalog,
        sessions,
        advisor,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
