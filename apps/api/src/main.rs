mod compare;
mod config;
mod errors;
mod export;
mod ingest;
mod llm_client;
mod models;
mod optimization;
mod routes;
mod session;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::compare::cache::DiffCache;
use crate::config::Config;
use crate::ingest::DocumentParser;
use crate::llm_client::LlmClient;
use crate::optimization::optimizer::LlmResumeOptimizer;
use crate::optimization::pipeline::InFlight;
use crate::routes::build_router;
use crate::session::store::{KeyValueStore, MemoryStore, RedisStore};
use crate::session::SessionManager;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Tailor API v{}", env!("CARGO_PKG_VERSION"));

    // Session store: Redis when configured, process memory otherwise
    let store: Arc<dyn KeyValueStore> = match &config.redis_url {
        Some(url) => {
            let store = RedisStore::connect(url).await?;
            info!("Redis session store connected");
            Arc::new(store)
        }
        None => {
            warn!("REDIS_URL not set, sessions are kept in memory");
            Arc::new(MemoryStore::default())
        }
    };

    // Initialize LLM client. A missing key is reported per optimize call.
    let llm = LlmClient::new(config.anthropic_api_key.clone())?;
    if llm.has_credential() {
        info!("LLM client initialized (model: {})", llm_client::MODEL);
    } else {
        warn!("ANTHROPIC_API_KEY not set, optimization requests will fail");
    }

    let state = AppState {
        sessions: SessionManager::new(store),
        optimizer: Arc::new(LlmResumeOptimizer::new(llm)),
        parser: DocumentParser::default(),
        diff_cache: Arc::new(DiffCache::with_capacity(config.diff_cache_capacity)),
        in_flight: Arc::new(InFlight::default()),
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
