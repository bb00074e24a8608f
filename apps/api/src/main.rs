mod config;
mod errors;
mod llm_client;
mod models;
mod parsing;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::{CompletionSource, DisabledSource, LlmClient};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_directives())),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume API v{}", env!("CARGO_PKG_VERSION"));

    let source: Arc<dyn CompletionSource> = match &config.hf_access_token {
        Some(token) => {
            let client = LlmClient::new(token.clone())?;
            info!("LLM client initialized (model: {})", llm_client::MODEL);
            Arc::new(client)
        }
        None => {
            warn!("HF_ACCESS_TOKEN not set; every request uses the fallback extractors");
            Arc::new(DisabledSource)
        }
    };
    info!("Primary source budget: {}s", config.primary_timeout_secs);

    let state = AppState {
        source,
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
