mod ats;
mod config;
mod errors;
mod llm_client;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::ats::scorer::{AtsScorer, KeywordAtsScorer, LlmAtsScorer};
use crate::config::{Config, ScorerBackend};
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Configuration first so the log level can come from it
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CVolt API v{}", env!("CARGO_PKG_VERSION"));

    let ats_scorer = build_ats_scorer(&config)?;
    info!(
        "ATS scorer initialized (backend: {}, keyword policy: {})",
        ats_scorer.backend(),
        config.keyword_policy.version()
    );

    let state = AppState {
        config: config.clone(),
        ats_scorer,
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

/// Keyword scoring by default; the LLM backend only when explicitly selected.
fn build_ats_scorer(config: &Config) -> Result<Arc<dyn AtsScorer>> {
    match config.scorer {
        ScorerBackend::Keyword => Ok(Arc::new(KeywordAtsScorer::new(config.keyword_policy))),
        ScorerBackend::Llm => {
            let api_key = config
                .anthropic_api_key
                .clone()
                .context("ANTHROPIC_API_KEY is required for the llm ATS scorer")?;
            let llm = LlmClient::new(api_key).context("failed to build LLM HTTP client")?;
            info!("LLM client initialized (model: {})", llm_client::MODEL);
            Ok(Arc::new(LlmAtsScorer(llm)))
        }
    }
}
