use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::config::ScorerBackend;
use crate::state::AppState;

/// GET /health
/// Returns service status plus the active ATS backend. `keywordPolicy` is
/// null unless the keyword backend is serving.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let keyword_policy = match state.config.scorer {
        ScorerBackend::Keyword => Some(state.config.keyword_policy.version()),
        ScorerBackend::Llm => None,
    };

    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "cvolt-api",
        "atsScorer": state.ats_scorer.backend(),
        "keywordPolicy": keyword_policy,
    }))
}
