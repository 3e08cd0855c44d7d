//! Match Scorer: pluggable, trait-based ATS analysis of a resume against a job description.
//!
//! Default: `KeywordAtsScorer` (pure-Rust, deterministic, fully testable).
//! Opt-in: `LlmAtsScorer` (asks the LLM for the same result shape; not reproducible).
//!
//! `AppState` holds an `Arc<dyn AtsScorer>`, chosen at startup via `ATS_SCORER`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::ats::keywords::{extract_keywords, KeywordPolicy};
use crate::ats::prompts::{ats_analysis_prompt, ATS_ANALYSIS_SYSTEM};
use crate::errors::AppError;
use crate::llm_client::LlmClient;

/// Display cap for `missing_keywords`. Never an input to the score.
pub const MISSING_KEYWORDS_DISPLAY_LIMIT: usize = 15;

// ────────────────────────────────────────────────────────────────────────────
// Output data model (shared across all scorer backends)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// 0 – 100, share of job keywords found in the resume.
    pub score: u32,
    pub matched_keywords: Vec<String>,
    /// Capped at `MISSING_KEYWORDS_DISPLAY_LIMIT` entries.
    pub missing_keywords: Vec<String>,
    pub match_count: usize,
    /// Untruncated size of the job description's keyword set.
    pub job_keyword_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_keyword_count: Option<usize>,
}

impl AnalysisResult {
    /// Re-establishes the result invariants on a result from an untrusted
    /// producer (the LLM backend).
    pub fn normalized(mut self) -> Self {
        self.score = self.score.min(100);
        self.missing_keywords.truncate(MISSING_KEYWORDS_DISPLAY_LIMIT);
        self.match_count = self.matched_keywords.len();
        self
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Implement this to swap analysis backends without touching the handlers.
#[async_trait]
pub trait AtsScorer: Send + Sync {
    /// Short label for logs and `/health`: "keyword" | "llm".
    fn backend(&self) -> &'static str;

    async fn analyze(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> Result<AnalysisResult, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// KeywordAtsScorer: default
// ────────────────────────────────────────────────────────────────────────────

pub struct KeywordAtsScorer {
    pub policy: KeywordPolicy,
}

impl KeywordAtsScorer {
    pub fn new(policy: KeywordPolicy) -> Self {
        Self { policy }
    }
}

#[async_trait]
impl AtsScorer for KeywordAtsScorer {
    fn backend(&self) -> &'static str {
        "keyword"
    }

    async fn analyze(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> Result<AnalysisResult, AppError> {
        // Linear in input size but inputs may be a few hundred KB; keep it off
        // the async workers. Owned copies for the 'static closure bound.
        let resume = resume_text.to_owned();
        let job = job_description.to_owned();
        let policy = self.policy;

        tokio::task::spawn_blocking(move || analyze(&resume, &job, &policy))
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("keyword analysis task failed: {e}")))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// LlmAtsScorer: opt-in
// ────────────────────────────────────────────────────────────────────────────

pub struct LlmAtsScorer(pub LlmClient);

#[async_trait]
impl AtsScorer for LlmAtsScorer {
    fn backend(&self) -> &'static str {
        "llm"
    }

    async fn analyze(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> Result<AnalysisResult, AppError> {
        let prompt = ats_analysis_prompt(job_description, resume_text);

        let result: AnalysisResult = self
            .0
            .call_json(&prompt, ATS_ANALYSIS_SYSTEM)
            .await
            .map_err(|e| AppError::Llm(format!("ATS analysis failed: {e}")))?;

        Ok(result.normalized())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Core keyword algorithm
// ────────────────────────────────────────────────────────────────────────────

/// Deterministic lexical analysis. Pure and total.
///
/// 1. Extract both keyword sets under `policy`.
/// 2. matched = job ∩ resume, missing = job \ resume, both in job order.
/// 3. score = round_half_up(|matched| / |job| × 100), 0 when the job set is empty.
pub fn analyze(resume_text: &str, job_description: &str, policy: &KeywordPolicy) -> AnalysisResult {
    let resume_keywords = extract_keywords(resume_text, policy);
    let job_keywords = extract_keywords(job_description, policy);

    let matched_keywords: Vec<String> = job_keywords
        .intersection_in_order(&resume_keywords)
        .map(str::to_string)
        .collect();

    let missing_keywords: Vec<String> = job_keywords
        .difference_in_order(&resume_keywords)
        .take(MISSING_KEYWORDS_DISPLAY_LIMIT)
        .map(str::to_string)
        .collect();

    let match_count = matched_keywords.len();
    let job_keyword_count = job_keywords.len();

    AnalysisResult {
        score: match_score(match_count, job_keyword_count),
        matched_keywords,
        missing_keywords,
        match_count,
        job_keyword_count,
        resume_keyword_count: Some(resume_keywords.len()),
    }
}

/// Percentage rounded half-up, capped at 100.
fn match_score(matched: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let (matched, total) = (matched as u64, total as u64);
    let rounded = (matched * 200 + total) / (total * 2);
    rounded.min(100) as u32
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
