use anyhow::{bail, Context, Result};

use crate::ats::keywords::{KeywordPolicy, StopwordPolicy, WordCharset};

const DEFAULT_MAX_INPUT_BYTES: usize = 256 * 1024;
const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Which `AtsScorer` backend the service runs with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScorerBackend {
    #[default]
    Keyword,
    Llm,
}

/// Application configuration loaded from environment variables.
/// Startup fails if a value is present but malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub scorer: ScorerBackend,
    pub keyword_policy: KeywordPolicy,
    /// Upper bound on each of `resumeText` / `jobDescription`, in bytes.
    pub max_input_bytes: usize,
    /// Upper bound on a whole request body (covers PDF uploads).
    pub max_body_bytes: usize,
    /// Only required when `scorer == ScorerBackend::Llm`.
    pub anthropic_api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            scorer: ScorerBackend::Keyword,
            keyword_policy: KeywordPolicy::default(),
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            anthropic_api_key: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup so parsing is testable
    /// without touching process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let port = match lookup("PORT") {
            Some(v) => v
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            None => defaults.port,
        };

        let scorer = match lookup("ATS_SCORER") {
            Some(v) => parse_scorer(&v)?,
            None => defaults.scorer,
        };

        let charset = match lookup("ATS_CHARSET") {
            Some(v) => parse_charset(&v)?,
            None => WordCharset::default(),
        };

        let stopwords = match lookup("ATS_STOPWORDS") {
            Some(v) => parse_stopwords(&v)?,
            None => StopwordPolicy::default(),
        };

        let max_input_bytes = parse_size(&lookup, "ATS_MAX_INPUT_BYTES", defaults.max_input_bytes)?;
        let max_body_bytes = parse_size(&lookup, "ATS_MAX_BODY_BYTES", defaults.max_body_bytes)?;

        let anthropic_api_key = lookup("ANTHROPIC_API_KEY").filter(|k| !k.trim().is_empty());
        if scorer == ScorerBackend::Llm && anthropic_api_key.is_none() {
            bail!("Required environment variable 'ANTHROPIC_API_KEY' is not set (ATS_SCORER=llm)");
        }

        Ok(Config {
            port,
            rust_log: lookup("RUST_LOG").unwrap_or(defaults.rust_log),
            scorer,
            keyword_policy: KeywordPolicy { charset, stopwords },
            max_input_bytes,
            max_body_bytes,
            anthropic_api_key,
        })
    }
}

fn parse_scorer(value: &str) -> Result<ScorerBackend> {
    match value.trim().to_ascii_lowercase().as_str() {
        "keyword" => Ok(ScorerBackend::Keyword),
        "llm" => Ok(ScorerBackend::Llm),
        other => bail!("ATS_SCORER must be 'keyword' or 'llm', got '{other}'"),
    }
}

fn parse_charset(value: &str) -> Result<WordCharset> {
    match value.trim().to_ascii_lowercase().as_str() {
        "unicode" => Ok(WordCharset::Unicode),
        "ascii" => Ok(WordCharset::Ascii),
        other => bail!("ATS_CHARSET must be 'unicode' or 'ascii', got '{other}'"),
    }
}

fn parse_stopwords(value: &str) -> Result<StopwordPolicy> {
    match value.trim().to_ascii_lowercase().as_str() {
        "keep" => Ok(StopwordPolicy::Keep),
        "filter" => Ok(StopwordPolicy::Filter),
        other => bail!("ATS_STOPWORDS must be 'keep' or 'filter', got '{other}'"),
    }
}

fn parse_size<F>(lookup: &F, key: &str, default: usize) -> Result<usize>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    let value = raw
        .trim()
        .parse::<usize>()
        .with_context(|| format!("{key} must be a positive integer"))?;
    if value == 0 {
        bail!("{key} must be greater than zero");
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_empty_env_yields_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.scorer, ScorerBackend::Keyword);
        assert_eq!(config.keyword_policy, KeywordPolicy::default());
        assert_eq!(config.max_input_bytes, 256 * 1024);
        assert!(config.anthropic_api_key.is_none());
    }

    #[test]
    fn test_policy_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("ATS_CHARSET", "ASCII"),
            ("ATS_STOPWORDS", "filter"),
        ]))
        .unwrap();
        assert_eq!(config.keyword_policy.charset, WordCharset::Ascii);
        assert_eq!(config.keyword_policy.stopwords, StopwordPolicy::Filter);
    }

    #[test]
    fn test_llm_scorer_requires_api_key() {
        let err = Config::from_lookup(lookup_from(&[("ATS_SCORER", "llm")])).unwrap_err();
        assert!(err.to_string().contains("ANTHROPIC_API_KEY"));

        let config = Config::from_lookup(lookup_from(&[
            ("ATS_SCORER", "llm"),
            ("ANTHROPIC_API_KEY", "sk-test"),
        ]))
        .unwrap();
        assert_eq!(config.scorer, ScorerBackend::Llm);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(Config::from_lookup(lookup_from(&[("PORT", "http")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("ATS_SCORER", "semantic")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("ATS_CHARSET", "latin1")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("ATS_MAX_INPUT_BYTES", "0")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("ATS_MAX_BODY_BYTES", "-5")])).is_err());
    }
}
