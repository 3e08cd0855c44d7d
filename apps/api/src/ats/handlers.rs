//! Axum route handlers for the ATS API.

use axum::{
    extract::{multipart::MultipartRejection, rejection::JsonRejection, Multipart, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::ats::pdf::extract_pdf_text;
use crate::ats::scorer::AnalysisResult;
use crate::errors::AppError;
use crate::state::AppState;

const RESUME_FIELD: &str = "resumeText";
const JOB_FIELD: &str = "jobDescription";
const RESUME_FILE_PART: &str = "resume";
const RESUME_PDF_TEXT: &str = "resume PDF text";

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

/// Both fields are optional on the wire so a missing one is reported by name
/// instead of as a generic deserialization failure.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub resume_text: Option<String>,
    pub job_description: Option<String>,
}

/// A request that passed boundary validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisInput {
    pub resume_text: String,
    pub job_description: String,
}

impl AnalysisInput {
    /// Both fields must be present, non-blank, and within `max_bytes`.
    pub fn validate(
        resume_text: Option<String>,
        job_description: Option<String>,
        max_bytes: usize,
    ) -> Result<Self, AppError> {
        let resume_text = resume_text.filter(|t| !t.trim().is_empty());
        let job_description = job_description.filter(|t| !t.trim().is_empty());

        let (resume_text, job_description) = match (resume_text, job_description) {
            (Some(r), Some(j)) => (r, j),
            (None, Some(_)) => {
                return Err(AppError::MissingInput(format!("{RESUME_FIELD} is required")))
            }
            (Some(_), None) => {
                return Err(AppError::MissingInput(format!("{JOB_FIELD} is required")))
            }
            (None, None) => {
                return Err(AppError::MissingInput(format!(
                    "{RESUME_FIELD} and {JOB_FIELD} are required"
                )))
            }
        };

        check_input_size(RESUME_FIELD, &resume_text, max_bytes)?;
        check_input_size(JOB_FIELD, &job_description, max_bytes)?;

        Ok(Self {
            resume_text,
            job_description,
        })
    }
}

fn check_input_size(name: &str, text: &str, max_bytes: usize) -> Result<(), AppError> {
    if text.len() > max_bytes {
        return Err(AppError::InputTooLarge(format!(
            "{name} exceeds the {max_bytes}-byte limit"
        )));
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/ats/analyze
///
/// Scores a resume against a job description and lists matched and missing keywords.
pub async fn handle_analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalysisResult>, AppError> {
    let Json(request) = payload.map_err(json_error)?;

    let input = AnalysisInput::validate(
        request.resume_text,
        request.job_description,
        state.config.max_input_bytes,
    )?;

    run_analysis(&state, &input).await.map(Json)
}

/// POST /api/v1/ats/analyze-pdf
///
/// Multipart variant: `resume` is an uploaded PDF, `jobDescription` a text part.
pub async fn handle_analyze_pdf(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalysisResult>, AppError> {
    let mut multipart = multipart.map_err(|e| AppError::Validation(e.body_text()))?;

    let mut resume_pdf = None;
    let mut job_description = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            RESUME_FILE_PART => {
                let data = field.bytes().await.map_err(multipart_error)?;
                if !data.is_empty() {
                    resume_pdf = Some(data);
                }
            }
            JOB_FIELD => {
                job_description = Some(field.text().await.map_err(multipart_error)?);
            }
            _ => {}
        }
    }

    let Some(resume_pdf) = resume_pdf else {
        return Err(match job_description.as_deref().map(str::trim) {
            Some(j) if !j.is_empty() => {
                AppError::MissingInput(format!("{RESUME_FILE_PART} PDF is required"))
            }
            _ => AppError::MissingInput(format!(
                "{RESUME_FILE_PART} PDF and {JOB_FIELD} are required"
            )),
        });
    };

    // Validate the text part before paying for PDF parsing.
    if job_description
        .as_deref()
        .map_or(true, |j| j.trim().is_empty())
    {
        return Err(AppError::MissingInput(format!("{JOB_FIELD} is required")));
    }

    let resume_text = extract_pdf_text(resume_pdf).await?;
    check_input_size(RESUME_PDF_TEXT, &resume_text, state.config.max_input_bytes)?;
    let input = AnalysisInput::validate(
        Some(resume_text),
        job_description,
        state.config.max_input_bytes,
    )?;

    run_analysis(&state, &input).await.map(Json)
}

async fn run_analysis(state: &AppState, input: &AnalysisInput) -> Result<AnalysisResult, AppError> {
    let scorer = state.ats_scorer.as_ref();
    let result = scorer
        .analyze(&input.resume_text, &input.job_description)
        .await?;

    info!(
        backend = scorer.backend(),
        policy = state.config.keyword_policy.version(),
        score = result.score,
        match_count = result.match_count,
        job_keyword_count = result.job_keyword_count,
        "ATS analysis complete"
    );

    Ok(result)
}

fn json_error(e: JsonRejection) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::InputTooLarge(e.body_text())
    } else {
        AppError::Validation(e.body_text())
    }
}

fn multipart_error(e: axum::extract::multipart::MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::InputTooLarge(e.body_text())
    } else {
        AppError::Validation(e.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[test]
    fn test_both_fields_present_passes() {
        let input = AnalysisInput::validate(some("rust dev"), some("rust role"), 1024).unwrap();
        assert_eq!(input.resume_text, "rust dev");
        assert_eq!(input.job_description, "rust role");
    }

    #[test]
    fn test_empty_resume_is_missing_input() {
        let err = AnalysisInput::validate(some(""), some("Python developer needed"), 1024)
            .unwrap_err();
        match err {
            AppError::MissingInput(msg) => assert_eq!(msg, "resumeText is required"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_job_description_is_missing_input() {
        let err = AnalysisInput::validate(some("abc"), some(""), 1024).unwrap_err();
        match err {
            AppError::MissingInput(msg) => assert_eq!(msg, "jobDescription is required"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_whitespace_only_counts_as_missing() {
        let err = AnalysisInput::validate(some("  \n\t"), None, 1024).unwrap_err();
        match err {
            AppError::MissingInput(msg) => {
                assert_eq!(msg, "resumeText and jobDescription are required")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_short_word_resume_is_not_missing() {
        // Non-blank input is valid even if it yields no keywords.
        assert!(AnalysisInput::validate(some("a b"), some("to be"), 1024).is_ok());
    }

    #[test]
    fn test_oversized_field_is_rejected() {
        let big = "x".repeat(2048);
        let err = AnalysisInput::validate(some("ok"), Some(big), 1024).unwrap_err();
        match err {
            AppError::InputTooLarge(msg) => assert!(msg.contains("jobDescription")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_oversized_pdf_text_names_the_upload() {
        let extracted = "word ".repeat(400);
        let err = check_input_size(RESUME_PDF_TEXT, &extracted, 1024).unwrap_err();
        match err {
            AppError::InputTooLarge(msg) => {
                assert_eq!(msg, "resume PDF text exceeds the 1024-byte limit");
                assert!(!msg.contains(RESUME_FIELD));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_request_deserializes_with_absent_fields() {
        let req: AnalyzeRequest = serde_json::from_str(r#"{"resumeText": "x"}"#).unwrap();
        assert_eq!(req.resume_text.as_deref(), Some("x"));
        assert!(req.job_description.is_none());

        let req: AnalyzeRequest = serde_json::from_str(r#"{"jobDescription": null}"#).unwrap();
        assert!(req.job_description.is_none());
    }
}
