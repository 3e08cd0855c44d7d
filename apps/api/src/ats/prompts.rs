// LLM prompt constants for the ATS module.

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;

/// System prompt for LLM-backed ATS analysis.
pub const ATS_ANALYSIS_SYSTEM: &str = JSON_ONLY_SYSTEM;

/// Instructions and output schema for LLM-backed ATS analysis.
const ATS_ANALYSIS_INSTRUCTIONS: &str = r#"You are an expert ATS (Applicant Tracking System) analysis tool. Compare a resume against a job description.

1. Identify the key skills, technologies, and qualifications in the job description.
2. Determine which of these keywords are present in the resume and which are missing.
3. Calculate a match score as the percentage of job description keywords found in the resume.

Return a JSON object with this EXACT schema (no extra fields):
{
  "score": 0,
  "matchedKeywords": ["keyword"],
  "missingKeywords": ["keyword"],
  "matchCount": 0,
  "jobKeywordCount": 0
}

Rules:
- "score" is an integer from 0 to 100.
- "matchCount" equals the length of "matchedKeywords".
- List at most 15 entries in "missingKeywords", most important first."#;

/// Builds the analysis prompt. Both texts are inserted verbatim in a single
/// pass, so placeholder-like text inside either one is never substituted.
pub fn ats_analysis_prompt(job_description: &str, resume_text: &str) -> String {
    format!(
        "{ATS_ANALYSIS_INSTRUCTIONS}\n\nJob Description:\n\"\"\"\n{job_description}\n\"\"\"\n\nResume:\n\"\"\"\n{resume_text}\n\"\"\""
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_both_texts() {
        let prompt = ats_analysis_prompt("Rust engineer", "Built Kafka pipelines");
        assert!(prompt.starts_with(ATS_ANALYSIS_INSTRUCTIONS));
        assert!(prompt.contains("Job Description:\n\"\"\"\nRust engineer\n\"\"\""));
        assert!(prompt.ends_with("Resume:\n\"\"\"\nBuilt Kafka pipelines\n\"\"\""));
    }

    #[test]
    fn test_placeholder_text_in_inputs_is_left_alone() {
        let prompt = ats_analysis_prompt("needs {resume_text} here", "my {job_description}");
        assert!(prompt.contains("needs {resume_text} here"));
        assert!(prompt.contains("my {job_description}"));
        assert_eq!(prompt.matches("my {job_description}").count(), 1);
    }
}
