// ATS keyword-match analysis.
// Extraction and scoring are pure; handlers own all boundary validation.
// All LLM calls go through llm_client.

pub mod handlers;
pub mod keywords;
pub mod pdf;
pub mod prompts;
pub mod scorer;
