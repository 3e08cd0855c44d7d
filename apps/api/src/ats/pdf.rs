//! PDF resume import: pulls plain text out of an uploaded PDF for analysis.

use bytes::Bytes;

use crate::errors::AppError;

const PDF_MAGIC: &[u8] = b"%PDF-";

/// Extracts the text layer of a PDF. Parsing is CPU-bound and runs on the
/// blocking pool; a parser panic is reported as an unreadable document.
pub async fn extract_pdf_text(data: Bytes) -> Result<String, AppError> {
    if !looks_like_pdf(&data) {
        return Err(AppError::UnprocessableEntity(
            "resume must be a PDF document".to_string(),
        ));
    }

    let extracted = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&data))
        .await
        .map_err(|e| {
            if e.is_panic() {
                AppError::UnprocessableEntity("resume PDF could not be read".to_string())
            } else {
                AppError::Internal(anyhow::anyhow!("PDF extraction task failed: {e}"))
            }
        })?;

    let text = extracted.map_err(|e| {
        tracing::warn!("PDF extraction failed: {e}");
        AppError::UnprocessableEntity("resume PDF could not be read".to_string())
    })?;

    if text.trim().is_empty() {
        return Err(AppError::UnprocessableEntity(
            "no text could be extracted from the resume PDF".to_string(),
        ));
    }

    Ok(text)
}

/// PDF files may carry leading junk before the header; readers accept it
/// within the first KiB.
fn looks_like_pdf(data: &[u8]) -> bool {
    let window = &data[..data.len().min(1024)];
    window
        .windows(PDF_MAGIC.len())
        .any(|w| w == PDF_MAGIC)
}
