use std::time::Duration;

use async_trait::async_trait;

use crate::application::ports::{FileLoader, FileLoaderError};
use crate::domain::Document;

use super::text_sanitizer::sanitize_extracted_text;

const EXTRACTION_TIMEOUT: Duration = Duration::from_secs(30);

/// Extracts text from PDF bytes with `pdf-extract`, off the async runtime and
/// under a hard timeout. Parsing happens fully in memory; the adapter holds
/// no files or long-lived state.
#[derive(Default)]
pub struct PdfAdapter;

impl PdfAdapter {
    pub fn new() -> Self {
        Self
    }

    fn extract(data: &[u8]) -> Result<String, FileLoaderError> {
        pdf_extract::extract_text_from_mem(data)
            .map_err(|e| FileLoaderError::ExtractionFailed(format!("failed to parse PDF: {e}")))
    }
}

#[async_trait]
impl FileLoader for PdfAdapter {
    #[tracing::instrument(
        skip(self, data),
        fields(
            document_id = %document.id.as_uuid(),
            filename = %document.filename,
        )
    )]
    async fn extract_text(
        &self,
        data: &[u8],
        document: &Document,
    ) -> Result<String, FileLoaderError> {
        let data_owned = data.to_vec();
        let filename = document.filename.clone();

        let text = tokio::time::timeout(
            EXTRACTION_TIMEOUT,
            tokio::task::spawn_blocking(move || {
                std::panic::catch_unwind(|| Self::extract(&data_owned)).unwrap_or_else(|_| {
                    Err(FileLoaderError::ExtractionFailed(
                        "panic during PDF parsing".to_string(),
                    ))
                })
            }),
        )
        .await
        .map_err(|_| FileLoaderError::ExtractionFailed("PDF extraction timed out".to_string()))?
        .map_err(|e| FileLoaderError::ExtractionFailed(format!("task join error: {e}")))??;

        let sanitized = sanitize_extracted_text(&text);

        if sanitized.trim().is_empty() {
            tracing::warn!("No text could be extracted from any page");
            return Err(FileLoaderError::NoTextFound(filename));
        }

        tracing::info!(
            character_count = sanitized.chars().count(),
            "PDF text extraction complete"
        );

        Ok(sanitized)
    }
}
