use crate::application::ports::{FileLoader, FileLoaderError};
use crate::domain::Document;

use super::text_sanitizer::sanitize_extracted_text;

/// Treats the uploaded bytes as UTF-8 text and runs them through the same
/// sanitizer as the PDF path, so tests exercise the loader contract without a
/// PDF toolchain.
pub struct MockFileLoader;

#[async_trait::async_trait]
impl FileLoader for MockFileLoader {
    async fn extract_text(
        &self,
        data: &[u8],
        document: &Document,
    ) -> Result<String, FileLoaderError> {
        let text = std::str::from_utf8(data)
            .map_err(|e| FileLoaderError::ExtractionFailed(e.to_string()))?;

        let sanitized = sanitize_extracted_text(text);
        if sanitized.trim().is_empty() && !text.is_empty() {
            return Err(FileLoaderError::NoTextFound(document.filename.clone()));
        }

        Ok(sanitized)
    }
}
