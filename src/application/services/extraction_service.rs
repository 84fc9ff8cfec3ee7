use std::sync::Arc;

use crate::application::ports::{
    Annotator, FileLoader, FileLoaderError, SplitterError, UnitSplitter,
};
use crate::application::services::reconcile;
use crate::domain::{ContentType, Document, Entity};

/// Orchestrates one extraction request: parsed text in, ordered entity list
/// out. Holds no per-request state; any "current request" data is a local
/// value, so concurrent requests are safe.
pub struct ExtractionService<F, S: ?Sized, A: ?Sized>
where
    F: FileLoader,
    S: UnitSplitter,
    A: Annotator,
{
    file_loader: Arc<F>,
    splitter: Arc<S>,
    annotator: Arc<A>,
    concurrency: usize,
}

impl<F, S: ?Sized, A: ?Sized> ExtractionService<F, S, A>
where
    F: FileLoader,
    S: UnitSplitter,
    A: Annotator,
{
    pub fn new(
        file_loader: Arc<F>,
        splitter: Arc<S>,
        annotator: Arc<A>,
        concurrency: usize,
    ) -> Self {
        Self {
            file_loader,
            splitter,
            annotator,
            concurrency,
        }
    }

    pub async fn extract(
        &self,
        data: &[u8],
        filename: String,
        content_type: ContentType,
    ) -> Result<Vec<Entity>, ExtractionError> {
        let document = Document::new(filename, content_type, data.len() as u64);

        let text = self
            .file_loader
            .extract_text(data, &document)
            .await
            .map_err(ExtractionError::FileLoading)?;

        let units = match self.splitter.split(&text).await {
            Ok(units) => units,
            Err(SplitterError::EmptyInput) => {
                tracing::warn!(
                    document_id = %document.id.as_uuid(),
                    "Document contains no extractable text"
                );
                return Err(ExtractionError::InvalidInput(
                    "document text is empty".to_string(),
                ));
            }
            Err(e) => return Err(ExtractionError::Pipeline(e.to_string())),
        };

        // A document that splits into zero units yields no entities, not an
        // error, and the backend is never invoked.
        if units.is_empty() {
            tracing::info!(
                document_id = %document.id.as_uuid(),
                "Splitting produced no units"
            );
            return Ok(Vec::new());
        }

        let entities = reconcile(&units, self.annotator.as_ref(), self.concurrency).await;

        tracing::info!(
            document_id = %document.id.as_uuid(),
            unit_count = units.len(),
            entity_count = entities.len(),
            "Extraction complete"
        );

        Ok(entities)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("file loading: {0}")]
    FileLoading(#[from] FileLoaderError),
    #[error("pipeline failure: {0}")]
    Pipeline(String),
}
