use async_trait::async_trait;

use crate::domain::Unit;

/// Divides raw document text into ordered, non-overlapping processing units,
/// each carrying its starting character offset in the rejoined text.
#[async_trait]
pub trait UnitSplitter: Send + Sync {
    async fn split(&self, text: &str) -> Result<Vec<Unit>, SplitterError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SplitterError {
    #[error("input text is empty")]
    EmptyInput,
    #[error("tokenization failed: {0}")]
    TokenizationFailed(String),
    #[error("splitting failed: {0}")]
    SplittingFailed(String),
}
