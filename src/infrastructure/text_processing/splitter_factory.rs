use std::sync::Arc;

use hf_hub::api::sync::Api;
use hf_hub::{Repo, RepoType};
use tokenizers::Tokenizer;

use crate::application::ports::UnitSplitter;
use crate::presentation::config::{SplitterMode, SplitterSettings};

use super::{ParagraphSplitter, TokenWindowSplitter};

#[derive(Debug, thiserror::Error)]
pub enum SplitterFactoryError {
    #[error("tokenizer_model is required for token-window splitting")]
    MissingTokenizerModel,
    #[error("splitter initialization failed: {0}")]
    InitializationFailed(String),
}

pub struct SplitterFactory;

impl SplitterFactory {
    pub fn create(
        settings: &SplitterSettings,
    ) -> Result<Arc<dyn UnitSplitter>, SplitterFactoryError> {
        match settings.mode {
            SplitterMode::Paragraph => Ok(Arc::new(ParagraphSplitter::new())),
            SplitterMode::TokenWindow => {
                let model_id = settings
                    .tokenizer_model
                    .as_deref()
                    .ok_or(SplitterFactoryError::MissingTokenizerModel)?;

                tracing::info!(model = model_id, "Loading tokenizer for window splitting");

                let api = Api::new()
                    .map_err(|e| SplitterFactoryError::InitializationFailed(e.to_string()))?;
                let repo = api.repo(Repo::new(model_id.to_string(), RepoType::Model));
                let tokenizer_path = repo.get("tokenizer.json").map_err(|e| {
                    SplitterFactoryError::InitializationFailed(format!("tokenizer.json: {e}"))
                })?;
                let tokenizer = Tokenizer::from_file(&tokenizer_path).map_err(|e| {
                    SplitterFactoryError::InitializationFailed(format!("tokenizer: {e}"))
                })?;

                Ok(Arc::new(TokenWindowSplitter::new(
                    tokenizer,
                    settings.window_tokens,
                )))
            }
        }
    }
}
