use std::sync::Arc;

use crate::application::ports::Annotator;
use crate::presentation::config::{AnnotatorProvider, AnnotatorSettings};

use super::{ClassifierAnnotator, GenerativeAnnotator};

#[derive(Debug, thiserror::Error)]
pub enum AnnotatorFactoryError {
    #[error("api_key is required for the generative provider")]
    MissingApiKey,
    #[error("annotator initialization failed: {0}")]
    InitializationFailed(String),
}

pub struct AnnotatorFactory;

impl AnnotatorFactory {
    pub fn create(
        settings: &AnnotatorSettings,
    ) -> Result<Arc<dyn Annotator>, AnnotatorFactoryError> {
        match settings.provider {
            AnnotatorProvider::Generative => {
                let api_key = settings
                    .api_key
                    .as_deref()
                    .ok_or(AnnotatorFactoryError::MissingApiKey)?;
                let base_url = settings
                    .base_url
                    .as_deref()
                    .unwrap_or("https://api.openai.com");
                tracing::info!(model = %settings.model, base_url, "Using generative annotator");
                let annotator = GenerativeAnnotator::new(base_url, &settings.model, api_key)
                    .map_err(|e| AnnotatorFactoryError::InitializationFailed(e.to_string()))?;
                Ok(Arc::new(annotator))
            }
            AnnotatorProvider::Classifier => {
                tracing::info!(model = %settings.model, "Loading classifier annotator");
                let annotator = ClassifierAnnotator::new(&settings.model)
                    .map_err(|e| AnnotatorFactoryError::InitializationFailed(e.to_string()))?;
                Ok(Arc::new(annotator))
            }
        }
    }
}
