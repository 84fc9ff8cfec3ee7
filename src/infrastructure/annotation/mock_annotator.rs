use crate::application::ports::{Annotator, AnnotatorError, RawAnnotation};
use crate::domain::Unit;

/// Returns zero annotations for every unit. For tests and scaffold runs
/// without a model backend.
pub struct MockAnnotator;

#[async_trait::async_trait]
impl Annotator for MockAnnotator {
    async fn annotate(&self, _unit: &Unit) -> Result<Vec<RawAnnotation>, AnnotatorError> {
        Ok(Vec::new())
    }
}
