use std::sync::Arc;

use crate::application::ports::{Annotator, FileLoader, UnitSplitter};
use crate::application::services::ExtractionService;

pub struct AppState<F, S: ?Sized, A: ?Sized>
where
    F: FileLoader,
    S: UnitSplitter,
    A: Annotator,
{
    pub extraction_service: Arc<ExtractionService<F, S, A>>,
}

impl<F, S: ?Sized, A: ?Sized> Clone for AppState<F, S, A>
where
    F: FileLoader,
    S: UnitSplitter,
    A: Annotator,
{
    fn clone(&self) -> Self {
        Self {
            extraction_service: Arc::clone(&self.extraction_service),
        }
    }
}
