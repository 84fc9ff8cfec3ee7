mod extraction_service;
mod reconciler;

pub use extraction_service::{ExtractionError, ExtractionService};
pub use reconciler::reconcile;
