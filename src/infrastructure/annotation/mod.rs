mod annotator_factory;
mod classifier_annotator;
mod generative_annotator;
mod mock_annotator;

pub use annotator_factory::{AnnotatorFactory, AnnotatorFactoryError};
pub use classifier_annotator::{label_runs_to_spans, ClassifierAnnotator};
pub use generative_annotator::{parse_entity_array, GenerativeAnnotator};
pub use mock_annotator::MockAnnotator;
