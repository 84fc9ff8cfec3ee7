mod annotator;
mod file_loader;
mod unit_splitter;

pub use annotator::{Annotator, AnnotatorError, RawAnnotation};
pub use file_loader::{FileLoader, FileLoaderError};
pub use unit_splitter::{SplitterError, UnitSplitter};
