mod mock_file_loader;
mod paragraph_splitter;
mod pdf_adapter;
mod splitter_factory;
mod text_sanitizer;
mod token_window_splitter;

pub use mock_file_loader::MockFileLoader;
pub use paragraph_splitter::ParagraphSplitter;
pub use pdf_adapter::PdfAdapter;
pub use splitter_factory::{SplitterFactory, SplitterFactoryError};
pub use text_sanitizer::sanitize_extracted_text;
pub use token_window_splitter::TokenWindowSplitter;
