pub mod annotation;
pub mod observability;
pub mod text_processing;
