mod document;
mod entity;
mod unit;

pub use document::{ContentType, Document, DocumentId};
pub use entity::{Entity, EntityError};
pub use unit::Unit;
