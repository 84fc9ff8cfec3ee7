use serde::Serialize;

/// A validated entity record with document-global offsets, the externally
/// visible output of the pipeline.
///
/// `start` and `end` are 0-based character offsets into the rejoined document
/// text, `end` exclusive. `context` is the full unit the entity was found in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entity {
    pub entity: String,
    pub context: String,
    pub start: usize,
    pub end: usize,
}

impl Entity {
    /// Constructs an entity, enforcing the response-model shape: a non-empty
    /// entity string and a non-empty span. Records failing these checks must
    /// never leave the pipeline boundary.
    pub fn new(
        entity: String,
        context: String,
        start: usize,
        end: usize,
    ) -> Result<Self, EntityError> {
        if entity.trim().is_empty() {
            return Err(EntityError::EmptyEntity);
        }
        if end <= start {
            return Err(EntityError::InvalidSpan { start, end });
        }
        Ok(Self {
            entity,
            context,
            start,
            end,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EntityError {
    #[error("entity text is empty")]
    EmptyEntity,
    #[error("invalid span: start {start} must be less than end {end}")]
    InvalidSpan { start: usize, end: usize },
}
