/// One contiguous slice of document text, processed independently by the
/// annotation backend.
///
/// `start_offset` is the character index of `content` within the rejoined
/// document text (units joined with a single separator character). Units are
/// produced in document order and never overlap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    pub content: String,
    pub start_offset: usize,
}

impl Unit {
    pub fn new(content: String, start_offset: usize) -> Self {
        Self {
            content,
            start_offset,
        }
    }

    /// Character length of the unit's content. Offsets throughout the
    /// pipeline count Unicode scalar values, not bytes.
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }
}
