use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;

use crate::application::ports::{SplitterError, UnitSplitter};
use crate::domain::Unit;

static NEWLINE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n+").unwrap());

/// Splits text into paragraphs on runs of one-or-more newlines, trimming each
/// piece and dropping the empties.
///
/// This is a heuristic: research PDFs with irregular spacing can produce
/// overly large or overly small units. That is an accepted, documented
/// limitation, not something to silently repair here.
///
/// Each paragraph's `start_offset` is the cumulative character length of the
/// preceding paragraphs plus one separator character per gap, as if the
/// paragraphs were rejoined with a single newline.
#[derive(Default)]
pub struct ParagraphSplitter;

impl ParagraphSplitter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl UnitSplitter for ParagraphSplitter {
    async fn split(&self, text: &str) -> Result<Vec<Unit>, SplitterError> {
        if text.is_empty() {
            return Err(SplitterError::EmptyInput);
        }

        let mut units = Vec::new();
        let mut offset = 0;

        for piece in NEWLINE_RUN.split(text) {
            let trimmed = piece.trim();
            if trimmed.is_empty() {
                continue;
            }

            let char_len = trimmed.chars().count();
            units.push(Unit::new(trimmed.to_string(), offset));
            offset += char_len + 1;
        }

        if units.is_empty() {
            tracing::warn!("No valid paragraphs found in text");
        } else {
            tracing::debug!(paragraph_count = units.len(), "Split text into paragraphs");
        }

        Ok(units)
    }
}
