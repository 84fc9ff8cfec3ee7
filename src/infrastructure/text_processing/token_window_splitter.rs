use async_trait::async_trait;
use tokenizers::Tokenizer;

use crate::application::ports::{SplitterError, UnitSplitter};
use crate::domain::Unit;

/// Splits text into contiguous windows of a fixed token count, the unit shape
/// the token-classification backend expects.
///
/// The whole text is encoded once, the token stream is partitioned exactly
/// into non-overlapping windows, and each window is decoded back to text. The
/// default window of 450 tokens leaves headroom for the special tokens the
/// backend adds around each sequence.
///
/// Offsets follow the same rule as paragraph mode: cumulative decoded
/// character length plus one separator character per preceding window.
pub struct TokenWindowSplitter {
    tokenizer: Tokenizer,
    window_tokens: usize,
}

impl TokenWindowSplitter {
    pub const DEFAULT_WINDOW_TOKENS: usize = 450;

    pub fn new(tokenizer: Tokenizer, window_tokens: usize) -> Self {
        Self {
            tokenizer,
            window_tokens: window_tokens.max(1),
        }
    }
}

#[async_trait]
impl UnitSplitter for TokenWindowSplitter {
    async fn split(&self, text: &str) -> Result<Vec<Unit>, SplitterError> {
        if text.is_empty() {
            return Err(SplitterError::EmptyInput);
        }

        let encoding = self
            .tokenizer
            .encode(text, false)
            .map_err(|e| SplitterError::TokenizationFailed(e.to_string()))?;
        let ids = encoding.get_ids();

        let mut units = Vec::new();
        let mut offset = 0;

        for window in ids.chunks(self.window_tokens) {
            let content = self
                .tokenizer
                .decode(window, true)
                .map_err(|e| SplitterError::SplittingFailed(e.to_string()))?;

            if content.is_empty() {
                continue;
            }

            let char_len = content.chars().count();
            units.push(Unit::new(content, offset));
            offset += char_len + 1;
        }

        tracing::debug!(
            token_count = ids.len(),
            window_count = units.len(),
            "Split text into token windows"
        );

        Ok(units)
    }
}
