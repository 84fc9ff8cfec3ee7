use async_trait::async_trait;
use serde::{Deserialize, Deserializer};

use crate::domain::Unit;

/// Any model-backed service that, given one unit of text, proposes entity
/// spans local to that unit.
///
/// Calls for independent units carry no shared mutable state and are safe to
/// issue concurrently. A failed call is recovered by the reconciler as zero
/// annotations for that unit; it never aborts the document.
#[async_trait]
pub trait Annotator: Send + Sync {
    async fn annotate(&self, unit: &Unit) -> Result<Vec<RawAnnotation>, AnnotatorError>;
}

/// An unvalidated entity candidate as returned by an annotation backend.
///
/// Offsets are 0-based character positions local to the unit's content, `end`
/// exclusive. Nothing here is trusted: generative models emit offsets as
/// integers or numeric strings, omit fields, or invent values, so `start` and
/// `end` stay optional until the reconciler validates them.
#[derive(Debug, Clone, Deserialize)]
pub struct RawAnnotation {
    pub entity: String,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub start: Option<i64>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub end: Option<i64>,
}

/// Accepts JSON integers, floats (truncated), and numeric strings; anything
/// else coerces to `None` so that one bad field drops one record, not the
/// batch.
fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lenient {
        Int(i64),
        Float(f64),
        Text(String),
        Other(serde_json::Value),
    }

    Ok(match Option::<Lenient>::deserialize(deserializer)? {
        Some(Lenient::Int(value)) => Some(value),
        Some(Lenient::Float(value)) if value.is_finite() => Some(value as i64),
        Some(Lenient::Float(_)) | Some(Lenient::Other(_)) | None => None,
        Some(Lenient::Text(value)) => value.trim().parse().ok(),
    })
}

#[derive(Debug, thiserror::Error)]
pub enum AnnotatorError {
    #[error("backend call failed: {0}")]
    CallFailed(String),
    #[error("backend response could not be parsed: {0}")]
    ParseFailed(String),
    #[error("rate limited")]
    RateLimited,
    #[error("model load failed: {0}")]
    ModelLoadFailed(String),
    #[error("inference failed: {0}")]
    InferenceFailed(String),
}
