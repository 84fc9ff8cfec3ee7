use futures::stream::{self, StreamExt};

use crate::application::ports::{Annotator, RawAnnotation};
use crate::domain::{Entity, Unit};

/// Translates unit-local annotation spans into document-global spans and
/// assembles the final ordered entity list.
///
/// Units are annotated concurrently up to `concurrency` in-flight calls, but
/// results are collected in unit order, so emission order is document order
/// regardless of completion order. A failed backend call contributes zero
/// annotations for its unit and the remaining units are still processed; the
/// unit's offset contribution is counted either way.
///
/// The running offset advances by the unit's character length plus one, the
/// single separator character conceptually reinserted between units when they
/// are thought of as rejoined text.
pub async fn reconcile<A>(units: &[Unit], annotator: &A, concurrency: usize) -> Vec<Entity>
where
    A: Annotator + ?Sized,
{
    if units.is_empty() {
        return Vec::new();
    }

    // Futures are created eagerly (they stay inert until polled); `buffered`
    // still caps how many run at once. Collecting first sidesteps a rustc
    // higher-ranked lifetime limitation with lazy `map` in `'static` futures.
    let futures: Vec<_> = units.iter().map(|unit| annotator.annotate(unit)).collect();
    let results: Vec<_> = stream::iter(futures)
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let mut entities = Vec::new();
    let mut offset: usize = 0;

    for (index, (unit, result)) in units.iter().zip(results).enumerate() {
        let annotations = match result {
            Ok(annotations) => annotations,
            Err(e) => {
                tracing::warn!(
                    unit_index = index,
                    error = %e,
                    "Annotation failed for unit, continuing with zero annotations"
                );
                Vec::new()
            }
        };

        for raw in annotations {
            if let Some(entity) = shift_and_validate(raw, unit, offset) {
                entities.push(entity);
            }
        }

        offset += unit.char_len() + 1;
    }

    entities
}

/// Validates one raw annotation against its unit and shifts the span to
/// document-global coordinates. Returns `None` (logged) for records with
/// missing or inconsistent span fields; a dropped record never takes its
/// siblings with it.
fn shift_and_validate(raw: RawAnnotation, unit: &Unit, offset: usize) -> Option<Entity> {
    let (Some(start), Some(end)) = (raw.start, raw.end) else {
        tracing::warn!(entity = %raw.entity, "Dropping annotation with missing span fields");
        return None;
    };

    if start < 0 || end < start {
        tracing::warn!(
            entity = %raw.entity,
            start,
            end,
            "Dropping annotation with inconsistent span values"
        );
        return None;
    }

    let (start, end) = (start as usize, end as usize);
    if end > unit.char_len() {
        tracing::warn!(
            entity = %raw.entity,
            end,
            unit_len = unit.char_len(),
            "Dropping annotation with span outside unit bounds"
        );
        return None;
    }

    // The authoritative context is the full unit that produced the match,
    // never the backend's narrower guess.
    match Entity::new(raw.entity, unit.content.clone(), start + offset, end + offset) {
        Ok(entity) => Some(entity),
        Err(e) => {
            tracing::warn!(error = %e, "Dropping entity record failing shape validation");
            None
        }
    }
}
