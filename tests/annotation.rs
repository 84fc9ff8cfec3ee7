use medner::application::ports::{AnnotatorError, FileLoader, FileLoaderError};
use medner::domain::{ContentType, Document};
use medner::infrastructure::annotation::{label_runs_to_spans, parse_entity_array};
use medner::infrastructure::text_processing::{sanitize_extracted_text, PdfAdapter};

#[test]
fn given_strict_json_array_when_parsing_then_annotations_are_returned() {
    let content = r#"[
        {"entity": "hypertension", "context": "with hypertension", "start": 21, "end": 33},
        {"entity": "diabetes", "start": 22, "end": 30}
    ]"#;

    let annotations = parse_entity_array(content).unwrap();

    assert_eq!(annotations.len(), 2);
    assert_eq!(annotations[0].entity, "hypertension");
    assert_eq!(annotations[0].start, Some(21));
    assert_eq!(annotations[0].end, Some(33));
    assert_eq!(
        annotations[0].context.as_deref(),
        Some("with hypertension")
    );
    assert!(annotations[1].context.is_none());
}

#[test]
fn given_string_offsets_when_parsing_then_they_coerce_to_integers() {
    let content = r#"[{"entity": "aspirin", "start": "4", "end": "11"}]"#;

    let annotations = parse_entity_array(content).unwrap();

    assert_eq!(annotations[0].start, Some(4));
    assert_eq!(annotations[0].end, Some(11));
}

#[test]
fn given_non_numeric_offsets_when_parsing_then_fields_become_none() {
    let content = r#"[{"entity": "aspirin", "start": "four", "end": true}]"#;

    let annotations = parse_entity_array(content).unwrap();

    assert_eq!(annotations.len(), 1);
    assert!(annotations[0].start.is_none());
    assert!(annotations[0].end.is_none());
}

#[test]
fn given_float_offsets_when_parsing_then_they_truncate_to_integers() {
    let content = r#"[{"entity": "aspirin", "start": 4.0, "end": 11.7}]"#;

    let annotations = parse_entity_array(content).unwrap();

    assert_eq!(annotations[0].start, Some(4));
    assert_eq!(annotations[0].end, Some(11));
}

#[test]
fn given_missing_end_field_when_parsing_then_record_survives_with_none() {
    let content = r#"[{"entity": "aspirin", "start": 0}]"#;

    let annotations = parse_entity_array(content).unwrap();

    assert_eq!(annotations.len(), 1);
    assert_eq!(annotations[0].start, Some(0));
    assert!(annotations[0].end.is_none());
}

#[test]
fn given_free_text_response_when_parsing_then_parse_failed_is_returned() {
    let content = "The entities I found are hypertension and diabetes.";

    let result = parse_entity_array(content);

    assert!(matches!(result, Err(AnnotatorError::ParseFailed(_))));
}

#[test]
fn given_json_object_when_parsing_then_parse_failed_is_returned() {
    let content = r#"{"entity": "hypertension", "start": 0, "end": 12}"#;

    let result = parse_entity_array(content);

    assert!(matches!(result, Err(AnnotatorError::ParseFailed(_))));
}

#[test]
fn given_malformed_element_when_parsing_then_valid_siblings_survive() {
    let content = r#"[
        {"start": 0, "end": 4},
        {"entity": "diabetes", "start": 5, "end": 13}
    ]"#;

    let annotations = parse_entity_array(content).unwrap();

    assert_eq!(annotations.len(), 1);
    assert_eq!(annotations[0].entity, "diabetes");
}

#[test]
fn given_bio_label_run_when_decoding_then_one_span_covers_the_run() {
    let labels = ["O", "B-Disease", "I-Disease", "O"];
    let offsets = [(0, 4), (5, 12), (13, 20), (21, 25)];
    let special = [0, 0, 0, 0];

    let spans = label_runs_to_spans(&labels, &offsets, &special);

    assert_eq!(spans, vec![(5, 20)]);
}

#[test]
fn given_adjacent_entities_when_decoding_then_b_label_starts_a_new_span() {
    let labels = ["B-Drug", "B-Drug", "I-Drug"];
    let offsets = [(0, 7), (8, 17), (18, 25)];
    let special = [0, 0, 0];

    let spans = label_runs_to_spans(&labels, &offsets, &special);

    assert_eq!(spans, vec![(0, 7), (8, 25)]);
}

#[test]
fn given_dangling_inside_label_when_decoding_then_span_still_opens() {
    let labels = ["O", "I-Drug", "I-Drug"];
    let offsets = [(0, 3), (4, 10), (11, 15)];
    let special = [0, 0, 0];

    let spans = label_runs_to_spans(&labels, &offsets, &special);

    assert_eq!(spans, vec![(4, 15)]);
}

#[test]
fn given_type_change_when_decoding_then_spans_are_split() {
    let labels = ["B-Drug", "I-Disease"];
    let offsets = [(0, 7), (8, 15)];
    let special = [0, 0];

    let spans = label_runs_to_spans(&labels, &offsets, &special);

    assert_eq!(spans, vec![(0, 7), (8, 15)]);
}

#[test]
fn given_special_tokens_when_decoding_then_they_are_ignored() {
    let labels = ["B-Drug", "B-Drug", "I-Drug", "B-Drug"];
    let offsets = [(0, 0), (0, 7), (8, 15), (0, 0)];
    let special = [1, 0, 0, 1];

    let spans = label_runs_to_spans(&labels, &offsets, &special);

    assert_eq!(spans, vec![(0, 15)]);
}

#[test]
fn given_hyphenated_line_break_when_sanitizing_then_word_is_rejoined() {
    let raw = "chronic hyper-\ntension persists";

    let sanitized = sanitize_extracted_text(raw);

    assert!(sanitized.contains("hypertension"));
}

#[test]
fn given_ligatures_when_sanitizing_then_nfkc_normalizes_them() {
    let raw = "eﬃcacy of the treatment";

    let sanitized = sanitize_extracted_text(raw);

    assert!(sanitized.contains("efficacy"));
}

#[test]
fn given_internal_space_runs_when_sanitizing_then_they_collapse() {
    let raw = "dose:   10 mg\t\tdaily";

    let sanitized = sanitize_extracted_text(raw);

    assert_eq!(sanitized, "dose: 10 mg daily");
}

#[test]
fn given_newlines_when_sanitizing_then_they_are_preserved() {
    let raw = "first line\n\nsecond line";

    let sanitized = sanitize_extracted_text(raw);

    assert_eq!(sanitized, "first line\n\nsecond line");
}

#[tokio::test]
async fn given_corrupt_bytes_when_extracting_pdf_then_returns_extraction_failed() {
    let adapter = PdfAdapter::new();
    let garbage = b"not a pdf at all";
    let document = Document::new(
        "corrupt.pdf".to_string(),
        ContentType::Pdf,
        garbage.len() as u64,
    );

    let result = adapter.extract_text(garbage, &document).await;

    assert!(matches!(result, Err(FileLoaderError::ExtractionFailed(_))));
}
