use medner::application::ports::{SplitterError, UnitSplitter};
use medner::infrastructure::text_processing::{ParagraphSplitter, TokenWindowSplitter};
use tokenizers::Tokenizer;

#[tokio::test]
async fn given_empty_text_when_splitting_paragraphs_then_returns_empty_input_error() {
    let splitter = ParagraphSplitter::new();

    let result = splitter.split("").await;

    assert!(matches!(result, Err(SplitterError::EmptyInput)));
}

#[tokio::test]
async fn given_two_paragraphs_when_splitting_then_offsets_follow_single_separator_rule() {
    let splitter = ParagraphSplitter::new();
    let text = "First paragraph with hypertension.\n\nSecond paragraph with diabetes.";

    let units = splitter.split(text).await.unwrap();

    assert_eq!(units.len(), 2);
    assert_eq!(units[0].content, "First paragraph with hypertension.");
    assert_eq!(units[0].start_offset, 0);
    assert_eq!(units[1].content, "Second paragraph with diabetes.");
    // first paragraph is 34 chars, plus one separator character
    assert_eq!(units[1].start_offset, 35);
}

#[tokio::test]
async fn given_whitespace_only_pieces_when_splitting_then_they_are_dropped() {
    let splitter = ParagraphSplitter::new();
    let text = "alpha\n   \n\t\nbeta";

    let units = splitter.split(text).await.unwrap();

    assert_eq!(units.len(), 2);
    assert_eq!(units[0].content, "alpha");
    assert_eq!(units[1].content, "beta");
    assert_eq!(units[1].start_offset, 6);
}

#[tokio::test]
async fn given_only_whitespace_text_when_splitting_then_returns_zero_units() {
    let splitter = ParagraphSplitter::new();

    let units = splitter.split(" \n \n ").await.unwrap();

    assert!(units.is_empty());
}

#[tokio::test]
async fn given_irregular_newline_runs_when_splitting_then_units_do_not_overlap() {
    let splitter = ParagraphSplitter::new();
    let text = "one\ntwo\n\n\nthree\n\n\n\nfour";

    let units = splitter.split(text).await.unwrap();

    assert_eq!(units.len(), 4);
    for pair in units.windows(2) {
        assert!(pair[1].start_offset >= pair[0].start_offset + pair[0].char_len() + 1);
    }
}

#[tokio::test]
async fn given_padded_paragraphs_when_splitting_then_content_is_trimmed() {
    let splitter = ParagraphSplitter::new();
    let text = "  leading spaces\ntrailing spaces  ";

    let units = splitter.split(text).await.unwrap();

    assert_eq!(units[0].content, "leading spaces");
    assert_eq!(units[1].content, "trailing spaces");
}

fn word_level_tokenizer(words: &[&str]) -> Tokenizer {
    let vocab: Vec<String> = std::iter::once("\"[UNK]\":0".to_string())
        .chain(
            words
                .iter()
                .enumerate()
                .map(|(index, word)| format!("\"{}\":{}", word, index + 1)),
        )
        .collect();
    let json = format!(
        r#"{{
            "version": "1.0",
            "truncation": null,
            "padding": null,
            "added_tokens": [],
            "normalizer": null,
            "pre_tokenizer": {{"type": "Whitespace"}},
            "post_processor": null,
            "decoder": null,
            "model": {{"type": "WordLevel", "vocab": {{{}}}, "unk_token": "[UNK]"}}
        }}"#,
        vocab.join(",")
    );
    Tokenizer::from_bytes(json.as_bytes()).unwrap()
}

#[tokio::test]
async fn given_empty_text_when_splitting_windows_then_returns_empty_input_error() {
    let tokenizer = word_level_tokenizer(&["alpha"]);
    let splitter = TokenWindowSplitter::new(tokenizer, 2);

    let result = splitter.split("").await;

    assert!(matches!(result, Err(SplitterError::EmptyInput)));
}

#[tokio::test]
async fn given_five_tokens_when_splitting_windows_of_two_then_partition_is_exact() {
    let tokenizer = word_level_tokenizer(&["alpha", "bravo", "charlie", "delta", "echo"]);
    let splitter = TokenWindowSplitter::new(tokenizer, 2);

    let units = splitter.split("alpha bravo charlie delta echo").await.unwrap();

    assert_eq!(units.len(), 3);
    assert_eq!(units[0].content, "alpha bravo");
    assert_eq!(units[1].content, "charlie delta");
    assert_eq!(units[2].content, "echo");
}

#[tokio::test]
async fn given_token_windows_when_splitting_then_offsets_follow_single_separator_rule() {
    let tokenizer = word_level_tokenizer(&["alpha", "bravo", "charlie", "delta", "echo"]);
    let splitter = TokenWindowSplitter::new(tokenizer, 2);

    let units = splitter.split("alpha bravo charlie delta echo").await.unwrap();

    let mut expected_offset = 0;
    for unit in &units {
        assert_eq!(unit.start_offset, expected_offset);
        expected_offset += unit.char_len() + 1;
    }
}

#[tokio::test]
async fn given_fewer_tokens_than_window_when_splitting_then_single_unit_at_zero() {
    let tokenizer = word_level_tokenizer(&["alpha", "bravo"]);
    let splitter = TokenWindowSplitter::new(tokenizer, 450);

    let units = splitter.split("alpha bravo").await.unwrap();

    assert_eq!(units.len(), 1);
    assert_eq!(units[0].content, "alpha bravo");
    assert_eq!(units[0].start_offset, 0);
}
