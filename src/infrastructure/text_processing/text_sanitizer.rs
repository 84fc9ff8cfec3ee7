use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static HYPHEN_NEWLINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?P<prefix>\w)-[ \t]*\r?\n[ \t]*(?P<suffix>\w)").unwrap());

/// Cleans text coming out of the PDF parser: NFKC normalization, words
/// re-joined across hyphenated line breaks, internal runs of spaces and tabs
/// collapsed.
///
/// Newlines are preserved as-is. The paragraph splitter relies on them as
/// unit boundaries, so collapsing them here would change splitting behavior.
pub fn sanitize_extracted_text(raw: &str) -> String {
    let normalized: String = raw.nfkc().collect();
    let de_hyphenated = HYPHEN_NEWLINE.replace_all(&normalized, "$prefix$suffix");

    let mut result = String::with_capacity(de_hyphenated.len());
    let mut first = true;

    for line in de_hyphenated.lines() {
        if !first {
            result.push('\n');
        }
        collapse_internal_whitespace(line.trim_end(), &mut result);
        first = false;
    }

    result
}

fn collapse_internal_whitespace(line: &str, out: &mut String) {
    let mut prev_was_space = false;

    for ch in line.chars() {
        if ch == ' ' || ch == '\t' {
            if !prev_was_space {
                out.push(' ');
                prev_was_space = true;
            }
        } else {
            out.push(ch);
            prev_was_space = false;
        }
    }
}
