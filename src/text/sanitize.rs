//! Input text cleaning for speech synthesis.

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Maximum number of characters accepted for a single synthesis.
pub const MAX_TEXT_LENGTH: usize = 8000;

/// Punctuation that survives sanitization.
const ALLOWED_PUNCTUATION: [char; 16] = [
    '.', ',', ';', ':', '!', '?', '\'', '"', '(', ')', '[', ']', '-', '–', '—', '%',
];

const ELLIPSIS: char = '…';

static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());
static MULTI_DOTS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.{4,}").unwrap());

/// Clean input text while preserving intelligibility.
///
/// Strips HTML entities and tags, normalizes to NFC, then keeps only
/// letters, digits, allow-listed punctuation and single spaces. Emojis,
/// control characters and unlisted symbols are dropped; the ellipsis
/// character becomes three periods. Never fails; an entirely filtered
/// input yields an empty string.
pub fn sanitize(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let decoded = html_escape::decode_html_entities(text);
    let without_tags = HTML_TAG.replace_all(decoded.as_ref(), " ");
    let normalized: String = without_tags.as_ref().nfc().collect();

    let mut safe = String::with_capacity(normalized.len());
    for c in normalized.chars() {
        if c.is_control() {
            // Control characters are removed entirely.
        } else if c.is_alphanumeric() {
            safe.push(c);
        } else if ALLOWED_PUNCTUATION.contains(&c) {
            safe.push(c);
        } else if c == ELLIPSIS {
            safe.push_str("...");
        } else if c.is_whitespace() {
            safe.push(' ');
        }
        // Anything else, emojis included, is dropped.
    }

    let collapsed = MULTI_DOTS.replace_all(&safe, "...");
    let collapsed = collapsed.replace(ELLIPSIS, "...");

    collapsed.split_whitespace().collect::<Vec<_>>().join(" ")
}
