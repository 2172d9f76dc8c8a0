//! Validation steps applied around sanitization.

use std::path::Path;

use thiserror::Error;

use super::sanitize::{MAX_TEXT_LENGTH, sanitize};

/// Input-validation failures for synthesis text.
#[derive(Error, Debug)]
pub enum TextError {
    #[error("Text is empty after sanitization")]
    EmptyAfterSanitization,

    #[error("Text is {length} characters long, the limit is {limit}")]
    TooLong { length: usize, limit: usize },
}

/// Check text length against a limit, `MAX_TEXT_LENGTH` by default.
///
/// Run this after sanitization, not before: sanitizing can shrink the text.
pub fn ensure_within_limit(text: &str, limit: Option<usize>) -> Result<(), TextError> {
    let limit = limit.unwrap_or(MAX_TEXT_LENGTH);
    let length = text.chars().count();

    if length > limit {
        return Err(TextError::TooLong { length, limit });
    }

    Ok(())
}

/// Sanitize text and run both validation steps.
pub fn prepare(text: &str, limit: Option<usize>) -> Result<String, TextError> {
    let sanitized = sanitize(text);

    if sanitized.is_empty() {
        return Err(TextError::EmptyAfterSanitization);
    }
    ensure_within_limit(&sanitized, limit)?;

    Ok(sanitized)
}

/// Read a UTF-8 encoded text file.
pub fn read_text_file(path: &Path) -> std::io::Result<String> {
    std::fs::read_to_string(path)
}
