//! Text preparation for synthesis: sanitization and validation.

mod sanitize;
mod validate;

pub use sanitize::{MAX_TEXT_LENGTH, sanitize};
pub use validate::{TextError, ensure_within_limit, prepare, read_text_file};
