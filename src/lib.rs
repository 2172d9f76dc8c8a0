//! voxpipe: text-to-speech orchestration for local engines.
//!
//! This crate drives the Piper CLI synthesizer and XTTS-style model servers,
//! deriving user-selectable options from each voice's embedded configuration
//! and sanitizing input text before synthesis.

pub mod cli;
pub mod engine;
pub mod text;
pub mod voice;
