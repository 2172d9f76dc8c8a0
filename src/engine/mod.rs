//! Speech engines and the synthesis orchestrator.
//!
//! The `Engine` trait abstracts the two supported engines, the Piper CLI
//! and XTTS-style model servers, so the orchestrator (and tests) can drive
//! them interchangeably.

mod capability;
mod piper;
mod synth;
mod types;
mod xtts;

pub use capability::SynthesisOption;
pub use piper::PiperEngine;
pub use synth::{RequestOptions, SynthesisError, Synthesizer};
pub use types::{AudioProbe, EngineError, SynthesisOutcome, SynthesisRequest, probe_wav};
pub use xtts::{
    DEFAULT_LANGUAGE, DEFAULT_PORT, DEFAULT_SAMPLE_RATE, DEFAULT_SPEAKER, SUPPORTED_SAMPLE_RATES,
    XttsEngine,
};

use std::path::Path;

use crate::cli::EngineKind;

/// Trait for speech synthesis engines.
///
/// Implementations receive fully resolved requests: labels have been mapped
/// to values and unsupported options cleared by the orchestrator.
#[cfg_attr(test, mockall::automock)]
pub trait Engine: Send + Sync {
    /// Engine kind, which decides the supported option set.
    fn kind(&self) -> EngineKind;

    /// Languages the engine offers; empty when language is per-voice.
    fn languages(&self) -> Result<Vec<String>, EngineError>;

    /// Speakers the engine offers; empty when speakers are per-voice.
    fn speakers(&self) -> Result<Vec<String>, EngineError>;

    /// Synthesize a request into a WAV file at `output`.
    fn synthesize(&self, request: &SynthesisRequest, output: &Path) -> Result<(), EngineError>;
}
