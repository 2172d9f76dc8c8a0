//! Engine request, outcome and error types.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::voice::ModelPaths;

/// Errors raised while driving an engine.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Synthesis process exited with {status}: {stderr}")]
    ProcessFailed {
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Request carries no resolved model paths")]
    MissingModel,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A fully resolved synthesis request, as handed to an engine.
///
/// Labels have already been turned into indices and values; only options
/// the target engine supports are populated.
#[derive(Debug, Clone, Default)]
pub struct SynthesisRequest {
    pub text: String,
    pub model: Option<ModelPaths>,
    pub speaker_id: Option<i64>,
    pub length_scale: Option<f64>,
    pub noise_scale: Option<f64>,
    pub noise_w: Option<f64>,
    pub language: Option<String>,
    pub speaker: Option<String>,
    pub speaker_wav: Option<PathBuf>,
    pub split_sentences: bool,
}

impl SynthesisRequest {
    /// Create a request for already-sanitized text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Set the resolved model paths.
    pub fn with_model(mut self, model: ModelPaths) -> Self {
        self.model = Some(model);
        self
    }

    /// Set the speaker index.
    pub fn with_speaker_id(mut self, id: i64) -> Self {
        self.speaker_id = Some(id);
        self
    }

    /// Set the target language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}

/// What a WAV probe of the generated audio revealed.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioProbe {
    pub duration_secs: f64,
    pub sample_rate: u32,
    pub channels: u16,
}

/// Result of a completed synthesis.
#[derive(Debug, Clone)]
pub struct SynthesisOutcome {
    pub output: PathBuf,
    pub created_at: DateTime<Utc>,
    pub elapsed: Duration,
    /// Absent when the output could not be inspected.
    pub audio: Option<AudioProbe>,
}

/// Inspect a generated WAV file.
pub fn probe_wav(path: &Path) -> Result<AudioProbe, hound::Error> {
    let reader = hound::WavReader::open(path)?;
    let spec = reader.spec();
    let duration_secs = f64::from(reader.duration()) / f64::from(spec.sample_rate);

    Ok(AudioProbe {
        duration_secs,
        sample_rate: spec.sample_rate,
        channels: spec.channels,
    })
}
