//! Synthesis orchestration: validation, option resolution, engine dispatch.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use thiserror::Error;
use tracing::{info, warn};

use super::Engine;
use super::capability::SynthesisOption;
use super::types::{EngineError, SynthesisOutcome, SynthesisRequest, probe_wav};
use super::xtts::{DEFAULT_LANGUAGE, DEFAULT_SPEAKER, SUPPORTED_SAMPLE_RATES};
use crate::cli::EngineKind;
use crate::text::{self, TextError};
use crate::voice::{CatalogError, VoiceCatalog, VoiceOptions};

/// Errors that can occur while orchestrating a synthesis.
#[derive(Error, Debug)]
pub enum SynthesisError {
    #[error(transparent)]
    Text(#[from] TextError),

    #[error("A voice is required for the Piper engine; pass --voice")]
    VoiceRequired,

    #[error("Speaker '{0}' not found for this voice")]
    SpeakerNotFound(String),

    #[error("Language '{language}' is not supported. Available: {available}")]
    UnsupportedLanguage { language: String, available: String },

    #[error("Sample rate {0} Hz is not supported by the model")]
    UnsupportedSampleRate(u32),

    #[error("Reference audio file not found: {}", .0.display())]
    SpeakerWavNotFound(PathBuf),

    #[error("Voice catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Synthesis finished but '{}' was not created", .0.display())]
    OutputMissing(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// User-facing synthesis options before validation and resolution.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub voice: Option<String>,
    /// Speaker label; a bare index is accepted for Piper voices.
    pub speaker: Option<String>,
    pub length_scale: Option<f64>,
    pub noise_scale: Option<f64>,
    pub noise_w: Option<f64>,
    pub language: Option<String>,
    pub speaker_wav: Option<PathBuf>,
    pub sample_rate: Option<u32>,
    pub split_sentences: bool,
}

/// Orchestrates one engine together with the voice catalog.
pub struct Synthesizer<E: Engine> {
    engine: E,
    catalog: VoiceCatalog,
}

impl<E: Engine> Synthesizer<E> {
    /// Create a new synthesizer.
    pub fn new(engine: E, catalog: VoiceCatalog) -> Self {
        Self { engine, catalog }
    }

    /// The catalog this synthesizer resolves voices from.
    pub fn catalog(&self) -> &VoiceCatalog {
        &self.catalog
    }

    /// Which engine kind this synthesizer drives.
    pub fn engine_kind(&self) -> EngineKind {
        self.engine.kind()
    }

    /// Available Piper voice names.
    pub fn voices(&self) -> Result<Vec<String>, SynthesisError> {
        Ok(self.catalog.discover()?)
    }

    /// Derived options for one voice.
    pub fn voice_options(&self, name: &str) -> Result<Arc<VoiceOptions>, SynthesisError> {
        Ok(self.catalog.options(name)?)
    }

    /// Languages reported by the engine.
    pub fn languages(&self) -> Result<Vec<String>, SynthesisError> {
        Ok(self.engine.languages()?)
    }

    /// Speakers reported by the engine.
    pub fn speakers(&self) -> Result<Vec<String>, SynthesisError> {
        Ok(self.engine.speakers()?)
    }

    /// Synthesize text into a WAV file at `output`.
    ///
    /// Sanitizes and validates the text, drops options the engine does not
    /// support, resolves labels against the voice configuration, invokes the
    /// engine and probes the generated audio.
    pub fn synthesize(
        &self,
        raw_text: &str,
        options: &RequestOptions,
        output: &Path,
    ) -> Result<SynthesisOutcome, SynthesisError> {
        let sanitized = text::prepare(raw_text, None)?;

        let kind = self.engine.kind();
        let mut options = options.clone();
        drop_unsupported(kind, &mut options);

        let mut request = SynthesisRequest::new(sanitized);
        request.split_sentences = options.split_sentences;

        match kind {
            EngineKind::Piper => self.build_piper_request(&options, &mut request)?,
            EngineKind::Xtts => self.build_xtts_request(&options, &mut request)?,
        }

        if let Some(parent) = output.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        info!("starting audio synthesis");
        let started = Instant::now();
        self.engine.synthesize(&request, output)?;
        let elapsed = started.elapsed();

        if !output.exists() {
            return Err(SynthesisError::OutputMissing(output.to_path_buf()));
        }

        let audio = match probe_wav(output) {
            Ok(probe) => Some(probe),
            Err(error) => {
                warn!("could not inspect generated audio: {error}");
                None
            }
        };

        info!(
            "synthesis finished in {:.2}s, saved to '{}'",
            elapsed.as_secs_f64(),
            output.display()
        );

        Ok(SynthesisOutcome {
            output: output.to_path_buf(),
            created_at: Utc::now(),
            elapsed,
            audio,
        })
    }

    fn build_piper_request(
        &self,
        options: &RequestOptions,
        request: &mut SynthesisRequest,
    ) -> Result<(), SynthesisError> {
        let voice = options.voice.as_deref().ok_or(SynthesisError::VoiceRequired)?;
        let paths = self.catalog.resolve(voice)?;
        let voice_options = self.catalog.options(voice)?;

        if let Some(speaker) = options.speaker.as_deref() {
            let id = voice_options
                .speaker_id(speaker)
                .or_else(|| speaker.parse::<i64>().ok())
                .ok_or_else(|| SynthesisError::SpeakerNotFound(speaker.to_string()))?;
            request.speaker_id = Some(id);
        }

        request.model = Some(paths);
        request.length_scale = options.length_scale;
        request.noise_scale = options.noise_scale;
        request.noise_w = options.noise_w;
        Ok(())
    }

    fn build_xtts_request(
        &self,
        options: &RequestOptions,
        request: &mut SynthesisRequest,
    ) -> Result<(), SynthesisError> {
        let language = options
            .language
            .as_deref()
            .unwrap_or(DEFAULT_LANGUAGE)
            .to_lowercase();

        let available = self.engine.languages()?;
        if !available.iter().any(|candidate| candidate == &language) {
            return Err(SynthesisError::UnsupportedLanguage {
                language,
                available: available.join(", "),
            });
        }

        if let Some(rate) = options.sample_rate
            && !SUPPORTED_SAMPLE_RATES.contains(&rate)
        {
            return Err(SynthesisError::UnsupportedSampleRate(rate));
        }

        if let Some(wav) = &options.speaker_wav {
            if !wav.exists() {
                return Err(SynthesisError::SpeakerWavNotFound(wav.clone()));
            }
            request.speaker_wav = Some(wav.clone());
        } else {
            let speakers = self.engine.speakers()?;
            let selected = match options.speaker.as_deref() {
                Some(speaker) if speakers.iter().any(|s| s == speaker) => speaker.to_string(),
                Some(speaker) => {
                    warn!("speaker '{speaker}' not found, using '{DEFAULT_SPEAKER}'");
                    DEFAULT_SPEAKER.to_string()
                }
                None => DEFAULT_SPEAKER.to_string(),
            };
            request.speaker = Some(selected);
        }

        request.language = Some(language);
        Ok(())
    }
}

/// Clear options the engine kind does not support, warning once per option.
fn drop_unsupported(kind: EngineKind, options: &mut RequestOptions) {
    fn drop_option<T>(slot: &mut Option<T>, kind: EngineKind, option: SynthesisOption) {
        if slot.is_some() && !kind.supports(option) {
            warn!(
                "--{} is not supported by the {} engine, ignoring",
                option.flag(),
                kind.name()
            );
            *slot = None;
        }
    }

    drop_option(&mut options.speaker, kind, SynthesisOption::Speaker);
    drop_option(&mut options.length_scale, kind, SynthesisOption::LengthScale);
    drop_option(&mut options.noise_scale, kind, SynthesisOption::NoiseScale);
    drop_option(&mut options.noise_w, kind, SynthesisOption::NoiseW);
    drop_option(&mut options.language, kind, SynthesisOption::Language);
    drop_option(&mut options.speaker_wav, kind, SynthesisOption::SpeakerWav);
    drop_option(&mut options.sample_rate, kind, SynthesisOption::SampleRate);

    if options.split_sentences && !kind.supports(SynthesisOption::SplitSentences) {
        warn!(
            "--{} is not supported by the {} engine, ignoring",
            SynthesisOption::SplitSentences.flag(),
            kind.name()
        );
        options.split_sentences = false;
    }
}
