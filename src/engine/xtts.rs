//! XTTS engine: talks to a local multilingual model server over HTTP.

use std::path::Path;
use std::sync::Mutex;

use serde::Serialize;
use tracing::{info, warn};

use super::Engine;
use super::types::{EngineError, SynthesisRequest};
use crate::cli::EngineKind;

/// Default synthesis language.
pub const DEFAULT_LANGUAGE: &str = "pt";

/// Speaker used when none is requested or the requested one is unknown.
pub const DEFAULT_SPEAKER: &str = "random";

/// Sample rate the model emits.
pub const DEFAULT_SAMPLE_RATE: u32 = 24_000;

/// Sample rates the model supports.
pub const SUPPORTED_SAMPLE_RATES: [u32; 1] = [DEFAULT_SAMPLE_RATE];

/// Default model server port.
pub const DEFAULT_PORT: u16 = 5002;

/// Languages assumed when the server does not report any.
const SAFE_LANGUAGES_FALLBACK: [&str; 17] = [
    "pt", "en", "es", "fr", "de", "it", "ru", "tr", "pl", "nl", "sv", "fi", "uk", "ja", "ko",
    "zh-cn", "ar",
];

/// Speakers assumed when the server does not report any.
const SAFE_SPEAKERS_FALLBACK: [&str; 1] = [DEFAULT_SPEAKER];

/// HTTP client for an XTTS-style model server.
///
/// Language and speaker lists are fetched once and cached for the lifetime
/// of the engine.
pub struct XttsEngine {
    base_url: String,
    client: reqwest::blocking::Client,
    languages: Mutex<Option<Vec<String>>>,
    speakers: Mutex<Option<Vec<String>>>,
}

impl XttsEngine {
    /// Create a client for the server at `host:port`.
    pub fn new(host: &str, port: u16) -> Self {
        Self {
            base_url: format!("http://{host}:{port}"),
            client: reqwest::blocking::Client::new(),
            languages: Mutex::new(None),
            speakers: Mutex::new(None),
        }
    }

    /// Get the base URL for this server.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch a JSON string list from the server.
    ///
    /// A missing endpoint degrades to an empty list so the safe fallbacks
    /// apply; an unreachable server is a hard error.
    fn fetch_list(&self, endpoint: &str) -> Result<Vec<String>, EngineError> {
        let url = format!("{}/{endpoint}", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| EngineError::ConnectionFailed(e.to_string()))?;

        if !response.status().is_success() {
            warn!("server has no /{endpoint} endpoint, using fallback list");
            return Ok(Vec::new());
        }

        response
            .json()
            .map_err(|e| EngineError::InvalidResponse(e.to_string()))
    }
}

/// JSON body for the `/api/tts` endpoint.
#[derive(Debug, Serialize)]
struct TtsRequestBody<'a> {
    text: &'a str,
    language: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    speaker: Option<&'a str>,
    split_sentences: bool,
}

/// Lowercase, sort and dedup a language list; empty falls back to the safe set.
fn normalize_languages(raw: Vec<String>) -> Vec<String> {
    let raw = if raw.is_empty() {
        SAFE_LANGUAGES_FALLBACK.iter().map(|s| s.to_string()).collect()
    } else {
        raw
    };

    let mut languages: Vec<String> = raw.into_iter().map(|lang| lang.to_lowercase()).collect();
    languages.sort();
    languages.dedup();
    languages
}

/// Sort and dedup a speaker list; empty falls back to the safe set.
fn normalize_speakers(raw: Vec<String>) -> Vec<String> {
    let mut speakers = if raw.is_empty() {
        SAFE_SPEAKERS_FALLBACK.iter().map(|s| s.to_string()).collect()
    } else {
        raw
    };

    speakers.sort();
    speakers.dedup();
    speakers
}

impl Engine for XttsEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::Xtts
    }

    fn languages(&self) -> Result<Vec<String>, EngineError> {
        let mut cache = self.languages.lock().expect("language cache poisoned");

        if let Some(languages) = cache.as_ref() {
            return Ok(languages.clone());
        }

        let languages = normalize_languages(self.fetch_list("languages")?);
        *cache = Some(languages.clone());
        Ok(languages)
    }

    fn speakers(&self) -> Result<Vec<String>, EngineError> {
        let mut cache = self.speakers.lock().expect("speaker cache poisoned");

        if let Some(speakers) = cache.as_ref() {
            return Ok(speakers.clone());
        }

        let speakers = normalize_speakers(self.fetch_list("speakers")?);
        *cache = Some(speakers.clone());
        Ok(speakers)
    }

    fn synthesize(&self, request: &SynthesisRequest, output: &Path) -> Result<(), EngineError> {
        let url = format!("{}/api/tts", self.base_url);
        info!("requesting synthesis from {url}");

        let response = match &request.speaker_wav {
            Some(wav_path) => {
                // Voice cloning: upload the reference audio alongside the text.
                let audio = std::fs::read(wav_path)
                    .map_err(|_| EngineError::FileNotFound(wav_path.display().to_string()))?;

                let file_name = wav_path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .unwrap_or("speaker.wav");

                let file_part = reqwest::blocking::multipart::Part::bytes(audio)
                    .file_name(file_name.to_string())
                    .mime_str("audio/wav")
                    .map_err(|e| EngineError::RequestFailed(e.to_string()))?;

                let mut form = reqwest::blocking::multipart::Form::new()
                    .part("speaker_wav", file_part)
                    .text("text", request.text.clone())
                    .text("split_sentences", request.split_sentences.to_string());

                if let Some(language) = &request.language {
                    form = form.text("language", language.clone());
                }

                self.client.post(&url).multipart(form).send()
            }
            None => {
                let body = TtsRequestBody {
                    text: &request.text,
                    language: request.language.as_deref(),
                    speaker: request.speaker.as_deref(),
                    split_sentences: request.split_sentences,
                };

                self.client.post(&url).json(&body).send()
            }
        }
        .map_err(|e| EngineError::ConnectionFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(EngineError::RequestFailed(format!(
                "Status: {}",
                response.status()
            )));
        }

        let audio = response
            .bytes()
            .map_err(|e| EngineError::InvalidResponse(e.to_string()))?;

        std::fs::write(output, &audio)?;
        Ok(())
    }
}
