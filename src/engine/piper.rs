//! Piper engine: drives the native `piper` CLI as a subprocess.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use super::Engine;
use super::types::{EngineError, SynthesisRequest};
use crate::cli::EngineKind;
use crate::voice::ModelPaths;

/// Subprocess-based engine around the Piper CLI synthesizer.
pub struct PiperEngine {
    binary: PathBuf,
}

impl PiperEngine {
    /// Create an engine using the `piper` binary from `PATH`.
    pub fn new() -> Self {
        Self::with_binary(PathBuf::from("piper"))
    }

    /// Create an engine using a specific binary.
    pub fn with_binary(binary: PathBuf) -> Self {
        Self { binary }
    }

    /// Path of the binary this engine invokes.
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Build the argument vector for one synthesis invocation.
    pub fn build_args(
        request: &SynthesisRequest,
        model: &ModelPaths,
        output: &Path,
    ) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "--model".into(),
            model.model.clone().into_os_string(),
            "--config".into(),
            model.config.clone().into_os_string(),
            "--output_file".into(),
            output.as_os_str().to_os_string(),
            "--text".into(),
            request.text.clone().into(),
        ];

        if let Some(speaker) = request.speaker_id {
            args.push("--speaker".into());
            args.push(speaker.to_string().into());
        }
        if let Some(length_scale) = request.length_scale {
            args.push("--length_scale".into());
            args.push(length_scale.to_string().into());
        }
        if let Some(noise_scale) = request.noise_scale {
            args.push("--noise_scale".into());
            args.push(noise_scale.to_string().into());
        }
        if let Some(noise_w) = request.noise_w {
            args.push("--noise_w".into());
            args.push(noise_w.to_string().into());
        }

        args
    }
}

impl Default for PiperEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine for PiperEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::Piper
    }

    fn languages(&self) -> Result<Vec<String>, EngineError> {
        // Language is baked into each Piper voice model.
        Ok(Vec::new())
    }

    fn speakers(&self) -> Result<Vec<String>, EngineError> {
        // Speakers are per-voice; the catalog derives them from the config.
        Ok(Vec::new())
    }

    fn synthesize(&self, request: &SynthesisRequest, output: &Path) -> Result<(), EngineError> {
        let model = request.model.as_ref().ok_or(EngineError::MissingModel)?;
        let args = Self::build_args(request, model, output);

        info!("invoking {} for {}", self.binary.display(), model.model.display());
        let process = Command::new(&self.binary).args(&args).output()?;

        for line in String::from_utf8_lossy(&process.stdout)
            .lines()
            .chain(String::from_utf8_lossy(&process.stderr).lines())
        {
            let line = line.trim();
            if !line.is_empty() {
                debug!("piper: {line}");
            }
        }

        if !process.status.success() {
            return Err(EngineError::ProcessFailed {
                status: process.status,
                stderr: String::from_utf8_lossy(&process.stderr).trim().to_string(),
            });
        }

        Ok(())
    }
}
