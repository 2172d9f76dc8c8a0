//! Voice discovery, model path resolution, and cached option loading.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use thiserror::Error;
use tracing::debug;

use super::options::{VoiceOptions, parse_voice_config};

/// Environment variable overriding the default voices directory.
pub const VOICE_DIR_ENV: &str = "VOXPIPE_VOICE_DIR";

/// Errors that can occur while locating or loading voices.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Voice not found: {0}")]
    VoiceNotFound(String),

    #[error("Configuration file missing for voice '{voice}': {path}")]
    ConfigMissing { voice: String, path: PathBuf },

    #[error("Invalid voice name: {0}")]
    InvalidName(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Resolved on-disk paths for one voice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelPaths {
    pub model: PathBuf,
    pub config: PathBuf,
}

/// Catalog of Piper voices under one directory.
///
/// Owns a per-voice cache of derived options; each voice is loaded and
/// derived at most once for the lifetime of the catalog.
pub struct VoiceCatalog {
    voices_dir: PathBuf,
    cache: Mutex<HashMap<String, Arc<VoiceOptions>>>,
}

impl VoiceCatalog {
    /// Create a catalog over the default voices directory.
    ///
    /// `VOXPIPE_VOICE_DIR` wins when set; otherwise `~/.voxpipe/voices`.
    pub fn new() -> Self {
        let voices_dir = match std::env::var_os(VOICE_DIR_ENV) {
            Some(dir) => PathBuf::from(dir),
            None => dirs::home_dir()
                .expect("Could not find home directory")
                .join(".voxpipe")
                .join("voices"),
        };

        Self::with_dir(voices_dir)
    }

    /// Create a catalog over a custom directory.
    pub fn with_dir(voices_dir: PathBuf) -> Self {
        Self {
            voices_dir,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Get the voices directory path.
    pub fn voices_dir(&self) -> &Path {
        &self.voices_dir
    }

    /// Validate a voice name.
    fn validate_name(name: &str) -> Result<(), CatalogError> {
        if name.is_empty() {
            return Err(CatalogError::InvalidName("Name cannot be empty".to_string()));
        }

        // Prevent path traversal
        if name.contains('/') || name.contains('\\') || name.contains("..") {
            return Err(CatalogError::InvalidName(
                "Name cannot contain path separators".to_string(),
            ));
        }

        Ok(())
    }

    /// List available voice names: unique `*.onnx` stems, sorted.
    pub fn discover(&self) -> Result<Vec<String>, CatalogError> {
        if !self.voices_dir.exists() {
            return Ok(Vec::new());
        }

        let mut names = BTreeSet::new();
        collect_models(&self.voices_dir, &mut |path| {
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                names.insert(stem.to_string());
            }
        })?;

        Ok(names.into_iter().collect())
    }

    /// Resolve the model and configuration paths for a voice.
    pub fn resolve(&self, name: &str) -> Result<ModelPaths, CatalogError> {
        Self::validate_name(name)?;

        if !self.voices_dir.exists() {
            return Err(CatalogError::VoiceNotFound(name.to_string()));
        }

        let wanted = format!("{name}.onnx");
        let mut model: Option<PathBuf> = None;
        collect_models(&self.voices_dir, &mut |path| {
            if model.is_none()
                && path.file_name().and_then(|file| file.to_str()) == Some(wanted.as_str())
            {
                model = Some(path.to_path_buf());
            }
        })?;

        let model = model.ok_or_else(|| CatalogError::VoiceNotFound(name.to_string()))?;
        let mut config = model.clone().into_os_string();
        config.push(".json");
        let config = PathBuf::from(config);

        if !config.exists() {
            return Err(CatalogError::ConfigMissing {
                voice: name.to_string(),
                path: config,
            });
        }

        Ok(ModelPaths { model, config })
    }

    /// Derived options for a voice, computed once and cached.
    pub fn options(&self, name: &str) -> Result<Arc<VoiceOptions>, CatalogError> {
        let mut cache = self.cache.lock().expect("voice cache poisoned");

        if let Some(options) = cache.get(name) {
            return Ok(Arc::clone(options));
        }

        let paths = self.resolve(name)?;
        debug!("loading voice configuration from {}", paths.config.display());
        let raw = std::fs::read_to_string(&paths.config)?;
        let config: serde_json::Value = serde_json::from_str(&raw)?;
        let options = Arc::new(parse_voice_config(name, &config));

        cache.insert(name.to_string(), Arc::clone(&options));
        Ok(options)
    }
}

impl Default for VoiceCatalog {
    fn default() -> Self {
        Self::new()
    }
}

/// Walk a directory tree in sorted order, visiting every `.onnx` file.
fn collect_models(
    dir: &Path,
    visit: &mut dyn FnMut(&Path),
) -> Result<(), std::io::Error> {
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .map(|entry| entry.path())
        .collect();
    entries.sort();

    for path in entries {
        if path.is_dir() {
            collect_models(&path, visit)?;
        } else if path.extension().is_some_and(|ext| ext == "onnx") {
            visit(&path);
        }
    }

    Ok(())
}
