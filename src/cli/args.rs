//! CLI argument definitions and parsing.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Text-to-speech CLI for local engines.
#[derive(Parser, Debug)]
#[command(name = "voxpipe")]
#[command(about = "Text-to-speech using local Piper voices and XTTS model servers")]
#[command(version)]
pub struct Args {
    /// TTS engine to use: "piper" (native CLI) or "xtts" (model server)
    #[arg(short, long, value_enum, default_value = "piper")]
    pub engine: EngineKind,

    /// Text to synthesize
    #[arg(short, long, conflicts_with = "text_file")]
    pub text: Option<String>,

    /// Path to a UTF-8 text file to synthesize
    #[arg(long)]
    pub text_file: Option<PathBuf>,

    /// Output WAV file
    #[arg(short, long, default_value = "output.wav")]
    pub output: PathBuf,

    /// Piper voice name without extension (e.g. pt_BR-faber-medium)
    #[arg(short, long)]
    pub voice: Option<String>,

    /// Directory containing Piper voice models
    #[arg(long)]
    pub voice_dir: Option<PathBuf>,

    /// Speaker label, or bare index, for multi-speaker voices
    #[arg(short, long)]
    pub speaker: Option<String>,

    /// Speech length scaling factor (Piper)
    #[arg(long)]
    pub length_scale: Option<f64>,

    /// Noise scale factor controlling speech variability (Piper)
    #[arg(long)]
    pub noise_scale: Option<f64>,

    /// Phoneme noise value controlling prosody randomness (Piper)
    #[arg(long)]
    pub noise_w: Option<f64>,

    /// Target language (XTTS, defaults to "pt")
    #[arg(short, long)]
    pub lang: Option<String>,

    /// Reference WAV file for voice cloning (XTTS)
    #[arg(long)]
    pub speaker_wav: Option<PathBuf>,

    /// Desired sample rate in Hz (XTTS)
    #[arg(long)]
    pub sample_rate: Option<u32>,

    /// Split sentences automatically during synthesis (XTTS)
    #[arg(long)]
    pub split_sentences: bool,

    /// Model server host address (XTTS)
    #[arg(long, default_value = "localhost")]
    pub host: String,

    /// Model server port (XTTS)
    #[arg(long)]
    pub port: Option<u16>,

    /// List available voices (Piper) or languages and speakers (XTTS)
    #[arg(long)]
    pub list_voices: bool,

    /// Show the selectable options derived from a voice configuration
    #[arg(long, value_name = "VOICE")]
    pub show_voice: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,
}

/// TTS engine selection.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EngineKind {
    /// Piper native CLI synthesizer
    #[default]
    #[value(name = "piper")]
    Piper,

    /// XTTS v2 multilingual model server
    #[value(name = "xtts")]
    Xtts,
}

impl EngineKind {
    /// Returns the CLI argument string for this engine.
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineKind::Piper => "piper",
            EngineKind::Xtts => "xtts",
        }
    }

    /// Returns the human-readable name of the engine.
    pub fn name(&self) -> &'static str {
        match self {
            EngineKind::Piper => "Piper",
            EngineKind::Xtts => "XTTS v2",
        }
    }
}
