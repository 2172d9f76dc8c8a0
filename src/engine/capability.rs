//! Static capability table: which options each engine kind accepts.
//!
//! Engines never see options they do not support; requests are filtered
//! against this table before they are built.

use crate::cli::EngineKind;

/// Optional synthesis parameters an engine may accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynthesisOption {
    Speaker,
    LengthScale,
    NoiseScale,
    NoiseW,
    Language,
    SpeakerWav,
    SampleRate,
    SplitSentences,
}

impl SynthesisOption {
    /// CLI flag name for this option, used in diagnostics.
    pub fn flag(&self) -> &'static str {
        match self {
            SynthesisOption::Speaker => "speaker",
            SynthesisOption::LengthScale => "length-scale",
            SynthesisOption::NoiseScale => "noise-scale",
            SynthesisOption::NoiseW => "noise-w",
            SynthesisOption::Language => "lang",
            SynthesisOption::SpeakerWav => "speaker-wav",
            SynthesisOption::SampleRate => "sample-rate",
            SynthesisOption::SplitSentences => "split-sentences",
        }
    }
}

impl EngineKind {
    /// Options this engine kind accepts.
    pub fn supported_options(&self) -> &'static [SynthesisOption] {
        match self {
            EngineKind::Piper => &[
                SynthesisOption::Speaker,
                SynthesisOption::LengthScale,
                SynthesisOption::NoiseScale,
                SynthesisOption::NoiseW,
            ],
            EngineKind::Xtts => &[
                SynthesisOption::Speaker,
                SynthesisOption::Language,
                SynthesisOption::SpeakerWav,
                SynthesisOption::SampleRate,
                SynthesisOption::SplitSentences,
            ],
        }
    }

    /// Whether this engine kind accepts an option.
    pub fn supports(&self, option: SynthesisOption) -> bool {
        self.supported_options().contains(&option)
    }
}
