//! Derivation of selectable synthesis options from a voice configuration.

use serde_json::Value;

/// Scaling factors applied to a configured default to build the value ladder.
const LADDER_FACTORS: [f64; 5] = [0.75, 0.9, 1.0, 1.1, 1.25];

/// Numeric inference parameters a Piper voice can expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericParam {
    LengthScale,
    NoiseScale,
    NoiseW,
}

impl NumericParam {
    /// All parameters, in the order they are surfaced to the user.
    pub const ALL: [NumericParam; 3] = [
        NumericParam::LengthScale,
        NumericParam::NoiseScale,
        NumericParam::NoiseW,
    ];

    /// Key of this parameter inside the config's `inference` object.
    pub fn key(&self) -> &'static str {
        match self {
            NumericParam::LengthScale => "length_scale",
            NumericParam::NoiseScale => "noise_scale",
            NumericParam::NoiseW => "noise_w",
        }
    }
}

/// A selectable speaker within a multi-speaker voice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeakerChoice {
    pub label: String,
    pub id: i64,
}

/// One labeled value in a numeric parameter ladder.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericChoice {
    pub label: String,
    pub value: f64,
}

/// Ladder of values around one configured default.
///
/// `default_label` is always present among the choices. Labels are unique;
/// the default entry may sit after the sorted ladder when its formatting
/// differs from every generated candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericChoices {
    pub choices: Vec<NumericChoice>,
    pub default_label: String,
}

impl NumericChoices {
    /// Look up the value behind a label.
    pub fn value(&self, label: &str) -> Option<f64> {
        self.choices
            .iter()
            .find(|choice| choice.label == label)
            .map(|choice| choice.value)
    }

    /// Value behind the default label.
    pub fn default_value(&self) -> f64 {
        self.value(&self.default_label).unwrap_or(0.0)
    }

    /// Labels in presentation order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.choices.iter().map(|choice| choice.label.as_str())
    }
}

/// Options a voice exposes for selection, derived from its configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceOptions {
    pub name: String,
    pub speaker_choices: Vec<SpeakerChoice>,
    pub default_speaker: Option<String>,
    pub numeric: Vec<(NumericParam, NumericChoices)>,
}

impl VoiceOptions {
    /// Ladder for a numeric parameter, if the voice configures it.
    pub fn numeric(&self, param: NumericParam) -> Option<&NumericChoices> {
        self.numeric
            .iter()
            .find(|(candidate, _)| *candidate == param)
            .map(|(_, choices)| choices)
    }

    /// Speaker index for a display label.
    pub fn speaker_id(&self, label: &str) -> Option<i64> {
        self.speaker_choices
            .iter()
            .find(|choice| choice.label == label)
            .map(|choice| choice.id)
    }
}

/// Derive the selectable options for a voice from its parsed configuration.
///
/// Missing or malformed fields degrade to absent options; this never fails.
pub fn parse_voice_config(voice_name: &str, config: &Value) -> VoiceOptions {
    let (speaker_choices, default_speaker) = extract_speaker_choices(config);

    let mut numeric = Vec::new();
    for param in NumericParam::ALL {
        if let Some(choices) = extract_numeric_choices(config, param) {
            numeric.push((param, choices));
        }
    }

    VoiceOptions {
        name: voice_name.to_string(),
        speaker_choices,
        default_speaker,
        numeric,
    }
}

/// Speaker choices in ascending index order, plus the default label.
///
/// Prefers the `speaker_id_map` object; falls back to synthesizing labels
/// from `num_speakers`. Single-speaker voices get no choices at all.
pub fn extract_speaker_choices(config: &Value) -> (Vec<SpeakerChoice>, Option<String>) {
    if let Some(map) = config.get("speaker_id_map").and_then(Value::as_object)
        && !map.is_empty()
    {
        let mut choices: Vec<SpeakerChoice> = map
            .iter()
            .filter_map(|(label, id)| {
                id.as_i64().map(|id| SpeakerChoice {
                    label: label.clone(),
                    id,
                })
            })
            .collect();

        if !choices.is_empty() {
            // Stable sort: equal indices keep declaration order.
            choices.sort_by_key(|choice| choice.id);
            let default = choices.first().map(|choice| choice.label.clone());
            return (choices, default);
        }
    }

    if let Some(num_speakers) = config.get("num_speakers").and_then(Value::as_i64)
        && num_speakers > 1
    {
        let choices = (0..num_speakers)
            .map(|id| SpeakerChoice {
                label: format!("Speaker {id}"),
                id,
            })
            .collect();
        return (choices, Some("Speaker 0".to_string()));
    }

    (Vec::new(), None)
}

/// Build the value ladder for one numeric parameter.
///
/// Returns `None` when the configuration has no numeric default for it.
pub fn extract_numeric_choices(config: &Value, param: NumericParam) -> Option<NumericChoices> {
    let inference = config.get("inference")?.as_object()?;
    let default = inference.get(param.key())?.as_f64()?;

    let mut candidates: Vec<f64> = LADDER_FACTORS
        .iter()
        .map(|factor| round5(default * factor).max(0.0))
        .collect();
    candidates.sort_by(f64::total_cmp);
    candidates.dedup();

    let mut choices: Vec<NumericChoice> = candidates
        .into_iter()
        .map(|candidate| {
            let label = format_value(candidate);
            // The stored value is the label parsed back, so that label and
            // value can never disagree.
            let value = label.parse().unwrap_or(candidate);
            NumericChoice { label, value }
        })
        .collect();
    // Nearby candidates can format to the same label; keep the first.
    choices.dedup_by(|a, b| a.label == b.label);

    let default_label = format_value(default);
    if !choices.iter().any(|choice| choice.label == default_label) {
        choices.push(NumericChoice {
            label: default_label.clone(),
            value: default,
        });
    }

    Some(NumericChoices {
        choices,
        default_label,
    })
}

fn round5(value: f64) -> f64 {
    (value * 100_000.0).round() / 100_000.0
}

/// Canonical label formatting: three decimals with trailing zeros and the
/// trailing dot stripped, `1.000` becoming `"1"`.
fn format_value(value: f64) -> String {
    let formatted = format!("{value:.3}");
    let trimmed = if formatted.contains('.') {
        formatted.trim_end_matches('0').trim_end_matches('.')
    } else {
        formatted.as_str()
    };

    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}
