//! Voice options and the on-disk voice catalog.
//!
//! A voice is a Piper `.onnx` model with a sibling `.onnx.json`
//! configuration. The configuration drives which options (speakers, numeric
//! inference parameters) are offered for selection.

mod catalog;
mod options;

pub use catalog::{CatalogError, ModelPaths, VOICE_DIR_ENV, VoiceCatalog};
pub use options::{
    NumericChoice, NumericChoices, NumericParam, SpeakerChoice, VoiceOptions,
    extract_numeric_choices, extract_speaker_choices, parse_voice_config,
};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;
    use tempfile::TempDir;

    // ===========================================
    // Speaker extraction tests
    // ===========================================

    #[test]
    fn test_parse_config_with_named_speakers() {
        let config = json!({
            "speaker_id_map": {"alice": 0, "bob": 1},
            "inference": {
                "length_scale": 1.0,
                "noise_scale": 0.667,
                "noise_w": 0.333,
            },
        });

        let options = parse_voice_config("pt_test", &config);

        assert_eq!(options.name, "pt_test");
        assert_eq!(options.speaker_choices.len(), 2);
        assert_eq!(options.speaker_choices[0].label, "alice");
        assert_eq!(options.speaker_choices[0].id, 0);
        assert_eq!(options.speaker_choices[1].label, "bob");
        assert_eq!(options.speaker_choices[1].id, 1);
        assert_eq!(options.default_speaker.as_deref(), Some("alice"));

        let length_scale = options.numeric(NumericParam::LengthScale).unwrap();
        assert!(length_scale.value(&length_scale.default_label).is_some());
        assert_eq!(length_scale.default_value(), 1.0);
        assert!(length_scale.choices.iter().any(|choice| choice.value != 1.0));
    }

    #[test]
    fn test_speaker_map_sorted_by_index() {
        let config = json!({
            "speaker_id_map": {"zoe": 2, "amy": 1, "kim": 0},
        });

        let (choices, default) = extract_speaker_choices(&config);

        let labels: Vec<&str> = choices.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, ["kim", "amy", "zoe"]);
        assert_eq!(default.as_deref(), Some("kim"));
    }

    #[test]
    fn test_speaker_map_ties_keep_declaration_order() {
        let config = json!({
            "speaker_id_map": {"beta": 0, "alpha": 0},
        });

        let (choices, default) = extract_speaker_choices(&config);

        assert_eq!(choices[0].label, "beta");
        assert_eq!(choices[1].label, "alpha");
        assert_eq!(default.as_deref(), Some("beta"));
    }

    #[test]
    fn test_speaker_map_skips_malformed_indices() {
        let config = json!({
            "speaker_id_map": {"ana": 0, "broken": "zero"},
        });

        let (choices, _) = extract_speaker_choices(&config);

        assert_eq!(choices.len(), 1);
        assert_eq!(choices[0].label, "ana");
    }

    #[test]
    fn test_parse_config_with_speaker_count() {
        let config = json!({
            "num_speakers": 3,
            "inference": {"length_scale": 1.2},
        });

        let options = parse_voice_config("multi", &config);

        let labels: Vec<&str> = options
            .speaker_choices
            .iter()
            .map(|c| c.label.as_str())
            .collect();
        assert_eq!(labels, ["Speaker 0", "Speaker 1", "Speaker 2"]);
        assert_eq!(options.speaker_id("Speaker 1"), Some(1));
        assert_eq!(options.default_speaker.as_deref(), Some("Speaker 0"));
    }

    #[test]
    fn test_single_speaker_has_no_choices() {
        let config = json!({"num_speakers": 1});

        let (choices, default) = extract_speaker_choices(&config);

        assert!(choices.is_empty());
        assert!(default.is_none());
    }

    #[test]
    fn test_parse_config_without_optional_fields() {
        let options = parse_voice_config("simple", &json!({}));

        assert!(options.speaker_choices.is_empty());
        assert!(options.default_speaker.is_none());
        assert!(options.numeric.is_empty());
    }

    // ===========================================
    // Numeric ladder tests
    // ===========================================

    #[test]
    fn test_ladder_around_one() {
        let config = json!({"inference": {"length_scale": 1.0}});

        let choices = extract_numeric_choices(&config, NumericParam::LengthScale).unwrap();

        let labels: Vec<&str> = choices.labels().collect();
        assert_eq!(labels, ["0.75", "0.9", "1", "1.1", "1.25"]);
        assert_eq!(choices.value("0.75"), Some(0.75));
        assert_eq!(choices.value("0.9"), Some(0.9));
        assert_eq!(choices.value("1"), Some(1.0));
        assert_eq!(choices.value("1.1"), Some(1.1));
        assert_eq!(choices.value("1.25"), Some(1.25));
        assert_eq!(choices.default_label, "1");
    }

    #[test]
    fn test_ladder_around_one_point_two() {
        let config = json!({"inference": {"noise_w": 1.2}});

        let choices = extract_numeric_choices(&config, NumericParam::NoiseW).unwrap();

        let labels: Vec<&str> = choices.labels().collect();
        assert_eq!(labels, ["0.9", "1.08", "1.2", "1.32", "1.5"]);
        assert_eq!(choices.default_label, "1.2");
        assert_eq!(choices.default_value(), 1.2);
    }

    #[test]
    fn test_negative_default_clamps_and_appends_default_label() {
        // Every ladder candidate clamps to zero, so the default's own label
        // lands after the sorted ladder.
        let config = json!({"inference": {"noise_scale": -0.5}});

        let choices = extract_numeric_choices(&config, NumericParam::NoiseScale).unwrap();

        let labels: Vec<&str> = choices.labels().collect();
        assert_eq!(labels, ["0", "-0.5"]);
        assert_eq!(choices.value("0"), Some(0.0));
        assert_eq!(choices.value("-0.5"), Some(-0.5));
        assert_eq!(choices.default_label, "-0.5");
    }

    #[test]
    fn test_default_label_always_present() {
        for default in [0.0, 0.1, 0.333, 0.667, 1.0, 1.2, 2.5, 7.89, 100.0] {
            let config = json!({"inference": {"length_scale": default}});
            let choices = extract_numeric_choices(&config, NumericParam::LengthScale).unwrap();

            assert!(
                choices.value(&choices.default_label).is_some(),
                "default label {:?} missing for default {default}",
                choices.default_label,
            );
            assert!(choices.choices.len() <= 6);
        }
    }

    #[test]
    fn test_zero_default_collapses_to_single_choice() {
        let config = json!({"inference": {"length_scale": 0.0}});

        let choices = extract_numeric_choices(&config, NumericParam::LengthScale).unwrap();

        let labels: Vec<&str> = choices.labels().collect();
        assert_eq!(labels, ["0"]);
        assert_eq!(choices.default_label, "0");
    }

    #[test]
    fn test_missing_inference_means_unsupported() {
        assert!(extract_numeric_choices(&json!({}), NumericParam::LengthScale).is_none());
        assert!(
            extract_numeric_choices(&json!({"inference": 3}), NumericParam::LengthScale).is_none()
        );
        assert!(
            extract_numeric_choices(
                &json!({"inference": {"noise_scale": 0.5}}),
                NumericParam::LengthScale,
            )
            .is_none()
        );
        assert!(
            extract_numeric_choices(
                &json!({"inference": {"length_scale": "fast"}}),
                NumericParam::LengthScale,
            )
            .is_none()
        );
    }

    #[test]
    fn test_parse_config_collects_only_configured_params() {
        let config = json!({
            "inference": {"length_scale": 1.0, "noise_w": 0.8},
        });

        let options = parse_voice_config("partial", &config);

        assert!(options.numeric(NumericParam::LengthScale).is_some());
        assert!(options.numeric(NumericParam::NoiseScale).is_none());
        assert!(options.numeric(NumericParam::NoiseW).is_some());
    }

    // ===========================================
    // Catalog tests
    // ===========================================

    fn write_voice(dir: &Path, name: &str, config: &serde_json::Value) {
        std::fs::create_dir_all(dir).unwrap();
        std::fs::write(dir.join(format!("{name}.onnx")), b"onnx").unwrap();
        std::fs::write(
            dir.join(format!("{name}.onnx.json")),
            serde_json::to_string_pretty(config).unwrap(),
        )
        .unwrap();
    }

    #[test]
    fn test_catalog_discover_empty() {
        let temp_dir = TempDir::new().unwrap();
        let catalog = VoiceCatalog::with_dir(temp_dir.path().to_path_buf());

        assert!(catalog.discover().unwrap().is_empty());
    }

    #[test]
    fn test_catalog_discover_missing_dir() {
        let catalog = VoiceCatalog::with_dir(PathBuf::from("/nonexistent/voxpipe-voices"));

        assert!(catalog.discover().unwrap().is_empty());
    }

    #[test]
    fn test_catalog_discover_nested_and_sorted() {
        let temp_dir = TempDir::new().unwrap();
        write_voice(temp_dir.path(), "zeta", &json!({}));
        write_voice(&temp_dir.path().join("pt/br"), "alpha", &json!({}));

        let catalog = VoiceCatalog::with_dir(temp_dir.path().to_path_buf());
        let names = catalog.discover().unwrap();

        assert_eq!(names, ["alpha", "zeta"]);
    }

    #[test]
    fn test_catalog_resolve_unknown_voice() {
        let temp_dir = TempDir::new().unwrap();
        write_voice(temp_dir.path(), "present", &json!({}));

        let catalog = VoiceCatalog::with_dir(temp_dir.path().to_path_buf());
        let result = catalog.resolve("absent");

        assert!(matches!(result, Err(CatalogError::VoiceNotFound(_))));
    }

    #[test]
    fn test_catalog_resolve_missing_config() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("bare.onnx"), b"onnx").unwrap();

        let catalog = VoiceCatalog::with_dir(temp_dir.path().to_path_buf());
        let result = catalog.resolve("bare");

        assert!(matches!(result, Err(CatalogError::ConfigMissing { .. })));
    }

    #[test]
    fn test_catalog_resolve_paths() {
        let temp_dir = TempDir::new().unwrap();
        write_voice(temp_dir.path(), "pt_BR-faber-medium", &json!({}));

        let catalog = VoiceCatalog::with_dir(temp_dir.path().to_path_buf());
        let paths = catalog.resolve("pt_BR-faber-medium").unwrap();

        assert_eq!(paths.model, temp_dir.path().join("pt_BR-faber-medium.onnx"));
        assert_eq!(
            paths.config,
            temp_dir.path().join("pt_BR-faber-medium.onnx.json")
        );
    }

    #[test]
    fn test_catalog_rejects_traversal_names() {
        let temp_dir = TempDir::new().unwrap();
        let catalog = VoiceCatalog::with_dir(temp_dir.path().to_path_buf());

        assert!(matches!(
            catalog.resolve("../evil"),
            Err(CatalogError::InvalidName(_))
        ));
        assert!(matches!(
            catalog.resolve(""),
            Err(CatalogError::InvalidName(_))
        ));
    }

    #[test]
    fn test_catalog_options_cached() {
        let temp_dir = TempDir::new().unwrap();
        write_voice(temp_dir.path(), "cached", &json!({"num_speakers": 3}));

        let catalog = VoiceCatalog::with_dir(temp_dir.path().to_path_buf());
        let first = catalog.options("cached").unwrap();
        assert_eq!(first.speaker_choices.len(), 3);

        // Rewriting the config must not change what the catalog serves.
        write_voice(temp_dir.path(), "cached", &json!({"num_speakers": 5}));
        let second = catalog.options("cached").unwrap();

        assert_eq!(second.speaker_choices.len(), 3);
        assert!(Arc::ptr_eq(&first, &second));
    }
}
