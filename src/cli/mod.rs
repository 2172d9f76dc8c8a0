//! CLI argument parsing and validation.

mod args;

pub use args::{Args, EngineKind};

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_engine_defaults_to_piper() {
        let args = Args::try_parse_from(["voxpipe", "--text", "olá"]).unwrap();
        assert_eq!(args.engine, EngineKind::Piper);
    }

    #[test]
    fn test_engine_parses_xtts() {
        let args = Args::try_parse_from(["voxpipe", "-e", "xtts", "--text", "olá"]).unwrap();
        assert_eq!(args.engine, EngineKind::Xtts);
    }

    #[test]
    fn test_text_and_text_file_conflict() {
        let result = Args::try_parse_from([
            "voxpipe",
            "--text",
            "olá",
            "--text-file",
            "input.txt",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_default_output_path() {
        let args = Args::try_parse_from(["voxpipe", "--text", "olá"]).unwrap();
        assert_eq!(args.output, std::path::PathBuf::from("output.wav"));
    }

    #[test]
    fn test_piper_flags_parse() {
        let args = Args::try_parse_from([
            "voxpipe",
            "--voice",
            "pt_BR-faber-medium",
            "--speaker",
            "ana",
            "--length-scale",
            "1.1",
            "--noise-scale",
            "0.667",
            "--noise-w",
            "0.8",
            "--text",
            "olá",
        ])
        .unwrap();

        assert_eq!(args.voice.as_deref(), Some("pt_BR-faber-medium"));
        assert_eq!(args.speaker.as_deref(), Some("ana"));
        assert_eq!(args.length_scale, Some(1.1));
        assert_eq!(args.noise_scale, Some(0.667));
        assert_eq!(args.noise_w, Some(0.8));
    }

    #[test]
    fn test_xtts_flags_parse() {
        let args = Args::try_parse_from([
            "voxpipe",
            "-e",
            "xtts",
            "--lang",
            "pt",
            "--speaker-wav",
            "ref.wav",
            "--sample-rate",
            "24000",
            "--split-sentences",
            "--host",
            "tts-server",
            "--port",
            "5002",
            "--text",
            "olá",
        ])
        .unwrap();

        assert_eq!(args.lang.as_deref(), Some("pt"));
        assert!(args.split_sentences);
        assert_eq!(args.host, "tts-server");
        assert_eq!(args.port, Some(5002));
        assert_eq!(args.sample_rate, Some(24000));
    }

    #[test]
    fn test_show_voice_flag() {
        let args = Args::try_parse_from(["voxpipe", "--show-voice", "pt_test"]).unwrap();
        assert_eq!(args.show_voice.as_deref(), Some("pt_test"));
        assert!(args.text.is_none());
    }

    #[test]
    fn test_engine_kind_strings() {
        assert_eq!(EngineKind::Piper.as_str(), "piper");
        assert_eq!(EngineKind::Xtts.as_str(), "xtts");
        assert_eq!(EngineKind::Piper.name(), "Piper");
        assert_eq!(EngineKind::Xtts.name(), "XTTS v2");
    }
}
