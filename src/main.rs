//! voxpipe CLI entry point.

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use voxpipe::cli::{Args, EngineKind};
use voxpipe::engine::{
    DEFAULT_PORT, Engine, PiperEngine, RequestOptions, Synthesizer, XttsEngine,
};
use voxpipe::text::read_text_file;
use voxpipe::voice::VoiceCatalog;

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.debug);

    let catalog = match &args.voice_dir {
        Some(dir) => VoiceCatalog::with_dir(dir.clone()),
        None => VoiceCatalog::new(),
    };

    match args.engine {
        EngineKind::Piper => run(&Synthesizer::new(PiperEngine::new(), catalog), &args),
        EngineKind::Xtts => {
            let port = args.port.unwrap_or(DEFAULT_PORT);
            let engine = XttsEngine::new(&args.host, port);
            run(&Synthesizer::new(engine, catalog), &args)
        }
    }
}

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn run<E: Engine>(synthesizer: &Synthesizer<E>, args: &Args) -> Result<()> {
    // Handle utility commands first
    if args.list_voices {
        return list_voices(synthesizer);
    }

    if let Some(name) = &args.show_voice {
        return show_voice(synthesizer, name);
    }

    let text = load_text(args)?;
    let options = RequestOptions {
        voice: args.voice.clone(),
        speaker: args.speaker.clone(),
        length_scale: args.length_scale,
        noise_scale: args.noise_scale,
        noise_w: args.noise_w,
        language: args.lang.clone(),
        speaker_wav: args.speaker_wav.clone(),
        sample_rate: args.sample_rate,
        split_sentences: args.split_sentences,
    };

    let outcome = synthesizer
        .synthesize(&text, &options, &args.output)
        .context("Failed to synthesize speech")?;

    println!("Audio saved to: {}", outcome.output.display());
    if let Some(audio) = &outcome.audio {
        println!(
            "  Duration: {:.2}s ({} Hz, {} channel(s))",
            audio.duration_secs, audio.sample_rate, audio.channels
        );
    }
    println!("  Generated in {:.2}s", outcome.elapsed.as_secs_f64());

    Ok(())
}

fn load_text(args: &Args) -> Result<String> {
    if let Some(text) = &args.text {
        return Ok(text.clone());
    }

    if let Some(path) = &args.text_file {
        return read_text_file(path)
            .with_context(|| format!("Failed to read text file: {}", path.display()));
    }

    anyhow::bail!(
        "No text provided. Use -t/--text or --text-file, or one of --list-voices / --show-voice."
    )
}

fn list_voices<E: Engine>(synthesizer: &Synthesizer<E>) -> Result<()> {
    match synthesizer.engine_kind() {
        EngineKind::Piper => {
            let voices = synthesizer.voices().context("Failed to list voices")?;

            if voices.is_empty() {
                println!(
                    "No voices found in {}.",
                    synthesizer.catalog().voices_dir().display()
                );
                return Ok(());
            }

            println!("Available voices:");
            for voice in voices {
                println!("  {voice}");
            }
        }
        EngineKind::Xtts => {
            let languages = synthesizer
                .languages()
                .context("Failed to fetch languages from the model server")?;
            let speakers = synthesizer
                .speakers()
                .context("Failed to fetch speakers from the model server")?;

            println!("Languages: {}", languages.join(", "));
            println!("Speakers: {}", speakers.join(", "));
        }
    }

    Ok(())
}

fn show_voice<E: Engine>(synthesizer: &Synthesizer<E>, name: &str) -> Result<()> {
    let options = synthesizer
        .voice_options(name)
        .with_context(|| format!("Failed to load voice '{name}'"))?;

    println!("Voice: {}", options.name);

    if options.speaker_choices.is_empty() {
        println!("  Single speaker");
    } else {
        println!("  Speakers:");
        for choice in &options.speaker_choices {
            let marker = if options.default_speaker.as_deref() == Some(choice.label.as_str()) {
                "  (default)"
            } else {
                ""
            };
            println!("    {} -> {}{marker}", choice.label, choice.id);
        }
    }

    for (param, choices) in &options.numeric {
        let labels: Vec<String> = choices
            .labels()
            .map(|label| {
                if label == choices.default_label {
                    format!("[{label}]")
                } else {
                    label.to_string()
                }
            })
            .collect();
        println!("  {}: {}", param.key(), labels.join(" "));
    }

    Ok(())
}
