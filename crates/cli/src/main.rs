use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};

use lyricsync_core::alignment::domain::alignment_engine::AlignmentEngine;
use lyricsync_core::output::domain::line_grouper::LineGrouper;
use lyricsync_core::output::domain::lyrics_writer::LyricsWriter;
use lyricsync_core::output::infrastructure::lrc_writer::LrcTags;
use lyricsync_core::output::infrastructure::writer_factory::{create_writer, OutputFormat};
use lyricsync_core::pipeline::batch_executor::{load_manifest, BatchConfig, BatchExecutor};
use lyricsync_core::pipeline::infrastructure::threaded_batch_executor::ThreadedBatchExecutor;
use lyricsync_core::pipeline::pipeline_logger::{PipelineLogger, RunReportLogger};
use lyricsync_core::pipeline::sync_lyrics_use_case::SyncLyricsUseCase;
use lyricsync_core::pipeline::transcribe_use_case::TranscribeUseCase;
use lyricsync_core::shared::settings::Settings;
use lyricsync_core::transcript::infrastructure::json_transcript_reader::JsonTranscriptReader;

/// Align lyrics to word-level transcripts and write timed lyric files.
#[derive(Parser)]
#[command(name = "lyricsync", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Align a lyrics file (.txt, .lrc, .srt) to a transcript.
    Sync {
        /// Word-level transcript JSON.
        transcript: PathBuf,

        /// Lyrics file to synchronize.
        lyrics: PathBuf,

        #[command(flatten)]
        output: OutputArgs,

        #[command(flatten)]
        alignment: AlignmentArgs,
    },
    /// Write timed lyrics straight from a transcript, without reference lyrics.
    Transcribe {
        /// Word-level transcript JSON.
        transcript: PathBuf,

        #[command(flatten)]
        output: OutputArgs,

        /// Start a new line after a pause longer than this (seconds).
        #[arg(long)]
        max_pause: Option<f64>,

        /// Maximum words per line.
        #[arg(long)]
        max_words: Option<usize>,
    },
    /// Synchronize every transcript/lyrics pair listed in a JSON manifest.
    Batch {
        /// Manifest: `[{"transcript": ..., "lyrics": ..., "output_dir": ...}]`.
        manifest: PathBuf,

        #[command(flatten)]
        output: OutputArgs,

        #[command(flatten)]
        alignment: AlignmentArgs,

        /// Worker threads (default: available cores).
        #[arg(long)]
        jobs: Option<usize>,
    },
}

#[derive(Args)]
struct OutputArgs {
    /// Directory for output files (default: next to the input).
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Output formats: lrc, elrc, srt, json, txt (comma-separated).
    #[arg(long, value_delimiter = ',')]
    format: Option<Vec<OutputFormat>>,

    /// Settings file (default: the platform config directory).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Transcript language code, e.g. en or ko.
    #[arg(long)]
    language: Option<String>,

    /// Recognizer model size recorded in the output metadata.
    #[arg(long)]
    model_size: Option<String>,

    /// Artist written to the LRC `[ar:]` tag.
    #[arg(long)]
    artist: Option<String>,

    /// Title written to the LRC `[ti:]` tag.
    #[arg(long)]
    title: Option<String>,
}

impl OutputArgs {
    fn lrc_tags(&self) -> LrcTags {
        LrcTags::new(self.artist.clone(), self.title.clone())
    }
}

#[derive(Args)]
struct AlignmentArgs {
    /// Minimum similarity (0.0-1.0) for a line to count as matched.
    #[arg(long)]
    threshold: Option<f64>,

    /// Longest window as a multiple of the line's word count (>= 1.0).
    #[arg(long)]
    max_window_expansion: Option<f64>,

    /// Tokens before the cursor a window may start at.
    #[arg(long)]
    lookback_margin: Option<usize>,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    match cli.command {
        Command::Sync {
            transcript,
            lyrics,
            output,
            alignment,
        } => run_sync(&transcript, &lyrics, &output, &alignment),
        Command::Transcribe {
            transcript,
            output,
            max_pause,
            max_words,
        } => run_transcribe(&transcript, &output, max_pause, max_words),
        Command::Batch {
            manifest,
            output,
            alignment,
            jobs,
        } => run_batch(&manifest, &output, &alignment, jobs),
    }
}

fn run_sync(
    transcript: &Path,
    lyrics: &Path,
    output: &OutputArgs,
    alignment: &AlignmentArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let settings = resolve_settings(output, Some(alignment))?;
    let use_case = build_sync_use_case(&settings, &output.lrc_tags())?;
    let output_dir = output_dir_for(output, lyrics);

    let mut logger = RunReportLogger::new();
    let outcome = use_case.run(transcript, lyrics, &output_dir, &mut logger)?;
    logger.finish();

    for (a, b) in outcome.run.overlaps() {
        log::warn!("Segments {a} and {b} overlap");
    }
    log::info!(
        "Synchronized {} lines into {} files in {}",
        outcome.run.len(),
        outcome.written.len(),
        output_dir.display()
    );
    Ok(())
}

fn run_transcribe(
    transcript: &Path,
    output: &OutputArgs,
    max_pause: Option<f64>,
    max_words: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut settings = resolve_settings(output, None)?;
    if let Some(pause) = max_pause {
        settings.line_grouping.max_pause = pause;
    }
    if let Some(words) = max_words {
        settings.line_grouping.max_words = words;
    }

    let grouper = LineGrouper::new(
        settings.line_grouping.max_pause,
        settings.line_grouping.max_words,
    );
    let use_case = TranscribeUseCase::new(
        Box::new(JsonTranscriptReader::new()),
        grouper,
        build_writers(&settings.formats, &output.lrc_tags()),
    )
    .with_recognizer_info(
        settings.alignment.language.clone(),
        settings.alignment.model_size.clone(),
    );

    let output_dir = output_dir_for(output, transcript);
    let mut logger = RunReportLogger::new();
    let outcome = use_case.run(transcript, &output_dir, &mut logger)?;
    logger.finish();

    log::info!(
        "Wrote {} lines into {} files in {}",
        outcome.document.len(),
        outcome.written.len(),
        output_dir.display()
    );
    Ok(())
}

fn run_batch(
    manifest: &Path,
    output: &OutputArgs,
    alignment: &AlignmentArgs,
    jobs: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let settings = resolve_settings(output, Some(alignment))?;
    let use_case = Arc::new(build_sync_use_case(&settings, &output.lrc_tags())?);
    let batch = load_manifest(manifest)?;
    let executor = match jobs {
        Some(n) => ThreadedBatchExecutor::new(n),
        None => ThreadedBatchExecutor::default(),
    };
    log::info!(
        "Running {} jobs on {} workers",
        batch.len(),
        executor.workers()
    );

    let config = BatchConfig {
        output_dir: output_dir_for(output, manifest),
        on_progress: Some(Box::new(|done: usize, total: usize| {
            eprint!("\rSynchronized {done}/{total}");
        })),
    };
    let labels: Vec<PathBuf> = batch.iter().map(|job| job.lyrics.clone()).collect();
    let results = executor.execute(use_case, batch, config);
    eprintln!();

    let mut failures = 0;
    for (label, result) in labels.iter().zip(&results) {
        match result {
            Ok(outcome) => {
                let summary = outcome.run.summary();
                log::info!(
                    "{}: {} lines, {} placeholders, avg confidence {:.2}",
                    label.display(),
                    summary.total_lines,
                    summary.placeholder_count,
                    summary.average_confidence
                );
            }
            Err(e) => {
                failures += 1;
                eprintln!("Failed {}: {e}", label.display());
            }
        }
    }

    if failures > 0 {
        return Err(format!("{failures} of {} jobs failed", results.len()).into());
    }
    Ok(())
}

fn build_sync_use_case(
    settings: &Settings,
    tags: &LrcTags,
) -> Result<SyncLyricsUseCase, Box<dyn std::error::Error>> {
    let engine = AlignmentEngine::new(settings.alignment.clone())?;
    Ok(SyncLyricsUseCase::new(
        Box::new(JsonTranscriptReader::new()),
        engine,
        build_writers(&settings.formats, tags),
    ))
}

fn build_writers(formats: &[OutputFormat], tags: &LrcTags) -> Vec<Box<dyn LyricsWriter>> {
    let mut seen = Vec::new();
    for format in formats {
        if !seen.contains(format) {
            seen.push(*format);
        }
    }
    seen.into_iter()
        .map(|format| create_writer(format, tags))
        .collect()
}

/// Loads the settings file and applies command-line overrides on top.
fn resolve_settings(
    output: &OutputArgs,
    alignment: Option<&AlignmentArgs>,
) -> Result<Settings, Box<dyn std::error::Error>> {
    let mut settings = Settings::load(output.config.as_deref())?;

    if let Some(ref formats) = output.format {
        settings.formats = formats.clone();
    }
    if settings.formats.is_empty() {
        settings.formats = OutputFormat::DEFAULT.to_vec();
    }
    if output.language.is_some() {
        settings.alignment.language = output.language.clone();
    }
    if output.model_size.is_some() {
        settings.alignment.model_size = output.model_size.clone();
    }

    if let Some(args) = alignment {
        if let Some(threshold) = args.threshold {
            settings.alignment.similarity_threshold = threshold;
        }
        if let Some(expansion) = args.max_window_expansion {
            settings.alignment.max_window_expansion = expansion;
        }
        if let Some(margin) = args.lookback_margin {
            settings.alignment.lookback_margin = margin;
        }
    }

    settings.alignment.validate()?;
    Ok(settings)
}

fn output_dir_for(output: &OutputArgs, input: &Path) -> PathBuf {
    if let Some(ref dir) = output.output_dir {
        return dir.clone();
    }
    match input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    match &cli.command {
        Command::Sync {
            transcript,
            lyrics,
            alignment,
            ..
        } => {
            require_file(transcript, "Transcript")?;
            require_file(lyrics, "Lyrics")?;
            validate_alignment(alignment)
        }
        Command::Transcribe {
            transcript,
            max_pause,
            max_words,
            ..
        } => {
            require_file(transcript, "Transcript")?;
            if let Some(pause) = max_pause {
                if !pause.is_finite() || *pause < 0.0 {
                    return Err(format!("Max pause must be a non-negative number, got {pause}").into());
                }
            }
            if *max_words == Some(0) {
                return Err("Max words must be at least 1".into());
            }
            Ok(())
        }
        Command::Batch {
            manifest,
            alignment,
            jobs,
            ..
        } => {
            require_file(manifest, "Manifest")?;
            if *jobs == Some(0) {
                return Err("Jobs must be at least 1".into());
            }
            validate_alignment(alignment)
        }
    }
}

fn validate_alignment(args: &AlignmentArgs) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(threshold) = args.threshold {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(format!("Threshold must be between 0.0 and 1.0, got {threshold}").into());
        }
    }
    if let Some(expansion) = args.max_window_expansion {
        if !expansion.is_finite() || expansion < 1.0 {
            return Err(format!(
                "Max window expansion must be at least 1.0, got {expansion}"
            )
            .into());
        }
    }
    Ok(())
}

fn require_file(path: &Path, what: &str) -> Result<(), Box<dyn std::error::Error>> {
    if !path.is_file() {
        return Err(format!("{what} file not found: {}", path.display()).into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lyricsync_core::output::domain::lyrics_document::LyricsDocument;
    use std::fs;

    fn inputs() -> (tempfile::TempDir, String, String) {
        let tmp = tempfile::tempdir().unwrap();
        let transcript = tmp.path().join("song.json");
        let lyrics = tmp.path().join("song.txt");
        fs::write(&transcript, "[]").unwrap();
        fs::write(&lyrics, "hello\n").unwrap();
        let t = transcript.to_string_lossy().into_owned();
        let l = lyrics.to_string_lossy().into_owned();
        (tmp, t, l)
    }

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("lyricsync").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_sync_accepts_valid_arguments() {
        let (_tmp, t, l) = inputs();
        let cli = parse(&["sync", &t, &l, "--threshold", "0.7", "--format", "lrc,json"]);
        assert!(validate(&cli).is_ok());
        if let Command::Sync { output, .. } = cli.command {
            assert_eq!(
                output.format,
                Some(vec![OutputFormat::Lrc, OutputFormat::Json])
            );
        } else {
            panic!("expected sync");
        }
    }

    #[test]
    fn test_threshold_out_of_range_rejected() {
        let (_tmp, t, l) = inputs();
        let cli = parse(&["sync", &t, &l, "--threshold", "1.5"]);
        let err = validate(&cli).unwrap_err();
        assert!(err.to_string().contains("Threshold"));
    }

    #[test]
    fn test_small_expansion_rejected() {
        let (_tmp, t, l) = inputs();
        let cli = parse(&["sync", &t, &l, "--max-window-expansion", "0.5"]);
        assert!(validate(&cli).is_err());
    }

    #[test]
    fn test_missing_lyrics_rejected() {
        let (_tmp, t, _) = inputs();
        let cli = parse(&["sync", &t, "/definitely/not/here.txt"]);
        let err = validate(&cli).unwrap_err();
        assert!(err.to_string().contains("Lyrics file not found"));
    }

    #[test]
    fn test_unknown_format_fails_to_parse() {
        let (_tmp, t, l) = inputs();
        let result = Cli::try_parse_from(["lyricsync", "sync", t.as_str(), l.as_str(), "--format", "vtt"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_transcribe_zero_words_rejected() {
        let (_tmp, t, _) = inputs();
        let cli = parse(&["transcribe", &t, "--max-words", "0"]);
        assert!(validate(&cli).is_err());
    }

    #[test]
    fn test_batch_zero_jobs_rejected() {
        let (_tmp, t, _) = inputs();
        let cli = parse(&["batch", &t, "--jobs", "0"]);
        assert!(validate(&cli).is_err());
    }

    #[test]
    fn test_flags_override_settings_file() {
        let (tmp, t, l) = inputs();
        let config = tmp.path().join("settings.json");
        fs::write(
            &config,
            r#"{"alignment": {"similarity_threshold": 0.5, "lookback_margin": 5}, "formats": ["txt"]}"#,
        )
        .unwrap();
        let config = config.to_string_lossy().into_owned();
        let cli = parse(&["sync", &t, &l, "--config", &config, "--threshold", "0.8", "--language", "ko"]);
        let Command::Sync { output, alignment, .. } = cli.command else {
            panic!("expected sync");
        };
        let settings = resolve_settings(&output, Some(&alignment)).unwrap();
        assert_eq!(settings.alignment.similarity_threshold, 0.8);
        assert_eq!(settings.alignment.lookback_margin, 5);
        assert_eq!(settings.alignment.language.as_deref(), Some("ko"));
        assert_eq!(settings.formats, vec![OutputFormat::Txt]);
    }

    #[test]
    fn test_duplicate_formats_write_once() {
        let writers = build_writers(
            &[OutputFormat::Lrc, OutputFormat::Lrc, OutputFormat::Srt],
            &LrcTags::default(),
        );
        assert_eq!(writers.len(), 2);
    }

    #[test]
    fn test_artist_and_title_reach_lrc_header() {
        let (_tmp, t, l) = inputs();
        let cli = parse(&["sync", &t, &l, "--artist", "Queen", "--title", "We Will Rock You"]);
        let Command::Sync { output, .. } = cli.command else {
            panic!("expected sync");
        };
        let writers = build_writers(&[OutputFormat::Lrc], &output.lrc_tags());
        let rendered = writers[0].render(&LyricsDocument::default()).unwrap();
        assert!(rendered.starts_with("[ar:Queen]\n[ti:We Will Rock You]\n"));
    }

    #[test]
    fn test_output_dir_defaults_to_input_parent() {
        let (_tmp, t, l) = inputs();
        let cli = parse(&["sync", &t, &l]);
        let Command::Sync { output, lyrics, .. } = cli.command else {
            panic!("expected sync");
        };
        assert_eq!(output_dir_for(&output, &lyrics), lyrics.parent().unwrap());
        assert_eq!(output_dir_for(&output, Path::new("bare.txt")), PathBuf::from("."));
    }
}
