use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::alignment::domain::alignment_engine::AlignmentEngine;
use crate::alignment::domain::alignment_run::AlignmentRun;
use crate::lyrics::infrastructure::lyrics_file_reader::LyricsFileReader;
use crate::output::domain::lyrics_document::LyricsDocument;
use crate::output::domain::lyrics_writer::{write_document, LyricsWriter};
use crate::shared::constants::SYNCED_SUFFIX;
use crate::shared::error::SyncError;
use crate::transcript::domain::transcript_source::TranscriptSource;

use super::pipeline_logger::{PipelineLogger, Stage};

/// Result of one synchronization: the aligned run and the files written.
#[derive(Debug)]
pub struct SyncOutcome {
    pub run: AlignmentRun,
    pub written: Vec<PathBuf>,
}

/// Aligns a lyrics file against a word-level transcript and writes the
/// synchronized lyrics in every configured format.
///
/// Holds no per-run state, so one instance can serve many runs, including
/// concurrent ones from batch workers.
pub struct SyncLyricsUseCase {
    transcripts: Box<dyn TranscriptSource>,
    lyrics: LyricsFileReader,
    engine: AlignmentEngine,
    writers: Vec<Box<dyn LyricsWriter>>,
}

impl SyncLyricsUseCase {
    pub fn new(
        transcripts: Box<dyn TranscriptSource>,
        engine: AlignmentEngine,
        writers: Vec<Box<dyn LyricsWriter>>,
    ) -> Self {
        Self {
            transcripts,
            lyrics: LyricsFileReader::new(),
            engine,
            writers,
        }
    }

    pub fn run(
        &self,
        transcript_path: &Path,
        lyrics_path: &Path,
        output_dir: &Path,
        logger: &mut dyn PipelineLogger,
    ) -> Result<SyncOutcome, SyncError> {
        let t0 = Instant::now();
        let transcript = self.transcripts.load(transcript_path)?;
        let lines = self.lyrics.load_lines(lyrics_path)?;
        logger.stage(Stage::Load, t0.elapsed());
        logger.loaded(transcript.len(), lines.len());

        let t0 = Instant::now();
        let run = self.engine.align(&transcript, &lines)?;
        logger.stage(Stage::Align, t0.elapsed());
        logger.aligned(&run.summary());

        let document = LyricsDocument::from_run(&run);
        let stem = output_stem(lyrics_path, SYNCED_SUFFIX);
        let written = write_all(&self.writers, &document, output_dir, &stem, logger)?;

        Ok(SyncOutcome { run, written })
    }
}

/// Renders `document` with every writer, reporting each file written.
pub(crate) fn write_all(
    writers: &[Box<dyn LyricsWriter>],
    document: &LyricsDocument,
    output_dir: &Path,
    stem: &str,
    logger: &mut dyn PipelineLogger,
) -> Result<Vec<PathBuf>, SyncError> {
    let t0 = Instant::now();
    let mut written = Vec::with_capacity(writers.len());
    for writer in writers {
        let path = write_document(writer.as_ref(), document, output_dir, stem)?;
        logger.wrote(&path);
        written.push(path);
    }
    logger.stage(Stage::Write, t0.elapsed());
    Ok(written)
}

/// `<file stem><suffix>`, e.g. `song.lrc` becomes `song_synced`.
pub(crate) fn output_stem(path: &Path, suffix: &str) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "lyrics".to_string());
    format!("{stem}{suffix}")
}
