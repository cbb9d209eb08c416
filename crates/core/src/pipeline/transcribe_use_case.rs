use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::output::domain::line_grouper::LineGrouper;
use crate::output::domain::lyrics_document::LyricsDocument;
use crate::output::domain::lyrics_writer::LyricsWriter;
use crate::shared::constants::TRANSCRIPT_SUFFIX;
use crate::shared::error::SyncError;
use crate::transcript::domain::transcript_source::TranscriptSource;

use super::pipeline_logger::{PipelineLogger, Stage};
use super::sync_lyrics_use_case::{output_stem, write_all};

#[derive(Debug)]
pub struct TranscribeOutcome {
    pub document: LyricsDocument,
    pub written: Vec<PathBuf>,
}

/// Turns a word-level transcript into timed lyrics without a reference
/// lyrics file, grouping words into lines at pauses.
pub struct TranscribeUseCase {
    transcripts: Box<dyn TranscriptSource>,
    grouper: LineGrouper,
    writers: Vec<Box<dyn LyricsWriter>>,
    language: Option<String>,
    model_size: Option<String>,
}

impl TranscribeUseCase {
    pub fn new(
        transcripts: Box<dyn TranscriptSource>,
        grouper: LineGrouper,
        writers: Vec<Box<dyn LyricsWriter>>,
    ) -> Self {
        Self {
            transcripts,
            grouper,
            writers,
            language: None,
            model_size: None,
        }
    }

    /// Recognizer details recorded in the output metadata.
    pub fn with_recognizer_info(
        mut self,
        language: Option<String>,
        model_size: Option<String>,
    ) -> Self {
        self.language = language;
        self.model_size = model_size;
        self
    }

    pub fn run(
        &self,
        transcript_path: &Path,
        output_dir: &Path,
        logger: &mut dyn PipelineLogger,
    ) -> Result<TranscribeOutcome, SyncError> {
        let t0 = Instant::now();
        let transcript = self.transcripts.load(transcript_path)?;
        logger.stage(Stage::Load, t0.elapsed());
        if transcript.is_empty() {
            return Err(SyncError::EmptyTranscript);
        }

        let document = LyricsDocument::from_transcript(&transcript, &self.grouper)
            .with_language(self.language.clone())
            .with_model_size(self.model_size.clone());
        logger.loaded(transcript.len(), document.len());
        log::info!(
            "Grouped {} words into {} lines",
            transcript.len(),
            document.len()
        );

        let stem = output_stem(transcript_path, TRANSCRIPT_SUFFIX);
        let written = write_all(&self.writers, &document, output_dir, &stem, logger)?;
        Ok(TranscribeOutcome { document, written })
    }
}
