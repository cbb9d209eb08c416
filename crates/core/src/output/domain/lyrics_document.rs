use serde::Serialize;

use crate::alignment::domain::alignment_run::AlignmentRun;
use crate::alignment::domain::segment_summarizer::AlignmentSummary;
use crate::output::domain::line_grouper::LineGrouper;
use crate::transcript::domain::transcript::Transcript;
use crate::transcript::domain::word_token::WordToken;

/// One timed word inside a rendered line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordRecord {
    pub text: String,
    pub start: f64,
    pub end: f64,
    pub confidence: Option<f32>,
}

impl From<&WordToken> for WordRecord {
    fn from(word: &WordToken) -> Self {
        Self {
            text: word.text.clone(),
            start: word.start,
            end: word.end,
            confidence: word.confidence,
        }
    }
}

/// One timed line ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineRecord {
    pub index: usize,
    pub text: String,
    pub start: f64,
    pub end: f64,
    pub confidence: Option<f64>,
    pub placeholder: bool,
    pub words: Vec<WordRecord>,
}

impl LineRecord {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    fn contains_time(&self, time: f64) -> bool {
        self.start <= time && time <= self.end
    }
}

/// Format-neutral view of timed lyrics shared by every writer.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct LyricsDocument {
    pub lines: Vec<LineRecord>,
    pub summary: Option<AlignmentSummary>,
    pub language: Option<String>,
    pub model_size: Option<String>,
}

impl LyricsDocument {
    pub fn from_run(run: &AlignmentRun) -> Self {
        let lines = run
            .segments()
            .iter()
            .map(|seg| LineRecord {
                index: seg.line().index,
                text: seg.line().raw_text.clone(),
                start: seg.start(),
                end: seg.end(),
                confidence: Some(seg.confidence()),
                placeholder: seg.is_placeholder(),
                words: seg.matched_tokens().iter().map(WordRecord::from).collect(),
            })
            .collect();

        let parameters = run.parameters();
        Self {
            lines,
            summary: Some(run.summary()),
            language: parameters.language.clone(),
            model_size: parameters.model_size.clone(),
        }
    }

    /// Builds a document straight from recognized words, grouping them into
    /// lines at pauses.
    pub fn from_transcript(transcript: &Transcript, grouper: &LineGrouper) -> Self {
        Self {
            lines: grouper.group(transcript.words()),
            ..Self::default()
        }
    }

    pub fn with_language(mut self, language: Option<String>) -> Self {
        self.language = language;
        self
    }

    pub fn with_model_size(mut self, model_size: Option<String>) -> Self {
        self.model_size = model_size;
        self
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Position of the first line sung at `time`.
    pub fn active_line(&self, time: f64) -> Option<usize> {
        self.lines.iter().position(|line| line.contains_time(time))
    }

    /// `(line, word)` positions of the word sung at `time`.
    pub fn active_word(&self, time: f64) -> Option<(usize, usize)> {
        let line_pos = self.active_line(time)?;
        let word_pos = self.lines[line_pos]
            .words
            .iter()
            .position(|w| w.start <= time && time <= w.end)?;
        Some((line_pos, word_pos))
    }
}
