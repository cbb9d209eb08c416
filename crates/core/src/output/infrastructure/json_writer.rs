use serde::Serialize;

use crate::alignment::domain::segment_summarizer::AlignmentSummary;
use crate::output::domain::lyrics_document::{LineRecord, LyricsDocument};
use crate::output::domain::lyrics_writer::LyricsWriter;
use crate::shared::constants::{GENERATOR_NAME, GENERATOR_VERSION};
use crate::shared::error::SyncError;

#[derive(Serialize)]
struct JsonDocument<'a> {
    metadata: Metadata<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<&'a AlignmentSummary>,
    segments: Vec<JsonSegment<'a>>,
}

#[derive(Serialize)]
struct Metadata<'a> {
    generator: &'static str,
    version: &'static str,
    total_segments: usize,
    language: Option<&'a str>,
    model_size: Option<&'a str>,
}

#[derive(Serialize)]
struct JsonSegment<'a> {
    start_time: f64,
    end_time: f64,
    duration: f64,
    text: &'a str,
    confidence: Option<f64>,
    placeholder: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    word_timings: Vec<JsonWord<'a>>,
}

#[derive(Serialize)]
struct JsonWord<'a> {
    word: &'a str,
    start: f64,
    end: f64,
    probability: Option<f32>,
}

impl<'a> From<&'a LineRecord> for JsonSegment<'a> {
    fn from(line: &'a LineRecord) -> Self {
        Self {
            start_time: line.start,
            end_time: line.end,
            duration: line.duration(),
            text: &line.text,
            confidence: line.confidence,
            placeholder: line.placeholder,
            word_timings: line
                .words
                .iter()
                .map(|w| JsonWord {
                    word: &w.text,
                    start: w.start,
                    end: w.end,
                    probability: w.confidence,
                })
                .collect(),
        }
    }
}

/// Pretty-printed JSON with generator metadata, the run summary and
/// per-segment word timings.
#[derive(Default)]
pub struct JsonWriter;

impl JsonWriter {
    pub fn new() -> Self {
        Self
    }
}

impl LyricsWriter for JsonWriter {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn render(&self, document: &LyricsDocument) -> Result<String, SyncError> {
        let json = JsonDocument {
            metadata: Metadata {
                generator: GENERATOR_NAME,
                version: GENERATOR_VERSION,
                total_segments: document.lines.len(),
                language: document.language.as_deref(),
                model_size: document.model_size.as_deref(),
            },
            summary: document.summary.as_ref(),
            segments: document.lines.iter().map(JsonSegment::from).collect(),
        };
        let mut out = serde_json::to_string_pretty(&json).map_err(SyncError::Serialize)?;
        out.push('\n');
        Ok(out)
    }
}
