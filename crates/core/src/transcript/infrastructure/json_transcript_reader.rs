use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::shared::error::SyncError;
use crate::transcript::domain::transcript::Transcript;
use crate::transcript::domain::transcript_source::TranscriptSource;
use crate::transcript::domain::word_token::WordToken;

/// Reads word-level transcripts written by an external recognizer.
///
/// Accepted layouts:
/// - a bare array of words: `[{"word": "hi", "start": 0.0, "end": 0.4}]`
/// - an object with a word array: `{"words": [...]}`
/// - faster-whisper style segments: `{"segments": [{"words": [...]}]}`
///
/// Each word may name its text `word` or `text`, and its score
/// `probability` or `confidence`.
#[derive(Debug, Default)]
pub struct JsonTranscriptReader;

impl JsonTranscriptReader {
    pub fn new() -> Self {
        Self
    }
}

impl TranscriptSource for JsonTranscriptReader {
    fn load(&self, path: &Path) -> Result<Transcript, SyncError> {
        let json = fs::read_to_string(path).map_err(|source| SyncError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let words = parse_words(&json).map_err(|source| SyncError::TranscriptFormat {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded {} transcript words from {}", words.len(), path.display());
        Transcript::from_words(words)
    }
}

/// Parses any of the accepted layouts into word tokens, in file order.
pub fn parse_words(json: &str) -> Result<Vec<WordToken>, serde_json::Error> {
    let file: TranscriptFile = serde_json::from_str(json)?;
    let raw = match file {
        TranscriptFile::Words(words) => words,
        TranscriptFile::Flat { words } => words,
        TranscriptFile::Segmented { segments } => {
            segments.into_iter().flat_map(|s| s.words).collect()
        }
    };
    Ok(raw.into_iter().map(RawWord::into_token).collect())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TranscriptFile {
    Words(Vec<RawWord>),
    Segmented { segments: Vec<RawSegment> },
    Flat { words: Vec<RawWord> },
}

#[derive(Deserialize)]
struct RawSegment {
    #[serde(default)]
    words: Vec<RawWord>,
}

#[derive(Deserialize)]
struct RawWord {
    #[serde(alias = "text")]
    word: String,
    start: f64,
    end: f64,
    #[serde(default, alias = "confidence")]
    probability: Option<f32>,
}

impl RawWord {
    fn into_token(self) -> WordToken {
        WordToken {
            text: self.word,
            start: self.start,
            end: self.end,
            confidence: self.probability,
        }
    }
}
