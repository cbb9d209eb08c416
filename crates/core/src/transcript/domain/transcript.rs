use crate::shared::error::SyncError;
use crate::transcript::domain::word_token::WordToken;

/// Ordered, read-only sequence of recognized words.
///
/// Construction enforces `start >= 0`, finite times and `end >= start`, and
/// sorts by `start` when the recognizer emitted words out of order. Small
/// overlaps between neighbouring words are kept as-is.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Transcript {
    words: Vec<WordToken>,
}

impl Transcript {
    pub fn from_words(words: Vec<WordToken>) -> Result<Self, SyncError> {
        let mut kept = Vec::with_capacity(words.len());
        for (index, mut word) in words.into_iter().enumerate() {
            let trimmed = word.text.trim();
            if trimmed.is_empty() {
                continue;
            }
            if !word.start.is_finite() || !word.end.is_finite() {
                return Err(SyncError::InvalidTranscript {
                    index,
                    reason: "non-finite timestamp".to_string(),
                });
            }
            if word.start < 0.0 {
                return Err(SyncError::InvalidTranscript {
                    index,
                    reason: format!("negative start time {}", word.start),
                });
            }
            if trimmed.len() != word.text.len() {
                word.text = trimmed.to_string();
            }
            if word.end < word.start {
                word.end = word.start;
            }
            kept.push(word);
        }

        if !is_sorted_by_start(&kept) {
            log::warn!("Transcript words are not ordered by start time; sorting");
            kept.sort_by(|a, b| a.start.total_cmp(&b.start));
        }

        Ok(Self { words: kept })
    }

    pub fn words(&self) -> &[WordToken] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Start of the first word, or 0 for an empty transcript.
    pub fn start_time(&self) -> f64 {
        self.words.first().map(|w| w.start).unwrap_or(0.0)
    }

    /// Latest end time over all words, or 0 for an empty transcript.
    pub fn end_time(&self) -> f64 {
        self.words.iter().map(|w| w.end).fold(0.0, f64::max)
    }
}

fn is_sorted_by_start(words: &[WordToken]) -> bool {
    words.windows(2).all(|pair| pair[0].start <= pair[1].start)
}
