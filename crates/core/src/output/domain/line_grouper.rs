use serde::{Deserialize, Serialize};

use crate::output::domain::lyrics_document::{LineRecord, WordRecord};
use crate::transcript::domain::word_token::WordToken;

pub const DEFAULT_MAX_PAUSE: f64 = 1.0;
pub const DEFAULT_MAX_WORDS: usize = 10;

/// Splits a flat word stream into display lines.
///
/// A line breaks when the silence before a word exceeds `max_pause` seconds
/// or the current line already holds `max_words` words.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineGrouper {
    pub max_pause: f64,
    pub max_words: usize,
}

impl Default for LineGrouper {
    fn default() -> Self {
        Self {
            max_pause: DEFAULT_MAX_PAUSE,
            max_words: DEFAULT_MAX_WORDS,
        }
    }
}

impl LineGrouper {
    pub fn new(max_pause: f64, max_words: usize) -> Self {
        Self {
            max_pause,
            max_words: max_words.max(1),
        }
    }

    pub fn group(&self, words: &[WordToken]) -> Vec<LineRecord> {
        let max_words = self.max_words.max(1);
        let mut lines = Vec::new();
        let mut current: Vec<&WordToken> = Vec::new();

        for word in words {
            let breaks = match current.last() {
                Some(prev) => {
                    word.start - prev.end > self.max_pause || current.len() >= max_words
                }
                None => false,
            };
            if breaks {
                lines.push(build_line(lines.len(), &current));
                current.clear();
            }
            current.push(word);
        }
        if !current.is_empty() {
            lines.push(build_line(lines.len(), &current));
        }
        lines
    }
}

fn build_line(index: usize, words: &[&WordToken]) -> LineRecord {
    let owned: Vec<WordToken> = words.iter().map(|w| (*w).clone()).collect();
    let start = owned.first().map(|w| w.start).unwrap_or(0.0);
    let end = owned.iter().map(|w| w.end).fold(start, f64::max);

    let confidences: Option<Vec<f32>> = owned.iter().map(|w| w.confidence).collect();
    let confidence = confidences
        .filter(|c| !c.is_empty())
        .map(|c| c.iter().map(|&v| f64::from(v)).sum::<f64>() / c.len() as f64);

    LineRecord {
        index,
        text: join_words(&owned),
        start,
        end,
        confidence,
        placeholder: false,
        words: owned.iter().map(WordRecord::from).collect(),
    }
}

fn join_words(words: &[WordToken]) -> String {
    words
        .iter()
        .map(|w| w.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn word(text: &str, start: f64, end: f64) -> WordToken {
        WordToken::new(text, start, end)
    }

    #[test]
    fn test_breaks_on_long_pause() {
        let words = vec![
            word("one", 0.0, 0.3),
            word("two", 0.4, 0.7),
            word("three", 2.0, 2.4),
        ];
        let lines = LineGrouper::default().group(&words);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "one two");
        assert_relative_eq!(lines[0].end, 0.7);
        assert_eq!(lines[1].text, "three");
        assert_eq!(lines[1].index, 1);
    }

    #[test]
    fn test_breaks_on_word_limit() {
        let words: Vec<WordToken> = (0..5)
            .map(|i| word("la", i as f64 * 0.2, i as f64 * 0.2 + 0.1))
            .collect();
        let lines = LineGrouper::new(1.0, 2).group(&words);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2].words.len(), 1);
    }

    #[test]
    fn test_confidence_is_mean_when_all_present() {
        let words = vec![
            word("a", 0.0, 0.1).with_confidence(0.5),
            word("b", 0.1, 0.2).with_confidence(1.0),
        ];
        let lines = LineGrouper::default().group(&words);
        assert_relative_eq!(lines[0].confidence.unwrap(), 0.75);
    }

    #[test]
    fn test_confidence_absent_when_any_missing() {
        let words = vec![word("a", 0.0, 0.1).with_confidence(0.5), word("b", 0.1, 0.2)];
        let lines = LineGrouper::default().group(&words);
        assert!(lines[0].confidence.is_none());
    }

    #[test]
    fn test_empty_input() {
        assert!(LineGrouper::default().group(&[]).is_empty());
    }
}
