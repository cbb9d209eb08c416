use serde::Serialize;

use crate::lyrics::domain::text_normalizer::normalize;

/// One line of target lyrics, without timing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LyricLine {
    /// Position of the line in its source, kept across dropped blank lines.
    pub index: usize,
    pub raw_text: String,
    pub normalized_text: String,
}

impl LyricLine {
    /// Builds a line, or `None` when nothing is left after normalization.
    pub fn new(index: usize, raw_text: &str) -> Option<Self> {
        let normalized_text = normalize(raw_text);
        if normalized_text.is_empty() {
            return None;
        }
        Some(Self {
            index,
            raw_text: raw_text.trim().to_string(),
            normalized_text,
        })
    }

    pub fn word_count(&self) -> usize {
        self.normalized_text.split_whitespace().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes_and_trims() {
        let line = LyricLine::new(3, "  Hello, World!  ").unwrap();
        assert_eq!(line.index, 3);
        assert_eq!(line.raw_text, "Hello, World!");
        assert_eq!(line.normalized_text, "hello world");
        assert_eq!(line.word_count(), 2);
    }

    #[test]
    fn test_new_rejects_blank_and_punctuation_only() {
        assert!(LyricLine::new(0, "").is_none());
        assert!(LyricLine::new(0, "   ").is_none());
        assert!(LyricLine::new(0, "...!").is_none());
    }
}
