use std::fmt;

use serde::Serialize;

use crate::alignment::domain::aligned_segment::{overlapping_pairs, AlignedSegment};

pub const HIGH_CONFIDENCE: f64 = 0.8;
pub const MEDIUM_CONFIDENCE: f64 = 0.5;

/// Corpus-level statistics over an aligned segment sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignmentSummary {
    pub total_lines: usize,
    /// Segments with confidence >= 0.8.
    pub high_confidence: usize,
    /// Segments with 0.5 <= confidence < 0.8.
    pub medium_confidence: usize,
    /// Segments with confidence < 0.5.
    pub low_confidence: usize,
    pub placeholder_count: usize,
    pub average_confidence: f64,
    /// `max(end) - min(start)` over all segments.
    pub total_duration: f64,
    pub overlapping_pairs: usize,
}

pub struct SegmentSummarizer;

impl SegmentSummarizer {
    pub fn summarize(segments: &[AlignedSegment]) -> AlignmentSummary {
        let mut summary = AlignmentSummary {
            total_lines: segments.len(),
            high_confidence: 0,
            medium_confidence: 0,
            low_confidence: 0,
            placeholder_count: 0,
            average_confidence: 0.0,
            total_duration: 0.0,
            overlapping_pairs: overlapping_pairs(segments).len(),
        };
        if segments.is_empty() {
            return summary;
        }

        let mut confidence_sum = 0.0;
        let mut min_start = f64::INFINITY;
        let mut max_end = f64::NEG_INFINITY;

        for seg in segments {
            let c = seg.confidence();
            confidence_sum += c;
            if c >= HIGH_CONFIDENCE {
                summary.high_confidence += 1;
            } else if c >= MEDIUM_CONFIDENCE {
                summary.medium_confidence += 1;
            } else {
                summary.low_confidence += 1;
            }
            if seg.is_placeholder() {
                summary.placeholder_count += 1;
            }
            min_start = min_start.min(seg.start());
            max_end = max_end.max(seg.end());
        }

        summary.average_confidence = confidence_sum / segments.len() as f64;
        summary.total_duration = (max_end - min_start).max(0.0);
        summary
    }
}

impl fmt::Display for AlignmentSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Alignment summary:")?;
        writeln!(f, "  Total lines: {}", self.total_lines)?;
        writeln!(f, "  High confidence (>=80%): {}", self.high_confidence)?;
        writeln!(f, "  Medium confidence (50-79%): {}", self.medium_confidence)?;
        writeln!(f, "  Low confidence (<50%): {}", self.low_confidence)?;
        writeln!(f, "  Placeholders: {}", self.placeholder_count)?;
        writeln!(f, "  Overlapping pairs: {}", self.overlapping_pairs)?;
        writeln!(f, "  Total duration: {:.1} seconds", self.total_duration)?;
        write!(f, "  Average confidence: {:.2}", self.average_confidence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alignment::domain::aligned_segment::MatchKind;
    use crate::lyrics::domain::lyric_line::LyricLine;
    use crate::transcript::domain::word_token::WordToken;
    use approx::assert_relative_eq;

    fn matched(start: f64, end: f64, confidence: f64) -> AlignedSegment {
        AlignedSegment::matched(
            LyricLine::new(0, "line").unwrap(),
            MatchKind::SingleWindow,
            confidence,
            vec![WordToken::new("line", start, end)],
        )
    }

    fn placeholder(start: f64, end: f64, confidence: f64) -> AlignedSegment {
        AlignedSegment::placeholder(LyricLine::new(0, "line").unwrap(), start, end, confidence)
    }

    #[test]
    fn test_empty_summary() {
        let s = SegmentSummarizer::summarize(&[]);
        assert_eq!(s.total_lines, 0);
        assert_eq!(s.average_confidence, 0.0);
        assert_eq!(s.total_duration, 0.0);
    }

    #[test]
    fn test_band_boundaries() {
        let segments = vec![
            matched(0.0, 1.0, 0.8),
            matched(1.0, 2.0, 0.79),
            matched(2.0, 3.0, 0.5),
            matched(3.0, 4.0, 0.49),
            placeholder(4.0, 5.0, 0.0),
        ];
        let s = SegmentSummarizer::summarize(&segments);
        assert_eq!(s.total_lines, 5);
        assert_eq!(s.high_confidence, 1);
        assert_eq!(s.medium_confidence, 2);
        assert_eq!(s.low_confidence, 2);
        assert_eq!(s.placeholder_count, 1);
    }

    #[test]
    fn test_average_and_duration() {
        let segments = vec![matched(1.0, 2.0, 1.0), matched(2.5, 6.0, 0.5)];
        let s = SegmentSummarizer::summarize(&segments);
        assert_relative_eq!(s.average_confidence, 0.75);
        assert_relative_eq!(s.total_duration, 5.0);
    }

    #[test]
    fn test_duration_uses_extremes_not_endpoints() {
        let segments = vec![matched(1.0, 10.0, 1.0), matched(2.0, 3.0, 1.0)];
        let s = SegmentSummarizer::summarize(&segments);
        assert_relative_eq!(s.total_duration, 9.0);
        assert_eq!(s.overlapping_pairs, 1);
    }

    #[test]
    fn test_display_lists_counts() {
        let s = SegmentSummarizer::summarize(&[matched(0.0, 1.0, 0.9)]);
        let text = s.to_string();
        assert!(text.contains("Total lines: 1"));
        assert!(text.contains("High confidence (>=80%): 1"));
        assert!(text.contains("Average confidence: 0.90"));
    }
}
