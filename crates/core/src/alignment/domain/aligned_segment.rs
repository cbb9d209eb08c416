use serde::Serialize;

use crate::lyrics::domain::lyric_line::LyricLine;
use crate::transcript::domain::word_token::WordToken;

/// Consecutive segments may overlap by this much before it counts as overlap.
pub const OVERLAP_TOLERANCE: f64 = 0.05;

/// How a segment's interval was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchKind {
    /// One contiguous window of transcript words.
    SingleWindow,
    /// Two windows separated by filler words; the filler is not matched.
    MultiWindow,
    /// No candidate reached the threshold; the interval is interpolated.
    Placeholder,
}

impl MatchKind {
    pub fn label(&self) -> &'static str {
        match self {
            MatchKind::SingleWindow => "single-window",
            MatchKind::MultiWindow => "multi-window",
            MatchKind::Placeholder => "placeholder",
        }
    }
}

/// One lyric line placed on the audio timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignedSegment {
    line: LyricLine,
    kind: MatchKind,
    start: f64,
    end: f64,
    confidence: f64,
    matched_tokens: Vec<WordToken>,
}

impl AlignedSegment {
    pub(crate) fn matched(
        line: LyricLine,
        kind: MatchKind,
        confidence: f64,
        matched_tokens: Vec<WordToken>,
    ) -> Self {
        let start = matched_tokens.first().map(|w| w.start).unwrap_or(0.0);
        let end = matched_tokens
            .iter()
            .map(|w| w.end)
            .fold(start, f64::max);
        Self {
            line,
            kind,
            start,
            end,
            confidence: confidence.clamp(0.0, 1.0),
            matched_tokens,
        }
    }

    pub(crate) fn placeholder(line: LyricLine, start: f64, end: f64, confidence: f64) -> Self {
        Self {
            line,
            kind: MatchKind::Placeholder,
            start,
            end: end.max(start),
            confidence: confidence.clamp(0.0, 1.0),
            matched_tokens: Vec::new(),
        }
    }

    /// The lyric line this segment carries, matched or not.
    pub fn line(&self) -> &LyricLine {
        &self.line
    }

    /// The line this segment satisfies, or `None` for a placeholder.
    pub fn assigned_line(&self) -> Option<&LyricLine> {
        (!self.is_placeholder()).then_some(&self.line)
    }

    pub fn kind(&self) -> MatchKind {
        self.kind
    }

    pub fn is_placeholder(&self) -> bool {
        self.kind == MatchKind::Placeholder
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn matched_tokens(&self) -> &[WordToken] {
        &self.matched_tokens
    }

    pub fn contains_time(&self, time: f64) -> bool {
        self.start <= time && time <= self.end
    }
}

/// Index pairs `(i, i + 1)` whose intervals overlap beyond [`OVERLAP_TOLERANCE`].
pub fn overlapping_pairs(segments: &[AlignedSegment]) -> Vec<(usize, usize)> {
    segments
        .windows(2)
        .enumerate()
        .filter(|(_, pair)| pair[0].end > pair[1].start + OVERLAP_TOLERANCE)
        .map(|(i, _)| (i, i + 1))
        .collect()
}
