use std::cmp::Ordering;
use std::ops::Range;

use crate::alignment::domain::aligned_segment::MatchKind;
use crate::alignment::domain::alignment_config::AlignmentConfig;
use crate::lyrics::domain::lyric_line::LyricLine;
use crate::matching::domain::similarity_scorer::SimilarityScorer;
use crate::matching::domain::window_scorer::WindowScorer;

/// Scores are compared at this resolution so ranking is a total order.
const SCORE_RESOLUTION: f64 = 1e9;

/// Margin below a reference score within which candidates are still scored.
pub const SCORE_SLACK: f64 = 1e-6;

/// A scored set of transcript token spans proposed for one lyric line.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Non-empty, ordered, non-overlapping token index ranges.
    pub spans: Vec<Range<usize>>,
    pub score: f64,
    pub kind: MatchKind,
}

impl Candidate {
    pub fn token_count(&self) -> usize {
        self.spans.iter().map(|s| s.len()).sum()
    }

    pub fn first_index(&self) -> usize {
        self.spans.first().map(|s| s.start).unwrap_or(0)
    }

    /// Index of the last token covered.
    pub fn last_index(&self) -> usize {
        self.spans
            .last()
            .map(|s| s.end.saturating_sub(1))
            .unwrap_or(0)
    }

    pub fn token_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.spans.iter().flat_map(|s| s.clone())
    }

    /// Ranking: higher score, then fewer tokens, then earlier start, then
    /// earlier end. `Ordering::Less` means `self` ranks first.
    pub fn rank_cmp(&self, other: &Candidate) -> Ordering {
        quantize(other.score)
            .cmp(&quantize(self.score))
            .then_with(|| self.token_count().cmp(&other.token_count()))
            .then_with(|| self.first_index().cmp(&other.first_index()))
            .then_with(|| self.last_index().cmp(&other.last_index()))
    }

    pub fn is_better_than(&self, other: &Candidate) -> bool {
        self.rank_cmp(other) == Ordering::Less
    }
}

fn quantize(score: f64) -> i64 {
    (score * SCORE_RESOLUTION).round() as i64
}

/// Everything a strategy needs to search windows for one line.
pub struct SearchContext<'a> {
    pub line: &'a LyricLine,
    /// Normalized text of every transcript token, by index.
    pub token_texts: &'a [String],
    /// Token indices a candidate's first span may start at.
    pub start_range: Range<usize>,
    /// Longest total number of tokens in a candidate.
    pub max_len: usize,
    pub scorer: &'a SimilarityScorer,
    pub config: &'a AlignmentConfig,
}

impl SearchContext<'_> {
    pub fn token_count(&self) -> usize {
        self.token_texts.len()
    }

    /// Longest single window starting at `start`, capped at the transcript end.
    pub fn max_len_from(&self, start: usize) -> usize {
        self.max_len.min(self.token_count().saturating_sub(start))
    }

    /// Scorer for windows grown token by token against this line.
    pub fn window_scorer(&self) -> WindowScorer<'_> {
        WindowScorer::new(self.scorer, &self.line.normalized_text)
    }
}

/// Lowest score a new candidate needs to be worth ranking against the best
/// of `references`. Candidates within [`SCORE_SLACK`] of it are still
/// scored, so equal scores are left to the tie-breaks.
pub fn score_floor(references: impl IntoIterator<Item = f64>) -> f64 {
    references
        .into_iter()
        .reduce(f64::max)
        .map_or(f64::NEG_INFINITY, |best| best - SCORE_SLACK)
}

/// One way of proposing transcript spans for a lyric line.
///
/// Strategies run in order; each sees the proposals of those before it.
/// Proposals are returned best first.
pub trait MatchStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn propose(&self, ctx: &SearchContext<'_>, earlier: &[Candidate]) -> Vec<Candidate>;
}
