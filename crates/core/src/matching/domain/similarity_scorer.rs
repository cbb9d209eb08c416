use serde::{Deserialize, Serialize};

use crate::matching::domain::edit_distance::indel_ratio;

/// Most substrings of the longer string tried by the partial measure.
pub const MAX_PARTIAL_WINDOWS: usize = 32;

/// Weights of the three measures in the combined score. They sum to 1, so the
/// combined score stays in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub ratio: f64,
    pub partial: f64,
    pub token_sort: f64,
}

pub const DEFAULT_WEIGHTS: ScoreWeights = ScoreWeights {
    ratio: 0.45,
    partial: 0.20,
    token_sort: 0.35,
};

impl Default for ScoreWeights {
    fn default() -> Self {
        DEFAULT_WEIGHTS
    }
}

impl ScoreWeights {
    pub fn sum(&self) -> f64 {
        self.ratio + self.partial + self.token_sort
    }
}

/// Individual measures behind one combined score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityBreakdown {
    /// Indel ratio over the full strings.
    pub ratio: f64,
    /// Best indel ratio of the shorter string against equal-length substrings
    /// of the longer one. Substrings start where the shorter string's first
    /// character occurs, capped at [`MAX_PARTIAL_WINDOWS`], or at either end.
    pub partial: f64,
    /// Indel ratio after sorting whitespace-separated tokens.
    pub token_sort: f64,
    pub combined: f64,
}

/// Fuzzy text similarity in [0, 1].
///
/// `combined = w.ratio * ratio + w.partial * partial + w.token_sort * token_sort`,
/// with identical strings short-circuiting to exactly 1 and an empty string
/// scoring 0 against any non-empty one.
///
/// The partial measure alone would rate any fragment of a line as a perfect
/// match, which is why it only contributes a fifth of the score: a window
/// holding half the words of a line cannot outrank the window holding all of
/// them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityScorer {
    weights: ScoreWeights,
    ignore_whitespace: bool,
}

impl Default for SimilarityScorer {
    fn default() -> Self {
        Self::new(DEFAULT_WEIGHTS)
    }
}

impl SimilarityScorer {
    pub fn new(weights: ScoreWeights) -> Self {
        Self {
            weights,
            ignore_whitespace: false,
        }
    }

    /// Character measures compare the strings with whitespace removed. Used
    /// for scripts where recognizer token boundaries are not word boundaries.
    pub fn ignoring_whitespace(mut self, ignore: bool) -> Self {
        self.ignore_whitespace = ignore;
        self
    }

    pub fn weights(&self) -> ScoreWeights {
        self.weights
    }

    pub fn ignores_whitespace(&self) -> bool {
        self.ignore_whitespace
    }

    pub fn score(&self, a: &str, b: &str) -> f64 {
        self.score_at_least(a, b, f64::NEG_INFINITY).unwrap_or(0.0)
    }

    /// Combined score, or `None` when it falls below `floor`.
    ///
    /// Measures are computed cheapest first, and evaluation stops once the
    /// ones left cannot lift the score to `floor`. A returned score is
    /// identical to [`SimilarityScorer::score`].
    pub fn score_at_least(&self, a: &str, b: &str, floor: f64) -> Option<f64> {
        if a == b {
            return (1.0 >= floor).then_some(1.0);
        }
        if a.is_empty() || b.is_empty() {
            return (0.0 >= floor).then_some(0.0);
        }

        let (ca, cb) = (self.comparable_chars(a), self.comparable_chars(b));
        let ratio = indel_ratio(&ca, &cb);
        let (sa, sb) = (
            self.comparable_chars(&sorted_tokens(a)),
            self.comparable_chars(&sorted_tokens(b)),
        );
        if self.upper_bound(ratio, length_bound(sa.len(), sb.len())) < floor {
            return None;
        }
        let token_sort = indel_ratio(&sa, &sb);
        if self.upper_bound(ratio, token_sort) < floor {
            return None;
        }
        let combined = self.combine(ratio, partial_ratio(&ca, &cb), token_sort);
        (combined >= floor).then_some(combined)
    }

    /// Highest combined score reachable with the given indel ratio and an
    /// upper bound on the token-sort ratio, taking the partial measure as 1.
    pub fn upper_bound(&self, ratio: f64, token_sort_bound: f64) -> f64 {
        if self.weights.sum() > 0.0 {
            self.combine(ratio, 1.0, token_sort_bound)
        } else {
            1.0
        }
    }

    fn combine(&self, ratio: f64, partial: f64, token_sort: f64) -> f64 {
        let w = self.weights;
        let total = w.sum();
        if total > 0.0 {
            ((w.ratio * ratio + w.partial * partial + w.token_sort * token_sort) / total)
                .clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    pub fn breakdown(&self, a: &str, b: &str) -> SimilarityBreakdown {
        if a == b {
            return SimilarityBreakdown {
                ratio: 1.0,
                partial: 1.0,
                token_sort: 1.0,
                combined: 1.0,
            };
        }
        if a.is_empty() || b.is_empty() {
            return SimilarityBreakdown {
                ratio: 0.0,
                partial: 0.0,
                token_sort: 0.0,
                combined: 0.0,
            };
        }

        let (ca, cb) = (self.comparable_chars(a), self.comparable_chars(b));
        let ratio = indel_ratio(&ca, &cb);
        let partial = partial_ratio(&ca, &cb);
        let token_sort = indel_ratio(
            &self.comparable_chars(&sorted_tokens(a)),
            &self.comparable_chars(&sorted_tokens(b)),
        );

        SimilarityBreakdown {
            ratio,
            partial,
            token_sort,
            combined: self.combine(ratio, partial, token_sort),
        }
    }

    fn comparable_chars(&self, text: &str) -> Vec<char> {
        if self.ignore_whitespace {
            text.chars().filter(|c| !c.is_whitespace()).collect()
        } else {
            text.chars().collect()
        }
    }
}

/// Combined similarity with the default weights.
pub fn score(a: &str, b: &str) -> f64 {
    SimilarityScorer::default().score(a, b)
}

fn partial_ratio(a: &[char], b: &[char]) -> f64 {
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    if short.is_empty() {
        return if long.is_empty() { 1.0 } else { 0.0 };
    }
    if short.len() == long.len() {
        return indel_ratio(short, long);
    }

    let last = long.len() - short.len();
    let mut starts: Vec<usize> = long[..=last]
        .iter()
        .enumerate()
        .filter(|(_, c)| **c == short[0])
        .map(|(i, _)| i)
        .take(MAX_PARTIAL_WINDOWS)
        .collect();
    starts.push(0);
    starts.push(last);
    starts.sort_unstable();
    starts.dedup();

    let mut best = 0.0f64;
    for start in starts {
        let r = indel_ratio(short, &long[start..start + short.len()]);
        if r > best {
            best = r;
            if best >= 1.0 {
                break;
            }
        }
    }
    best
}

/// Indel ratio of two strings of these lengths if one contained the other.
pub fn length_bound(a: usize, b: usize) -> f64 {
    if a + b == 0 {
        1.0
    } else {
        2.0 * a.min(b) as f64 / (a + b) as f64
    }
}

fn sorted_tokens(text: &str) -> String {
    let mut tokens: Vec<&str> = text.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}
