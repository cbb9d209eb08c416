use serde::{Deserialize, Serialize};

use crate::matching::domain::similarity_scorer::SimilarityScorer;
use crate::shared::constants::UNSPACED_LANGUAGES;
use crate::shared::error::SyncError;

pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.6;
pub const DEFAULT_MAX_WINDOW_EXPANSION: f64 = 1.5;
pub const DEFAULT_LOOKBACK_MARGIN: usize = 2;
pub const DEFAULT_SEARCH_HORIZON: usize = 0;
pub const DEFAULT_MAX_GAP_TOKENS: usize = 3;
pub const DEFAULT_MULTI_WINDOW_ANCHORS: usize = 4;
pub const DEFAULT_MULTI_WINDOW_MARGIN: f64 = 0.3;

/// Tuning for one alignment run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentConfig {
    /// Minimum score for a window to be accepted as a line's match.
    pub similarity_threshold: f64,
    /// Longest candidate window, as a multiple of the line's word count.
    pub max_window_expansion: f64,
    /// Tokens before the cursor that window starts may reach back to.
    pub lookback_margin: usize,
    /// Tokens after the cursor considered as window starts. 0, the default,
    /// searches to the end of the transcript.
    pub search_horizon: usize,
    /// Largest filler gap bridged by a two-window match. 0 disables
    /// multi-window matching.
    pub max_gap_tokens: usize,
    /// Best single-window starts reused as anchors for two-window matching.
    pub multi_window_anchors: usize,
    /// Two-window matching is tried while the best single window scores
    /// below `similarity_threshold + multi_window_margin`.
    pub multi_window_margin: f64,
    pub language: Option<String>,
    /// Recognizer model size, recorded on the run for reporting.
    pub model_size: Option<String>,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            max_window_expansion: DEFAULT_MAX_WINDOW_EXPANSION,
            lookback_margin: DEFAULT_LOOKBACK_MARGIN,
            search_horizon: DEFAULT_SEARCH_HORIZON,
            max_gap_tokens: DEFAULT_MAX_GAP_TOKENS,
            multi_window_anchors: DEFAULT_MULTI_WINDOW_ANCHORS,
            multi_window_margin: DEFAULT_MULTI_WINDOW_MARGIN,
            language: None,
            model_size: None,
        }
    }
}

impl AlignmentConfig {
    pub fn validate(&self) -> Result<(), SyncError> {
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(SyncError::InvalidConfig(format!(
                "similarity_threshold must be between 0.0 and 1.0, got {}",
                self.similarity_threshold
            )));
        }
        if !self.max_window_expansion.is_finite() || self.max_window_expansion < 1.0 {
            return Err(SyncError::InvalidConfig(format!(
                "max_window_expansion must be at least 1.0, got {}",
                self.max_window_expansion
            )));
        }
        if !self.multi_window_margin.is_finite() || self.multi_window_margin < 0.0 {
            return Err(SyncError::InvalidConfig(format!(
                "multi_window_margin must be a non-negative number, got {}",
                self.multi_window_margin
            )));
        }
        Ok(())
    }

    /// Single-window score at or above which two-window matching is skipped.
    pub fn multi_window_ceiling(&self) -> f64 {
        (self.similarity_threshold + self.multi_window_margin).min(1.0)
    }

    /// Longest window considered for a line of `word_count` words.
    pub fn max_window_len(&self, word_count: usize) -> usize {
        ((word_count as f64 * self.max_window_expansion).ceil() as usize).max(1)
    }

    /// Whether the configured language is written without word spaces.
    pub fn is_unspaced_language(&self) -> bool {
        self.language.as_deref().is_some_and(|lang| {
            let primary = lang.split(['-', '_']).next().unwrap_or(lang);
            UNSPACED_LANGUAGES.contains(&primary.to_lowercase().as_str())
        })
    }

    pub fn scorer(&self) -> SimilarityScorer {
        SimilarityScorer::default().ignoring_whitespace(self.is_unspaced_language())
    }
}
