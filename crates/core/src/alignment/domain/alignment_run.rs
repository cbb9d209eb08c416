use serde::Serialize;

use crate::alignment::domain::aligned_segment::{overlapping_pairs, AlignedSegment};
use crate::alignment::domain::segment_summarizer::{AlignmentSummary, SegmentSummarizer};

/// Parameters an alignment run was produced with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunParameters {
    pub similarity_threshold: f64,
    pub model_size: Option<String>,
    pub language: Option<String>,
}

/// Result of aligning one transcript against one set of lyric lines.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignmentRun {
    parameters: RunParameters,
    segments: Vec<AlignedSegment>,
}

impl AlignmentRun {
    pub(crate) fn new(parameters: RunParameters, segments: Vec<AlignedSegment>) -> Self {
        Self {
            parameters,
            segments,
        }
    }

    pub fn parameters(&self) -> &RunParameters {
        &self.parameters
    }

    /// Segments in lyric-line order, one per line.
    pub fn segments(&self) -> &[AlignedSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn summary(&self) -> AlignmentSummary {
        SegmentSummarizer::summarize(&self.segments)
    }

    /// Consecutive segment pairs whose intervals overlap.
    pub fn overlaps(&self) -> Vec<(usize, usize)> {
        overlapping_pairs(&self.segments)
    }

    /// Index of the first segment whose interval contains `time`.
    pub fn segment_at(&self, time: f64) -> Option<usize> {
        self.segments.iter().position(|s| s.contains_time(time))
    }
}
