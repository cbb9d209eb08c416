use crate::alignment::domain::aligned_segment::AlignedSegment;
use crate::alignment::domain::alignment_config::AlignmentConfig;
use crate::alignment::domain::alignment_run::{AlignmentRun, RunParameters};
use crate::alignment::domain::match_strategy::{Candidate, MatchStrategy, SearchContext};
use crate::alignment::domain::multi_window_strategy::MultiWindowStrategy;
use crate::alignment::domain::placeholder_timing::fill_intervals;
use crate::alignment::domain::single_window_strategy::SingleWindowStrategy;
use crate::lyrics::domain::lyric_line::LyricLine;
use crate::lyrics::domain::text_normalizer::normalize;
use crate::matching::domain::similarity_scorer::SimilarityScorer;
use crate::shared::error::SyncError;
use crate::transcript::domain::transcript::Transcript;

/// Search position carried from one line to the next.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    /// First token not consumed by an accepted line.
    pub next: usize,
    /// First token of the last accepted line. Windows never start before it,
    /// which keeps segment starts in order.
    pub floor: usize,
}

impl Cursor {
    fn advance_past(self, candidate: &Candidate) -> Self {
        Self {
            next: self.next.max(candidate.last_index() + 1),
            floor: candidate.first_index(),
        }
    }
}

/// What one line resolved to before placeholder timing is known.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Accepted(Candidate),
    /// No proposal reached the threshold; carries the best score seen.
    Unmatched { best_score: f64 },
}

/// Aligns lyric lines to a word-level transcript.
///
/// Lines are processed in order. For each, the strategies propose scored
/// token spans starting anywhere from just before the cursor to the end of
/// the transcript; the best proposal at or above the similarity
/// threshold is accepted and moves the cursor past it. Lines with no
/// acceptable proposal become placeholders whose timing is interpolated once
/// every line has been resolved. Every input line yields exactly one segment.
pub struct AlignmentEngine {
    config: AlignmentConfig,
    scorer: SimilarityScorer,
    strategies: Vec<Box<dyn MatchStrategy>>,
}

impl AlignmentEngine {
    pub fn new(config: AlignmentConfig) -> Result<Self, SyncError> {
        Self::with_strategies(
            config,
            vec![
                Box::new(SingleWindowStrategy),
                Box::new(MultiWindowStrategy),
            ],
        )
    }

    pub fn with_strategies(
        config: AlignmentConfig,
        strategies: Vec<Box<dyn MatchStrategy>>,
    ) -> Result<Self, SyncError> {
        config.validate()?;
        let scorer = config.scorer();
        Ok(Self {
            config,
            scorer,
            strategies,
        })
    }

    pub fn config(&self) -> &AlignmentConfig {
        &self.config
    }

    pub fn align(
        &self,
        transcript: &Transcript,
        lines: &[LyricLine],
    ) -> Result<AlignmentRun, SyncError> {
        if transcript.is_empty() {
            return Err(SyncError::EmptyTranscript);
        }

        let token_texts: Vec<String> = transcript
            .words()
            .iter()
            .map(|w| normalize(&w.text))
            .collect();

        let mut cursor = Cursor::default();
        let mut resolutions = Vec::with_capacity(lines.len());
        for line in lines {
            let (resolution, next) = self.resolve_line(line, &token_texts, cursor);
            cursor = next;
            resolutions.push(resolution);
        }

        let segments = self.build_segments(transcript, lines, resolutions);
        let run = AlignmentRun::new(
            RunParameters {
                similarity_threshold: self.config.similarity_threshold,
                model_size: self.config.model_size.clone(),
                language: self.config.language.clone(),
            },
            segments,
        );

        for (a, b) in run.overlaps() {
            let segs = run.segments();
            log::warn!(
                "Lines {} and {} overlap: {:.2}s ends after {:.2}s",
                segs[a].line().index,
                segs[b].line().index,
                segs[a].end(),
                segs[b].start()
            );
        }

        Ok(run)
    }

    /// Resolves one line against the transcript and returns the cursor for
    /// the next line.
    pub fn resolve_line(
        &self,
        line: &LyricLine,
        token_texts: &[String],
        cursor: Cursor,
    ) -> (Resolution, Cursor) {
        let n = token_texts.len();
        if cursor.next >= n {
            log::debug!("Transcript exhausted before line {}", line.index);
            return (Resolution::Unmatched { best_score: 0.0 }, cursor);
        }

        let lo = cursor
            .next
            .saturating_sub(self.config.lookback_margin)
            .max(cursor.floor);
        let hi = match self.config.search_horizon {
            0 => n,
            horizon => n.min(cursor.next.saturating_add(horizon)),
        };

        let ctx = SearchContext {
            line,
            token_texts,
            start_range: lo..hi,
            max_len: self.config.max_window_len(line.word_count()),
            scorer: &self.scorer,
            config: &self.config,
        };

        let mut proposals: Vec<Candidate> = Vec::new();
        for strategy in &self.strategies {
            let proposed = strategy.propose(&ctx, &proposals);
            if let Some(top) = proposed.first() {
                log::trace!(
                    "Line {} {}: best {:.3} over tokens {}..={}",
                    line.index,
                    strategy.name(),
                    top.score,
                    top.first_index(),
                    top.last_index()
                );
            }
            proposals.extend(proposed);
        }

        let best = proposals
            .into_iter()
            .reduce(|best, c| if c.is_better_than(&best) { c } else { best });

        match best {
            Some(candidate) if candidate.score >= self.config.similarity_threshold => {
                let next = cursor.advance_past(&candidate);
                (Resolution::Accepted(candidate), next)
            }
            Some(candidate) => (
                Resolution::Unmatched {
                    best_score: candidate.score,
                },
                cursor,
            ),
            None => (Resolution::Unmatched { best_score: 0.0 }, cursor),
        }
    }

    fn build_segments(
        &self,
        transcript: &Transcript,
        lines: &[LyricLine],
        resolutions: Vec<Resolution>,
    ) -> Vec<AlignedSegment> {
        let words = transcript.words();
        let matched: Vec<Option<AlignedSegment>> = lines
            .iter()
            .zip(&resolutions)
            .map(|(line, resolution)| match resolution {
                Resolution::Accepted(candidate) => {
                    let tokens = candidate.token_indices().map(|i| words[i].clone()).collect();
                    let seg = AlignedSegment::matched(
                        line.clone(),
                        candidate.kind,
                        candidate.score,
                        tokens,
                    );
                    log::debug!(
                        "Matched line {} [{:.2}-{:.2}] via {} (confidence {:.2})",
                        line.index,
                        seg.start(),
                        seg.end(),
                        seg.kind().label(),
                        seg.confidence()
                    );
                    Some(seg)
                }
                Resolution::Unmatched { .. } => None,
            })
            .collect();

        let intervals: Vec<Option<(f64, f64)>> = matched
            .iter()
            .map(|seg| seg.as_ref().map(|s| (s.start(), s.end())))
            .collect();
        let filled = fill_intervals(&intervals, transcript.end_time());

        matched
            .into_iter()
            .zip(lines.iter().zip(resolutions))
            .zip(filled)
            .map(|((seg, (line, resolution)), (start, end))| {
                seg.unwrap_or_else(|| {
                    let best_score = match resolution {
                        Resolution::Unmatched { best_score } => best_score,
                        Resolution::Accepted(candidate) => candidate.score,
                    };
                    log::warn!(
                        "No match for line {} {:?} (best score {:.2}); placing at {:.2}-{:.2}",
                        line.index,
                        line.raw_text,
                        best_score,
                        start,
                        end
                    );
                    AlignedSegment::placeholder(line.clone(), start, end, best_score)
                })
            })
            .collect()
    }
}
