use crate::alignment::domain::aligned_segment::MatchKind;
use crate::alignment::domain::match_strategy::{
    score_floor, Candidate, MatchStrategy, SearchContext,
};

/// Matches a line transcribed as two phrases with filler words between them.
///
/// Starting from the first token of each earlier proposal, tries a first
/// window, a gap of `1..=max_gap_tokens` skipped tokens, and a second window,
/// with both windows together no longer than the line's window budget. Skipped
/// tokens are not part of the candidate.
///
/// Runs only while the best earlier proposal is under
/// [`AlignmentConfig::multi_window_ceiling`], and only proposes a candidate
/// that can compete with it.
///
/// [`AlignmentConfig::multi_window_ceiling`]: crate::alignment::domain::alignment_config::AlignmentConfig::multi_window_ceiling
#[derive(Debug, Default)]
pub struct MultiWindowStrategy;

impl MatchStrategy for MultiWindowStrategy {
    fn name(&self) -> &'static str {
        "multi-window"
    }

    fn propose(&self, ctx: &SearchContext<'_>, earlier: &[Candidate]) -> Vec<Candidate> {
        let max_gap = ctx.config.max_gap_tokens;
        if max_gap == 0 || ctx.max_len < 2 {
            return Vec::new();
        }
        let best_earlier = earlier.iter().map(|c| c.score).reduce(f64::max);
        if best_earlier.is_some_and(|score| score >= ctx.config.multi_window_ceiling()) {
            return Vec::new();
        }

        let mut anchors: Vec<usize> = Vec::new();
        for candidate in earlier {
            let start = candidate.first_index();
            if !anchors.contains(&start) {
                anchors.push(start);
            }
        }

        let n = ctx.token_count();
        let window_scorer = ctx.window_scorer();
        let mut best: Option<Candidate> = None;

        for &anchor in &anchors {
            let mut first = window_scorer.window();
            for first_len in 1..ctx.max_len {
                let first_end = anchor + first_len;
                if first_end > n {
                    break;
                }
                window_scorer.push(&mut first, &ctx.token_texts[first_end - 1]);

                for gap in 1..=max_gap {
                    let second_start = first_end + gap;
                    if second_start >= n {
                        break;
                    }
                    let mut joined = first.clone();
                    for second_len in 1..=(ctx.max_len - first_len) {
                        let second_end = second_start + second_len;
                        if second_end > n {
                            break;
                        }
                        window_scorer.push(&mut joined, &ctx.token_texts[second_end - 1]);
                        let floor = score_floor(
                            best.as_ref().map(|b| b.score).into_iter().chain(best_earlier),
                        );
                        let Some(score) = window_scorer.score_at_least(&joined, floor) else {
                            continue;
                        };
                        let candidate = Candidate {
                            spans: vec![anchor..first_end, second_start..second_end],
                            score,
                            kind: MatchKind::MultiWindow,
                        };
                        if best.as_ref().map_or(true, |b| candidate.is_better_than(b)) {
                            best = Some(candidate);
                        }
                    }
                }
            }
        }

        best.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alignment::domain::alignment_config::AlignmentConfig;
    use crate::lyrics::domain::lyric_line::LyricLine;
    use crate::matching::domain::similarity_scorer::SimilarityScorer;

    fn anchor(start: usize, score: f64) -> Candidate {
        Candidate {
            spans: vec![start..start + 1],
            score,
            kind: MatchKind::SingleWindow,
        }
    }

    fn propose_with(
        line: &str,
        words: &[&str],
        earlier: &[Candidate],
        config: AlignmentConfig,
    ) -> Vec<Candidate> {
        let line = LyricLine::new(0, line).unwrap();
        let token_texts: Vec<String> = words.iter().map(|w| w.to_string()).collect();
        let scorer = SimilarityScorer::default();
        let ctx = SearchContext {
            line: &line,
            token_texts: &token_texts,
            start_range: 0..token_texts.len(),
            max_len: config.max_window_len(line.word_count()),
            scorer: &scorer,
            config: &config,
        };
        MultiWindowStrategy.propose(&ctx, earlier)
    }

    #[test]
    fn test_skips_filler_between_phrases() {
        let proposals = propose_with(
            "hello world",
            &["hello", "uh", "world"],
            &[anchor(0, 0.85)],
            AlignmentConfig::default(),
        );
        assert_eq!(proposals.len(), 1);
        assert_eq!(proposals[0].spans, vec![0..1, 2..3]);
        assert_eq!(proposals[0].score, 1.0);
        assert_eq!(proposals[0].kind, MatchKind::MultiWindow);
    }

    #[test]
    fn test_bridges_gap_up_to_limit() {
        let words = ["hello", "um", "uh", "er", "world"];
        let found = propose_with(
            "hello world",
            &words,
            &[anchor(0, 0.7)],
            AlignmentConfig::default(),
        );
        assert_eq!(found[0].spans, vec![0..1, 4..5]);

        let limited = propose_with(
            "hello world",
            &words,
            &[anchor(0, 0.7)],
            AlignmentConfig {
                max_gap_tokens: 2,
                ..Default::default()
            },
        );
        assert!(limited.iter().all(|c| c.score < 1.0));
    }

    #[test]
    fn test_nothing_when_earlier_is_perfect() {
        let proposals = propose_with(
            "hello world",
            &["hello", "uh", "world"],
            &[anchor(0, 1.0)],
            AlignmentConfig::default(),
        );
        assert!(proposals.is_empty());
    }

    #[test]
    fn test_nothing_when_earlier_clears_threshold_by_margin() {
        let proposals = propose_with(
            "hello world",
            &["hello", "uh", "world"],
            &[anchor(0, 0.95)],
            AlignmentConfig::default(),
        );
        assert!(proposals.is_empty());
    }

    #[test]
    fn test_weaker_two_window_match_not_proposed() {
        let proposals = propose_with(
            "hello world",
            &["hallo", "uh", "wereld"],
            &[anchor(0, 0.89)],
            AlignmentConfig::default(),
        );
        assert!(proposals.iter().all(|c| c.score >= 0.89 - 1e-5));
    }

    #[test]
    fn test_disabled_by_zero_gap() {
        let proposals = propose_with(
            "hello world",
            &["hello", "uh", "world"],
            &[anchor(0, 0.5)],
            AlignmentConfig {
                max_gap_tokens: 0,
                ..Default::default()
            },
        );
        assert!(proposals.is_empty());
    }

    #[test]
    fn test_no_anchors_no_proposals() {
        let proposals = propose_with(
            "hello world",
            &["hello", "uh", "world"],
            &[],
            AlignmentConfig::default(),
        );
        assert!(proposals.is_empty());
    }
}
