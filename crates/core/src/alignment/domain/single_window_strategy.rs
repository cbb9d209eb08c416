use crate::alignment::domain::aligned_segment::MatchKind;
use crate::alignment::domain::match_strategy::{
    score_floor, Candidate, MatchStrategy, SearchContext,
};

/// Searches every contiguous window in the search range.
///
/// Returns the best window of each start position, best first, truncated to
/// `multi_window_anchors` entries (at least one) so later strategies can use
/// them as anchors. Windows grow one token at a time from each start, and a
/// window is only fully scored when its bound can still beat both the best
/// window of its start and the weakest start being kept.
#[derive(Debug, Default)]
pub struct SingleWindowStrategy;

impl MatchStrategy for SingleWindowStrategy {
    fn name(&self) -> &'static str {
        "single-window"
    }

    fn propose(&self, ctx: &SearchContext<'_>, _earlier: &[Candidate]) -> Vec<Candidate> {
        let keep = ctx.config.multi_window_anchors.max(1);
        let window_scorer = ctx.window_scorer();
        let mut kept: Vec<Candidate> = Vec::with_capacity(keep + 1);

        for start in ctx.start_range.clone() {
            let weakest_kept = if kept.len() == keep {
                kept.last().map(|c| c.score)
            } else {
                None
            };
            let mut window = window_scorer.window();
            let mut best: Option<Candidate> = None;

            for len in 1..=ctx.max_len_from(start) {
                window_scorer.push(&mut window, &ctx.token_texts[start + len - 1]);
                let floor =
                    score_floor(best.as_ref().map(|b| b.score).into_iter().chain(weakest_kept));
                let Some(score) = window_scorer.score_at_least(&window, floor) else {
                    continue;
                };
                let candidate = Candidate {
                    spans: vec![start..start + len],
                    score,
                    kind: MatchKind::SingleWindow,
                };
                if best.as_ref().map_or(true, |b| candidate.is_better_than(b)) {
                    best = Some(candidate);
                }
            }

            if let Some(best) = best {
                kept.push(best);
                kept.sort_by(Candidate::rank_cmp);
                kept.truncate(keep);
            }
        }

        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alignment::domain::alignment_config::AlignmentConfig;
    use crate::lyrics::domain::lyric_line::LyricLine;
    use crate::matching::domain::similarity_scorer::SimilarityScorer;

    fn texts(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn propose(line: &str, words: &[&str], start_range: std::ops::Range<usize>) -> Vec<Candidate> {
        let line = LyricLine::new(0, line).unwrap();
        let token_texts = texts(words);
        let config = AlignmentConfig::default();
        let scorer = SimilarityScorer::default();
        let ctx = SearchContext {
            line: &line,
            token_texts: &token_texts,
            start_range,
            max_len: config.max_window_len(line.word_count()),
            scorer: &scorer,
            config: &config,
        };
        SingleWindowStrategy.propose(&ctx, &[])
    }

    #[test]
    fn test_exact_window_wins() {
        let proposals = propose("hello world", &["oh", "hello", "world", "yeah"], 0..4);
        assert_eq!(proposals[0].spans, vec![1..3]);
        assert_eq!(proposals[0].score, 1.0);
    }

    #[test]
    fn test_one_proposal_per_start_best_first() {
        let proposals = propose("hello world", &["oh", "hello", "world", "yeah"], 0..4);
        assert_eq!(proposals.len(), 4);
        let mut starts: Vec<usize> = proposals.iter().map(|c| c.first_index()).collect();
        starts.dedup();
        assert_eq!(starts.len(), 4);
        assert!(proposals.windows(2).all(|p| p[0].score >= p[1].score));
    }

    #[test]
    fn test_repeated_phrase_prefers_earlier_start() {
        let proposals = propose("la la", &["la", "la", "la", "la"], 0..4);
        assert_eq!(proposals[0].spans, vec![0..2]);
    }

    #[test]
    fn test_window_capped_at_transcript_end() {
        let proposals = propose("one two three four five", &["one", "two"], 0..2);
        assert!(proposals.iter().all(|c| c.spans[0].end <= 2));
        assert_eq!(proposals[0].spans, vec![0..2]);
    }

    #[test]
    fn test_far_start_found_past_unrelated_tokens() {
        let mut words = vec!["na"; 90];
        words.extend(["hello", "world"]);
        let proposals = propose("hello world", &words, 0..words.len());
        assert_eq!(proposals[0].spans, vec![90..92]);
        assert_eq!(proposals[0].score, 1.0);
    }

    #[test]
    fn test_anchors_match_exhaustive_ranking() {
        let words = ["oh", "hello", "there", "world", "hello", "word", "yeah"];
        let line = LyricLine::new(0, "hello world").unwrap();
        let scorer = SimilarityScorer::default();
        let mut exhaustive: Vec<Candidate> = (0..words.len())
            .filter_map(|start| {
                (1..=3.min(words.len() - start))
                    .map(|len| Candidate {
                        spans: vec![start..start + len],
                        score: scorer
                            .score(&line.normalized_text, &words[start..start + len].join(" ")),
                        kind: MatchKind::SingleWindow,
                    })
                    .reduce(|best, c| if c.is_better_than(&best) { c } else { best })
            })
            .collect();
        exhaustive.sort_by(Candidate::rank_cmp);
        exhaustive.truncate(AlignmentConfig::default().multi_window_anchors);

        let proposals = propose("hello world", &words, 0..words.len());
        assert_eq!(proposals, exhaustive);
    }

    #[test]
    fn test_empty_range_proposes_nothing() {
        assert!(propose("hello", &["hello"], 1..1).is_empty());
    }
}
