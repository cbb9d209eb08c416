use crate::matching::domain::similarity_scorer::SimilarityScorer;

/// Scores one fixed text against windows that grow a token at a time.
///
/// A window keeps a single row of the longest-common-subsequence table
/// against the fixed text, so appending a token costs its length times the
/// length of the fixed text. With per-character counts this bounds the
/// combined score from above, and the full score is only computed for
/// windows whose bound reaches the caller's floor.
pub struct WindowScorer<'a> {
    scorer: &'a SimilarityScorer,
    target: &'a str,
    target_chars: Vec<char>,
    /// Distinct non-whitespace characters of the target, sorted.
    alphabet: Vec<char>,
    /// Occurrences of each `alphabet` character in the target.
    counts: Vec<usize>,
    letters: usize,
    words: usize,
}

/// A window's text and its running comparison state.
#[derive(Debug, Clone)]
pub struct GrowingWindow {
    text: String,
    row: Vec<usize>,
    compared: usize,
    counts: Vec<usize>,
    shared_letters: usize,
    letters: usize,
    words: usize,
}

impl GrowingWindow {
    /// Space-joined text of the tokens pushed so far.
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl<'a> WindowScorer<'a> {
    pub fn new(scorer: &'a SimilarityScorer, target: &'a str) -> Self {
        let target_chars: Vec<char> = target
            .chars()
            .filter(|c| compared_by(scorer, *c))
            .collect();

        let mut letters: Vec<char> = target.chars().filter(|c| !c.is_whitespace()).collect();
        let letter_count = letters.len();
        letters.sort_unstable();
        let mut alphabet: Vec<char> = Vec::new();
        let mut counts: Vec<usize> = Vec::new();
        for c in letters {
            if alphabet.last() == Some(&c) {
                if let Some(n) = counts.last_mut() {
                    *n += 1;
                }
            } else {
                alphabet.push(c);
                counts.push(1);
            }
        }

        Self {
            scorer,
            target,
            target_chars,
            alphabet,
            counts,
            letters: letter_count,
            words: target.split_whitespace().count(),
        }
    }

    /// A window holding no tokens.
    pub fn window(&self) -> GrowingWindow {
        GrowingWindow {
            text: String::new(),
            row: vec![0; self.target_chars.len() + 1],
            compared: 0,
            counts: vec![0; self.alphabet.len()],
            shared_letters: 0,
            letters: 0,
            words: 0,
        }
    }

    /// Appends `token` to the window, separated by a space. Empty tokens are
    /// skipped.
    pub fn push(&self, window: &mut GrowingWindow, token: &str) {
        if token.is_empty() {
            return;
        }
        if !window.text.is_empty() {
            window.text.push(' ');
            self.push_char(window, ' ');
        }
        window.text.push_str(token);
        for c in token.chars() {
            self.push_char(window, c);
        }
        window.words += token.split_whitespace().count();
    }

    fn push_char(&self, window: &mut GrowingWindow, c: char) {
        if !c.is_whitespace() {
            window.letters += 1;
            if let Ok(i) = self.alphabet.binary_search(&c) {
                if window.counts[i] < self.counts[i] {
                    window.shared_letters += 1;
                }
                window.counts[i] += 1;
            }
        }
        if !compared_by(self.scorer, c) {
            return;
        }

        let row = &mut window.row;
        let mut diagonal = 0;
        for (j, &t) in self.target_chars.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if t == c {
                diagonal + 1
            } else {
                above.max(row[j])
            };
            diagonal = above;
        }
        window.compared += 1;
    }

    /// Exact indel ratio between the target and the window.
    pub fn ratio(&self, window: &GrowingWindow) -> f64 {
        let total = self.target_chars.len() + window.compared;
        if total == 0 {
            return 1.0;
        }
        let common = window.row[self.target_chars.len()];
        1.0 - (total - 2 * common) as f64 / total as f64
    }

    /// Upper bound on the token-sort ratio from character counts. Sorting
    /// tokens keeps every character, so the common subsequence of the sorted
    /// forms cannot exceed the shared characters plus the shared separators.
    fn token_sort_bound(&self, window: &GrowingWindow) -> f64 {
        let (gaps_target, gaps_window) = if self.scorer.ignores_whitespace() {
            (0, 0)
        } else {
            (self.words.saturating_sub(1), window.words.saturating_sub(1))
        };
        let total = self.letters + gaps_target + window.letters + gaps_window;
        if total == 0 {
            return 1.0;
        }
        let common = window.shared_letters + gaps_target.min(gaps_window);
        (2.0 * common as f64 / total as f64).min(1.0)
    }

    pub fn upper_bound(&self, window: &GrowingWindow) -> f64 {
        self.scorer
            .upper_bound(self.ratio(window), self.token_sort_bound(window))
    }

    /// Combined score of the target against the window, or `None` when it
    /// falls below `floor`.
    pub fn score_at_least(&self, window: &GrowingWindow, floor: f64) -> Option<f64> {
        if self.upper_bound(window) < floor {
            return None;
        }
        self.scorer.score_at_least(self.target, &window.text, floor)
    }
}

fn compared_by(scorer: &SimilarityScorer, c: char) -> bool {
    !(scorer.ignores_whitespace() && c.is_whitespace())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::domain::edit_distance::indel_ratio;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn grow(scorer: &WindowScorer<'_>, tokens: &[&str]) -> GrowingWindow {
        let mut window = scorer.window();
        for token in tokens {
            scorer.push(&mut window, token);
        }
        window
    }

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_text_skips_empty_tokens() {
        let scorer = SimilarityScorer::default();
        let ws = WindowScorer::new(&scorer, "hello world");
        let window = grow(&ws, &["hello", "", "big", "world"]);
        assert_eq!(window.text(), "hello big world");
    }

    #[rstest]
    #[case("hello world", &["hello", "uh", "world"])]
    #[case("we will rock you", &["na", "na"])]
    #[case("amazing grace", &["grace", "amazing"])]
    #[case("a", &["b"])]
    fn test_incremental_ratio_matches_full_ratio(#[case] target: &str, #[case] tokens: &[&str]) {
        let scorer = SimilarityScorer::default();
        let ws = WindowScorer::new(&scorer, target);
        let window = grow(&ws, tokens);
        assert_relative_eq!(
            ws.ratio(&window),
            indel_ratio(&chars(target), &chars(window.text())),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_incremental_ratio_ignores_whitespace_for_unspaced_scripts() {
        let scorer = SimilarityScorer::default().ignoring_whitespace(true);
        let ws = WindowScorer::new(&scorer, "사랑해요");
        let window = grow(&ws, &["사랑", "해요"]);
        assert_relative_eq!(ws.ratio(&window), 1.0);
        assert_eq!(ws.score_at_least(&window, 0.9), Some(1.0));
    }

    #[rstest]
    #[case("hello world", &["hello", "uh", "world"])]
    #[case("hello world", &["world", "hello"])]
    #[case("we will rock you", &["we", "will", "we", "will"])]
    #[case("the quick brown fox", &["brown", "dog"])]
    fn test_bound_never_below_score(#[case] target: &str, #[case] tokens: &[&str]) {
        let scorer = SimilarityScorer::default();
        let ws = WindowScorer::new(&scorer, target);
        let window = grow(&ws, tokens);
        assert!(ws.upper_bound(&window) >= scorer.score(target, window.text()));
    }

    #[test]
    fn test_score_matches_scorer() {
        let scorer = SimilarityScorer::default();
        let ws = WindowScorer::new(&scorer, "hello world");
        let window = grow(&ws, &["hello", "uh", "world"]);
        let full = scorer.score("hello world", "hello uh world");
        assert_eq!(ws.score_at_least(&window, f64::NEG_INFINITY), Some(full));
    }

    #[test]
    fn test_unrelated_window_pruned_below_floor() {
        let scorer = SimilarityScorer::default();
        let ws = WindowScorer::new(&scorer, "we will rock you");
        let window = grow(&ws, &["zzz", "qqq"]);
        assert!(ws.upper_bound(&window) < 0.5);
        assert_eq!(ws.score_at_least(&window, 0.5), None);
    }

    #[test]
    fn test_cloned_window_grows_independently() {
        let scorer = SimilarityScorer::default();
        let ws = WindowScorer::new(&scorer, "hello world");
        let first = grow(&ws, &["hello"]);
        let mut joined = first.clone();
        ws.push(&mut joined, "world");
        assert_eq!(first.text(), "hello");
        assert_eq!(ws.score_at_least(&joined, 0.99), Some(1.0));
    }
}
