/// Default length of an extrapolated placeholder past the end of the audio.
pub const PLACEHOLDER_DURATION: f64 = 3.0;
/// Silence left before each extrapolated placeholder.
pub const PLACEHOLDER_GAP: f64 = 0.5;
/// Shortest interval handed to a trailing placeholder before switching to
/// extrapolation past the last word.
pub const MIN_PLACEHOLDER_DURATION: f64 = 0.5;

/// Fills intervals for unmatched lines from their matched neighbours.
///
/// `resolved[i]` is `Some((start, end))` for a matched line and `None` for a
/// placeholder. A run of placeholders shares the gap between the previous
/// match's end and the next match's start evenly. Leading runs start at 0;
/// trailing runs end at `audio_end`, or are laid out past it when too little
/// audio remains. Returned starts never go below the previous matched start
/// and never exceed the next matched start.
pub fn fill_intervals(resolved: &[Option<(f64, f64)>], audio_end: f64) -> Vec<(f64, f64)> {
    let mut out: Vec<(f64, f64)> = Vec::with_capacity(resolved.len());
    let mut i = 0;

    while i < resolved.len() {
        if let Some(interval) = resolved[i] {
            out.push(interval);
            i += 1;
            continue;
        }

        let run_start = i;
        while i < resolved.len() && resolved[i].is_none() {
            i += 1;
        }
        let count = i - run_start;
        let prev = run_start.checked_sub(1).and_then(|p| resolved[p]);
        let next = resolved.get(i).copied().flatten();

        match next {
            Some((next_start, _)) => {
                let lo = prev.map_or(0.0, |(_, prev_end)| prev_end).min(next_start);
                out.extend(divide(lo, next_start, count));
            }
            None => {
                let lo = prev.map_or(0.0, |(_, prev_end)| prev_end);
                if audio_end - lo >= count as f64 * MIN_PLACEHOLDER_DURATION {
                    out.extend(divide(lo, audio_end, count));
                } else {
                    out.extend(extrapolate(lo.max(audio_end), count));
                }
            }
        }
    }

    out
}

fn divide(lo: f64, hi: f64, count: usize) -> impl Iterator<Item = (f64, f64)> {
    let hi = hi.max(lo);
    let width = (hi - lo) / count as f64;
    (0..count).map(move |k| {
        let start = lo + k as f64 * width;
        let end = if k + 1 == count {
            hi
        } else {
            lo + (k + 1) as f64 * width
        };
        (start, end)
    })
}

fn extrapolate(anchor: f64, count: usize) -> impl Iterator<Item = (f64, f64)> {
    (0..count).map(move |k| {
        let start = anchor + PLACEHOLDER_GAP + k as f64 * (PLACEHOLDER_DURATION + PLACEHOLDER_GAP);
        (start, start + PLACEHOLDER_DURATION)
    })
}
