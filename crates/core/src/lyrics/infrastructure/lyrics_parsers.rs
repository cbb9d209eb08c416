use once_cell::sync::Lazy;
use regex::Regex;

use crate::lyrics::domain::lyrics_source::{LyricsFormat, LyricsSource, TimedLine};

static LRC_TIME_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[(\d+):(\d+(?:[.:]\d+)?)\]").expect("valid LRC time tag regex"));
static LRC_WORD_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<\d+:\d+(?:[.:]\d+)?>").expect("valid LRC word tag regex"));
static LRC_ID_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[[A-Za-z#]+:[^\]]*\]$").expect("valid LRC id tag regex"));
static SRT_TIMING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+):(\d{2}):(\d{2})[,.](\d{1,3})\s*-->").expect("valid SRT timing regex")
});
static MARKUP_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"</?[A-Za-z][^>]*>").expect("valid markup tag regex"));

/// Parses decoded lyrics text according to its declared format.
pub fn parse(format: LyricsFormat, content: &str) -> LyricsSource {
    match format {
        LyricsFormat::Plain => parse_plain(content),
        LyricsFormat::Lrc => parse_lrc(content),
        LyricsFormat::Srt => parse_srt(content),
    }
}

/// Every text line is one entry, blanks included, so indices match the file.
pub fn parse_plain(content: &str) -> LyricsSource {
    LyricsSource::PlainLines(content.lines().map(|l| l.trim().to_string()).collect())
}

/// One entry per file line. Time tags are removed (the first one is kept as
/// the entry's start), ID-tag lines such as `[ar:Artist]` become empty
/// entries, and enhanced-LRC `<mm:ss.xx>` word tags are stripped.
pub fn parse_lrc(content: &str) -> LyricsSource {
    let lines = content
        .lines()
        .map(|raw| {
            let line = raw.trim();
            if LRC_ID_TAG.is_match(line) {
                return TimedLine {
                    start: None,
                    text: String::new(),
                };
            }
            let start = LRC_TIME_TAG
                .captures(line)
                .and_then(|caps| parse_minutes_seconds(&caps[1], &caps[2]));
            let without_times = LRC_TIME_TAG.replace_all(line, "");
            let text = LRC_WORD_TAG.replace_all(&without_times, "");
            TimedLine {
                start,
                text: collapse_spaces(&text),
            }
        })
        .collect();
    LyricsSource::PreTimedLines(lines)
}

/// One entry per cue text line. Cue numbers, timing lines and blank
/// separators are structural and produce no entry.
pub fn parse_srt(content: &str) -> LyricsSource {
    let raw: Vec<&str> = content.lines().map(str::trim).collect();
    let mut lines = Vec::new();
    let mut cue_start = None;

    for (i, line) in raw.iter().enumerate() {
        if line.is_empty() {
            continue;
        }
        if line.contains("-->") {
            cue_start = SRT_TIMING.captures(line).and_then(|caps| {
                let h: f64 = caps[1].parse().ok()?;
                let m: f64 = caps[2].parse().ok()?;
                let s: f64 = caps[3].parse().ok()?;
                let ms: f64 = format!("{:0<3}", &caps[4]).parse().ok()?;
                Some(h * 3600.0 + m * 60.0 + s + ms / 1000.0)
            });
            continue;
        }
        let is_cue_number = line.chars().all(|c| c.is_ascii_digit())
            && raw.get(i + 1).is_some_and(|next| next.contains("-->"));
        if is_cue_number {
            continue;
        }
        lines.push(TimedLine {
            start: cue_start,
            text: MARKUP_TAG.replace_all(line, "").trim().to_string(),
        });
    }

    LyricsSource::PreTimedLines(lines)
}

fn parse_minutes_seconds(minutes: &str, seconds: &str) -> Option<f64> {
    let minutes: f64 = minutes.parse().ok()?;
    let seconds: f64 = seconds.replace(':', ".").parse().ok()?;
    Some(minutes * 60.0 + seconds)
}

fn collapse_spaces(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
