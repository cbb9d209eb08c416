/// `mm:ss.xx` as used by LRC tags. Minutes keep counting past 59.
pub fn lrc_timestamp(seconds: f64) -> String {
    let centis = (seconds.max(0.0) * 100.0).round() as u64;
    let minutes = centis / 6_000;
    let secs = (centis % 6_000) / 100;
    let hundredths = centis % 100;
    format!("{minutes:02}:{secs:02}.{hundredths:02}")
}

/// `HH:MM:SS,mmm` as used by SRT cues.
pub fn srt_timestamp(seconds: f64) -> String {
    let mut millis = (seconds.max(0.0) * 1000.0).round() as u64;
    let hours = millis / 3_600_000;
    millis %= 3_600_000;
    let minutes = millis / 60_000;
    millis %= 60_000;
    let secs = millis / 1_000;
    millis %= 1_000;
    format!("{hours:02}:{minutes:02}:{secs:02},{millis:03}")
}
