use crate::lyrics::domain::lyric_line::LyricLine;

/// Lyrics file formats the loader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LyricsFormat {
    /// One lyric line per text line.
    Plain,
    /// `[mm:ss.xx]` timed lyric lines.
    Lrc,
    /// SubRip subtitle cues.
    Srt,
}

/// A lyric line as it appeared in a pre-timed source.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedLine {
    /// Source timestamp in seconds. Alignment never reads it; it is kept only
    /// for traceability back to the parsed file.
    pub start: Option<f64>,
    pub text: String,
}

/// Lyrics as read from their source, before normalization.
///
/// Resolved into [`LyricLine`]s once by [`LyricsSource::into_lines`]; nothing
/// downstream looks at the source format again.
#[derive(Debug, Clone, PartialEq)]
pub enum LyricsSource {
    PlainLines(Vec<String>),
    PreTimedLines(Vec<TimedLine>),
}

impl LyricsSource {
    /// Normalizes every entry and drops those left empty.
    ///
    /// Each surviving line keeps its entry position as `index`. Timestamps of
    /// pre-timed sources are discarded.
    pub fn into_lines(self) -> Vec<LyricLine> {
        let lines: Vec<LyricLine> = match self {
            LyricsSource::PlainLines(lines) => lines
                .iter()
                .enumerate()
                .filter_map(|(index, text)| LyricLine::new(index, text))
                .collect(),
            LyricsSource::PreTimedLines(lines) => lines
                .iter()
                .enumerate()
                .filter_map(|(index, timed)| LyricLine::new(index, &timed.text))
                .collect(),
        };
        log::debug!("Resolved {} lyric lines", lines.len());
        lines
    }

    pub fn len(&self) -> usize {
        match self {
            LyricsSource::PlainLines(lines) => lines.len(),
            LyricsSource::PreTimedLines(lines) => lines.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
