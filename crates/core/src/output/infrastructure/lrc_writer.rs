use crate::output::domain::lyrics_document::LyricsDocument;
use crate::output::domain::lyrics_writer::LyricsWriter;
use crate::output::infrastructure::timestamp::lrc_timestamp;
use crate::shared::constants::GENERATOR_NAME;
use crate::shared::error::SyncError;

pub const DEFAULT_ARTIST: &str = "Generated by lyricsync";
pub const DEFAULT_TITLE: &str = "Synchronized Lyrics";

/// `[ar:]` and `[ti:]` header values of an LRC file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LrcTags {
    pub artist: String,
    pub title: String,
}

impl LrcTags {
    /// Tags with the generic defaults filled in for missing values.
    pub fn new(artist: Option<String>, title: Option<String>) -> Self {
        Self {
            artist: artist.unwrap_or_else(|| DEFAULT_ARTIST.to_string()),
            title: title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        }
    }
}

impl Default for LrcTags {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Line-level LRC: `[ar:]`, `[ti:]`, `[by:]` headers, then one
/// `[mm:ss.xx]text` row per line.
#[derive(Default)]
pub struct LrcWriter {
    tags: LrcTags,
}

impl LrcWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tags(tags: LrcTags) -> Self {
        Self { tags }
    }

    fn header(&self) -> String {
        format!(
            "[ar:{}]\n[ti:{}]\n[by:{GENERATOR_NAME}]\n\n",
            self.tags.artist, self.tags.title
        )
    }
}

impl LyricsWriter for LrcWriter {
    fn extension(&self) -> &'static str {
        "lrc"
    }

    fn render(&self, document: &LyricsDocument) -> Result<String, SyncError> {
        let mut out = self.header();
        for line in &document.lines {
            out.push_str(&format!("[{}]{}\n", lrc_timestamp(line.start), line.text));
        }
        Ok(out)
    }
}

/// Word-level ("enhanced") LRC: `[mm:ss.xx]<mm:ss.xx>word <mm:ss.xx>word`.
/// Lines without word timings fall back to their plain text.
#[derive(Default)]
pub struct EnhancedLrcWriter {
    inner: LrcWriter,
}

impl EnhancedLrcWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tags(tags: LrcTags) -> Self {
        Self {
            inner: LrcWriter::with_tags(tags),
        }
    }
}

impl LyricsWriter for EnhancedLrcWriter {
    fn extension(&self) -> &'static str {
        "elrc"
    }

    fn render(&self, document: &LyricsDocument) -> Result<String, SyncError> {
        let mut out = self.inner.header();
        for line in &document.lines {
            out.push_str(&format!("[{}]", lrc_timestamp(line.start)));
            if line.words.is_empty() {
                out.push_str(&line.text);
            } else {
                let words: Vec<String> = line
                    .words
                    .iter()
                    .map(|w| format!("<{}>{}", lrc_timestamp(w.start), w.text))
                    .collect();
                out.push_str(&words.join(" "));
            }
            out.push('\n');
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::domain::lyrics_document::{LineRecord, WordRecord};

    fn document() -> LyricsDocument {
        LyricsDocument {
            lines: vec![
                LineRecord {
                    index: 0,
                    text: "Hello world".to_string(),
                    start: 1.5,
                    end: 2.5,
                    confidence: Some(1.0),
                    placeholder: false,
                    words: vec![
                        WordRecord {
                            text: "Hello".to_string(),
                            start: 1.5,
                            end: 2.0,
                            confidence: None,
                        },
                        WordRecord {
                            text: "world".to_string(),
                            start: 2.0,
                            end: 2.5,
                            confidence: None,
                        },
                    ],
                },
                LineRecord {
                    index: 1,
                    text: "Lost line".to_string(),
                    start: 62.25,
                    end: 65.0,
                    confidence: Some(0.1),
                    placeholder: true,
                    words: Vec::new(),
                },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_lrc_header_and_lines() {
        let out = LrcWriter::new().render(&document()).unwrap();
        let expected = "[ar:Generated by lyricsync]\n[ti:Synchronized Lyrics]\n[by:lyricsync]\n\n\
                        [00:01.50]Hello world\n[01:02.25]Lost line\n";
        assert_eq!(out, expected);
    }

    #[test]
    fn test_lrc_custom_tags() {
        let tags = LrcTags::new(Some("Band".to_string()), Some("Song".to_string()));
        let out = LrcWriter::with_tags(tags).render(&LyricsDocument::default()).unwrap();
        assert!(out.starts_with("[ar:Band]\n[ti:Song]\n"));
    }

    #[test]
    fn test_missing_tag_falls_back_to_default() {
        let tags = LrcTags::new(None, Some("Song".to_string()));
        let out = EnhancedLrcWriter::with_tags(tags)
            .render(&LyricsDocument::default())
            .unwrap();
        assert!(out.starts_with("[ar:Generated by lyricsync]\n[ti:Song]\n"));
    }

    #[test]
    fn test_enhanced_lrc_word_tags() {
        let out = EnhancedLrcWriter::new().render(&document()).unwrap();
        assert!(out.contains("[00:01.50]<00:01.50>Hello <00:02.00>world\n"));
        assert!(out.contains("[01:02.25]Lost line\n"));
    }
}
