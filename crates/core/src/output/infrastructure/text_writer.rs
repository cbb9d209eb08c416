use crate::output::domain::lyrics_document::LyricsDocument;
use crate::output::domain::lyrics_writer::LyricsWriter;
use crate::shared::error::SyncError;

/// Untimed text, one line per record.
#[derive(Default)]
pub struct TextWriter;

impl TextWriter {
    pub fn new() -> Self {
        Self
    }
}

impl LyricsWriter for TextWriter {
    fn extension(&self) -> &'static str {
        "txt"
    }

    fn render(&self, document: &LyricsDocument) -> Result<String, SyncError> {
        let mut out = String::new();
        for line in &document.lines {
            out.push_str(&line.text);
            out.push('\n');
        }
        Ok(out)
    }
}
