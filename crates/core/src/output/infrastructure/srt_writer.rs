use crate::output::domain::lyrics_document::LyricsDocument;
use crate::output::domain::lyrics_writer::LyricsWriter;
use crate::output::infrastructure::timestamp::srt_timestamp;
use crate::shared::error::SyncError;

/// SubRip cues numbered from 1.
#[derive(Default)]
pub struct SrtWriter;

impl SrtWriter {
    pub fn new() -> Self {
        Self
    }
}

impl LyricsWriter for SrtWriter {
    fn extension(&self) -> &'static str {
        "srt"
    }

    fn render(&self, document: &LyricsDocument) -> Result<String, SyncError> {
        let mut out = String::new();
        for (i, line) in document.lines.iter().enumerate() {
            out.push_str(&format!(
                "{}\n{} --> {}\n{}\n\n",
                i + 1,
                srt_timestamp(line.start),
                srt_timestamp(line.end),
                line.text
            ));
        }
        Ok(out)
    }
}
