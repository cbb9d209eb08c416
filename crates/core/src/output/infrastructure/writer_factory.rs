use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::output::domain::lyrics_writer::LyricsWriter;
use crate::output::infrastructure::json_writer::JsonWriter;
use crate::output::infrastructure::lrc_writer::{EnhancedLrcWriter, LrcTags, LrcWriter};
use crate::output::infrastructure::srt_writer::SrtWriter;
use crate::output::infrastructure::text_writer::TextWriter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Lrc,
    Elrc,
    Srt,
    Json,
    Txt,
}

impl OutputFormat {
    pub const ALL: &[OutputFormat] = &[
        OutputFormat::Lrc,
        OutputFormat::Elrc,
        OutputFormat::Srt,
        OutputFormat::Json,
        OutputFormat::Txt,
    ];

    /// Formats written when none are requested.
    pub const DEFAULT: &[OutputFormat] = &[OutputFormat::Lrc, OutputFormat::Srt, OutputFormat::Json];

    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::Lrc => "lrc",
            OutputFormat::Elrc => "elrc",
            OutputFormat::Srt => "srt",
            OutputFormat::Json => "json",
            OutputFormat::Txt => "txt",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        OutputFormat::ALL
            .iter()
            .copied()
            .find(|f| f.name() == lowered)
            .ok_or_else(|| {
                let names: Vec<&str> = OutputFormat::ALL.iter().map(|f| f.name()).collect();
                format!("unknown output format '{s}' (expected one of: {})", names.join(", "))
            })
    }
}

/// Writer for `format`. `tags` only affect the LRC formats.
pub fn create_writer(format: OutputFormat, tags: &LrcTags) -> Box<dyn LyricsWriter> {
    match format {
        OutputFormat::Lrc => Box::new(LrcWriter::with_tags(tags.clone())),
        OutputFormat::Elrc => Box::new(EnhancedLrcWriter::with_tags(tags.clone())),
        OutputFormat::Srt => Box::new(SrtWriter::new()),
        OutputFormat::Json => Box::new(JsonWriter::new()),
        OutputFormat::Txt => Box::new(TextWriter::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("lrc", OutputFormat::Lrc)]
    #[case("ELRC", OutputFormat::Elrc)]
    #[case(" srt ", OutputFormat::Srt)]
    #[case("json", OutputFormat::Json)]
    #[case("txt", OutputFormat::Txt)]
    fn test_parse_format(#[case] input: &str, #[case] expected: OutputFormat) {
        assert_eq!(input.parse::<OutputFormat>().unwrap(), expected);
    }

    #[test]
    fn test_unknown_format_lists_choices() {
        let err = "vtt".parse::<OutputFormat>().unwrap_err();
        assert!(err.contains("vtt"));
        assert!(err.contains("lrc, elrc, srt, json, txt"));
    }

    #[test]
    fn test_writer_extension_matches_format() {
        for format in OutputFormat::ALL {
            assert_eq!(create_writer(*format, &LrcTags::default()).extension(), format.name());
        }
    }
}
