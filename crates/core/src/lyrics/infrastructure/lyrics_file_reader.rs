use std::fs;
use std::path::Path;

use crate::lyrics::domain::lyric_line::LyricLine;
use crate::lyrics::domain::lyrics_source::{LyricsFormat, LyricsSource};
use crate::lyrics::infrastructure::lyrics_parsers;
use crate::shared::constants::{LRC_EXTENSIONS, SRT_EXTENSIONS};
use crate::shared::error::SyncError;

/// Loads lyric lines from `.txt`, `.lrc` or `.srt` files.
#[derive(Debug, Default)]
pub struct LyricsFileReader;

impl LyricsFileReader {
    pub fn new() -> Self {
        Self
    }

    /// Reads, decodes and parses a lyrics file into its source form.
    pub fn read(&self, path: &Path) -> Result<LyricsSource, SyncError> {
        let bytes = fs::read(path).map_err(|source| SyncError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let content = decode(&bytes, &path.display().to_string())?;
        Ok(lyrics_parsers::parse(format_for_path(path), &content))
    }

    /// Reads a lyrics file straight into normalized lyric lines.
    pub fn load_lines(&self, path: &Path) -> Result<Vec<LyricLine>, SyncError> {
        let source = self.read(path)?;
        let entries = source.len();
        let lines = source.into_lines();
        log::info!(
            "Loaded {} lyric lines ({} source entries) from {}",
            lines.len(),
            entries,
            path.display()
        );
        Ok(lines)
    }
}

/// Picks the lyrics format from the file extension; unknown means plain text.
pub fn format_for_path(path: &Path) -> LyricsFormat {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .unwrap_or_default();
    if LRC_EXTENSIONS.contains(&ext.as_str()) {
        LyricsFormat::Lrc
    } else if SRT_EXTENSIONS.contains(&ext.as_str()) {
        LyricsFormat::Srt
    } else {
        LyricsFormat::Plain
    }
}

/// Decodes UTF-8 (optional BOM) or BOM-marked UTF-16 text.
pub fn decode(bytes: &[u8], source_name: &str) -> Result<String, SyncError> {
    let unreadable = || SyncError::UnreadableLyrics {
        source_name: source_name.to_string(),
    };

    let text = if let Some(rest) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        String::from_utf8(rest.to_vec()).map_err(|_| unreadable())?
    } else if let Some(rest) = bytes.strip_prefix(&[0xFF, 0xFE]) {
        decode_utf16(rest, u16::from_le_bytes).ok_or_else(unreadable)?
    } else if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        decode_utf16(rest, u16::from_be_bytes).ok_or_else(unreadable)?
    } else {
        String::from_utf8(bytes.to_vec()).map_err(|_| unreadable())?
    };

    if text.contains('\0') {
        return Err(unreadable());
    }
    Ok(text)
}

fn decode_utf16(bytes: &[u8], to_unit: fn([u8; 2]) -> u16) -> Option<String> {
    if bytes.len() % 2 != 0 {
        return None;
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| to_unit([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units).ok()
}
