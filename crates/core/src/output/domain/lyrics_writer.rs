use std::fs;
use std::path::{Path, PathBuf};

use crate::output::domain::lyrics_document::LyricsDocument;
use crate::shared::error::SyncError;

/// Renders a [`LyricsDocument`] into one file format.
pub trait LyricsWriter: Send + Sync {
    /// File extension without the leading dot.
    fn extension(&self) -> &'static str;

    fn render(&self, document: &LyricsDocument) -> Result<String, SyncError>;
}

/// Renders `document` and writes it to `<dir>/<stem>.<ext>`, creating `dir`
/// if needed. Returns the written path.
pub fn write_document(
    writer: &dyn LyricsWriter,
    document: &LyricsDocument,
    dir: &Path,
    stem: &str,
) -> Result<PathBuf, SyncError> {
    let body = writer.render(document)?;
    fs::create_dir_all(dir).map_err(|source| SyncError::Write {
        path: dir.to_path_buf(),
        source,
    })?;
    let path = dir.join(format!("{stem}.{}", writer.extension()));
    fs::write(&path, body).map_err(|source| SyncError::Write {
        path: path.clone(),
        source,
    })?;
    log::info!("Wrote {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoWriter;

    impl LyricsWriter for EchoWriter {
        fn extension(&self) -> &'static str {
            "echo"
        }

        fn render(&self, document: &LyricsDocument) -> Result<String, SyncError> {
            Ok(format!("{} lines", document.len()))
        }
    }

    #[test]
    fn test_write_document_creates_dir_and_file() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested");
        let path =
            write_document(&EchoWriter, &LyricsDocument::default(), &dir, "song_synced").unwrap();
        assert_eq!(path, dir.join("song_synced.echo"));
        assert_eq!(fs::read_to_string(path).unwrap(), "0 lines");
    }
}
