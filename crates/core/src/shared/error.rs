use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the synchronization and transcription paths.
///
/// Quality problems (low confidence, unmatched lines, overlapping timing) are
/// never errors; they are reported on the aligned segments instead.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("lyrics source {source_name} could not be decoded as text")]
    UnreadableLyrics { source_name: String },
    #[error("transcript contains no words")]
    EmptyTranscript,
    #[error("invalid transcript word {index}: {reason}")]
    InvalidTranscript { index: usize, reason: String },
    #[error("invalid alignment config: {0}")]
    InvalidConfig(String),
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("transcript {path} is not in a recognized format: {source}")]
    TranscriptFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to parse settings {path}: {source}")]
    Settings {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize output: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("batch manifest {path} is invalid: {source}")]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("batch worker failed: {0}")]
    Worker(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreadable_lyrics_names_source() {
        let err = SyncError::UnreadableLyrics {
            source_name: "song.lrc".to_string(),
        };
        assert!(err.to_string().contains("song.lrc"));
    }

    #[test]
    fn test_read_error_exposes_io_source() {
        let err = SyncError::Read {
            path: PathBuf::from("/missing.txt"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.to_string().contains("/missing.txt"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
