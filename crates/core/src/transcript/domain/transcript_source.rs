use std::path::Path;

use crate::shared::error::SyncError;
use crate::transcript::domain::transcript::Transcript;

/// Domain interface for obtaining a word-level transcript.
///
/// Implementations wrap the speech-recognition collaborator: either a model
/// invocation or a reader for output it already produced.
pub trait TranscriptSource: Send + Sync {
    fn load(&self, path: &Path) -> Result<Transcript, SyncError>;
}
