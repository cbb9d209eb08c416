use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;

use crate::shared::error::SyncError;

use super::sync_lyrics_use_case::{SyncLyricsUseCase, SyncOutcome};

/// One transcript/lyrics pair to synchronize.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SyncJob {
    pub transcript: PathBuf,
    pub lyrics: PathBuf,
    /// Falls back to the batch-wide output directory.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

/// Options for a batch execution run.
pub struct BatchConfig {
    pub output_dir: PathBuf,
    pub on_progress: Option<Box<dyn Fn(usize, usize) + Send + Sync>>,
}

/// Abstracts how a list of sync jobs is executed.
///
/// Implementations return exactly one result per job, in job order. A failed
/// job never prevents the remaining jobs from running.
pub trait BatchExecutor: Send {
    fn execute(
        &self,
        use_case: Arc<SyncLyricsUseCase>,
        jobs: Vec<SyncJob>,
        config: BatchConfig,
    ) -> Vec<Result<SyncOutcome, SyncError>>;
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Manifest {
    Jobs(Vec<SyncJob>),
    Wrapped { jobs: Vec<SyncJob> },
}

/// Reads a batch manifest: either a job array or `{"jobs": [...]}`.
/// Relative paths are resolved against the manifest's directory.
pub fn load_manifest(path: &Path) -> Result<Vec<SyncJob>, SyncError> {
    let json = fs::read_to_string(path).map_err(|source| SyncError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let manifest: Manifest =
        serde_json::from_str(&json).map_err(|source| SyncError::Manifest {
            path: path.to_path_buf(),
            source,
        })?;
    let jobs = match manifest {
        Manifest::Jobs(jobs) | Manifest::Wrapped { jobs } => jobs,
    };

    let base = path.parent().unwrap_or_else(|| Path::new(""));
    Ok(jobs
        .into_iter()
        .map(|job| SyncJob {
            transcript: base.join(job.transcript),
            lyrics: base.join(job.lyrics),
            output_dir: job.output_dir.map(|d| base.join(d)),
        })
        .collect())
}
