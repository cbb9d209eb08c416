use std::path::PathBuf;
use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, Sender};

use crate::pipeline::batch_executor::{BatchConfig, BatchExecutor, SyncJob};
use crate::pipeline::pipeline_logger::NullPipelineLogger;
use crate::pipeline::sync_lyrics_use_case::{SyncLyricsUseCase, SyncOutcome};
use crate::shared::error::SyncError;

const DEFAULT_CHANNEL_CAPACITY: usize = 8;

type JobResult = Result<SyncOutcome, SyncError>;

/// Runs sync jobs on a fixed pool of worker threads.
///
/// Layout: `main → [bounded job queue] → workers → [result queue] → main`
///
/// Each job produces its own independent alignment run. Results are slotted
/// back by job index so the output order matches the input order.
pub struct ThreadedBatchExecutor {
    workers: usize,
    channel_capacity: usize,
}

impl ThreadedBatchExecutor {
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }
}

impl Default for ThreadedBatchExecutor {
    fn default() -> Self {
        let workers = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self::new(workers)
    }
}

impl BatchExecutor for ThreadedBatchExecutor {
    fn execute(
        &self,
        use_case: Arc<SyncLyricsUseCase>,
        jobs: Vec<SyncJob>,
        config: BatchConfig,
    ) -> Vec<JobResult> {
        let total = jobs.len();
        if total == 0 {
            return Vec::new();
        }

        let (job_tx, job_rx) = crossbeam_channel::bounded::<(usize, SyncJob)>(self.channel_capacity);
        let (result_tx, result_rx) = crossbeam_channel::unbounded::<(usize, JobResult)>();

        let handles: Vec<_> = (0..self.workers.min(total))
            .map(|_| {
                spawn_worker(
                    use_case.clone(),
                    job_rx.clone(),
                    result_tx.clone(),
                    config.output_dir.clone(),
                )
            })
            .collect();
        drop(job_rx);
        drop(result_tx);

        for (index, job) in jobs.into_iter().enumerate() {
            if job_tx.send((index, job)).is_err() {
                log::error!("All batch workers exited early");
                break;
            }
        }
        drop(job_tx);

        let mut slots: Vec<Option<JobResult>> = (0..total).map(|_| None).collect();
        let mut finished = 0;
        for (index, result) in result_rx {
            slots[index] = Some(result);
            finished += 1;
            if let Some(ref callback) = config.on_progress {
                callback(finished, total);
            }
        }

        for handle in handles {
            if handle.join().is_err() {
                log::error!("Batch worker thread panicked");
            }
        }

        slots
            .into_iter()
            .map(|slot| {
                slot.unwrap_or_else(|| Err(SyncError::Worker("job did not complete".to_string())))
            })
            .collect()
    }
}

fn spawn_worker(
    use_case: Arc<SyncLyricsUseCase>,
    job_rx: Receiver<(usize, SyncJob)>,
    result_tx: Sender<(usize, JobResult)>,
    default_output_dir: PathBuf,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        for (index, job) in job_rx {
            let output_dir = job.output_dir.as_ref().unwrap_or(&default_output_dir);
            let result = use_case.run(
                &job.transcript,
                &job.lyrics,
                output_dir,
                &mut NullPipelineLogger,
            );
            if let Err(ref e) = result {
                log::warn!("Job {} ({}) failed: {e}", index, job.lyrics.display());
            }
            if result_tx.send((index, result)).is_err() {
                break;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alignment::domain::alignment_config::AlignmentConfig;
    use crate::alignment::domain::alignment_engine::AlignmentEngine;
    use crate::output::infrastructure::lrc_writer::LrcTags;
    use crate::output::infrastructure::writer_factory::{create_writer, OutputFormat};
    use crate::transcript::domain::transcript::Transcript;
    use crate::transcript::domain::transcript_source::TranscriptSource;
    use crate::transcript::domain::word_token::WordToken;
    use std::fs;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Serves a one-word transcript named after the file, or nothing for
    /// paths containing "empty".
    struct FileNameSource;

    impl TranscriptSource for FileNameSource {
        fn load(&self, path: &Path) -> Result<Transcript, SyncError> {
            let name = path.file_stem().unwrap().to_string_lossy().into_owned();
            if name.contains("empty") {
                return Transcript::from_words(Vec::new());
            }
            Transcript::from_words(vec![WordToken::new(name, 1.0, 2.0)])
        }
    }

    fn use_case() -> Arc<SyncLyricsUseCase> {
        Arc::new(SyncLyricsUseCase::new(
            Box::new(FileNameSource),
            AlignmentEngine::new(AlignmentConfig::default()).unwrap(),
            vec![create_writer(OutputFormat::Lrc, &LrcTags::default())],
        ))
    }

    fn jobs(dir: &Path, names: &[&str]) -> Vec<SyncJob> {
        names
            .iter()
            .map(|name| {
                let lyrics = dir.join(format!("{name}.txt"));
                fs::write(&lyrics, format!("{name}\n")).unwrap();
                SyncJob {
                    transcript: dir.join(format!("{name}.json")),
                    lyrics,
                    output_dir: None,
                }
            })
            .collect()
    }

    fn config(dir: &Path) -> BatchConfig {
        BatchConfig {
            output_dir: dir.join("out"),
            on_progress: None,
        }
    }

    #[test]
    fn test_results_follow_job_order() {
        let tmp = tempfile::tempdir().unwrap();
        let names = ["alpha", "bravo", "charlie", "delta", "echo"];
        let results = ThreadedBatchExecutor::new(3).execute(
            use_case(),
            jobs(tmp.path(), &names),
            config(tmp.path()),
        );
        assert_eq!(results.len(), names.len());
        for (result, name) in results.iter().zip(names) {
            let outcome = result.as_ref().unwrap();
            assert_eq!(outcome.run.segments()[0].line().raw_text, name);
            assert_eq!(
                outcome.written[0],
                tmp.path().join("out").join(format!("{name}_synced.lrc"))
            );
        }
    }

    #[test]
    fn test_failed_job_does_not_stop_others() {
        let tmp = tempfile::tempdir().unwrap();
        let results = ThreadedBatchExecutor::new(2).execute(
            use_case(),
            jobs(tmp.path(), &["one", "empty", "three"]),
            config(tmp.path()),
        );
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(SyncError::EmptyTranscript)));
        assert!(results[2].is_ok());
    }

    #[test]
    fn test_progress_reports_every_job() {
        let tmp = tempfile::tempdir().unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        let config = BatchConfig {
            output_dir: tmp.path().to_path_buf(),
            on_progress: Some(Box::new(move |done: usize, total: usize| {
                assert!(done <= total);
                seen.fetch_add(1, Ordering::SeqCst);
            })),
        };
        ThreadedBatchExecutor::new(4).execute(use_case(), jobs(tmp.path(), &["a", "b"]), config);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_job_output_dir_overrides_default() {
        let tmp = tempfile::tempdir().unwrap();
        let mut batch = jobs(tmp.path(), &["solo"]);
        batch[0].output_dir = Some(tmp.path().join("custom"));
        let results = ThreadedBatchExecutor::new(1).execute(use_case(), batch, config(tmp.path()));
        assert_eq!(
            results[0].as_ref().unwrap().written[0],
            tmp.path().join("custom").join("solo_synced.lrc")
        );
    }

    #[test]
    fn test_empty_batch() {
        let tmp = tempfile::tempdir().unwrap();
        let results = ThreadedBatchExecutor::default().execute(use_case(), Vec::new(), config(tmp.path()));
        assert!(results.is_empty());
        assert!(ThreadedBatchExecutor::new(0).workers() >= 1);
    }
}
