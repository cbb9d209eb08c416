use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::alignment::domain::segment_summarizer::AlignmentSummary;

/// Timed stages of a lyricsync run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Load,
    Align,
    Write,
}

impl Stage {
    pub fn name(self) -> &'static str {
        match self {
            Stage::Load => "load",
            Stage::Align => "align",
            Stage::Write => "write",
        }
    }
}

/// Receives the events of one sync or transcribe run.
///
/// Use cases report through this trait so the CLI, batch workers and tests
/// can each observe a run without changing the orchestration code.
pub trait PipelineLogger: Send {
    fn stage(&mut self, stage: Stage, elapsed: Duration);

    /// Inputs are loaded: transcript words and the lines that will be written.
    fn loaded(&mut self, words: usize, lines: usize);

    fn aligned(&mut self, summary: &AlignmentSummary);

    fn wrote(&mut self, path: &Path);

    /// Emit the end-of-run report. Default: no-op.
    fn finish(&self) {}
}

/// Discards every event. Used by batch workers, which report through their
/// progress callback, and by tests.
pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn stage(&mut self, _stage: Stage, _elapsed: Duration) {}
    fn loaded(&mut self, _words: usize, _lines: usize) {}
    fn aligned(&mut self, _summary: &AlignmentSummary) {}
    fn wrote(&mut self, _path: &Path) {}
}

/// Collects one run's stage timings and results and logs them as a short
/// report when the run finishes.
#[derive(Debug, Default)]
pub struct RunReportLogger {
    stages: Vec<(Stage, Duration)>,
    words: usize,
    lines: usize,
    placeholders: Option<usize>,
    written: Vec<PathBuf>,
}

impl RunReportLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elapsed(&self, stage: Stage) -> Option<Duration> {
        self.stages
            .iter()
            .find(|(s, _)| *s == stage)
            .map(|(_, elapsed)| *elapsed)
    }

    pub fn placeholders(&self) -> Option<usize> {
        self.placeholders
    }

    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    /// The report text, or `None` before any stage has run.
    pub fn report(&self) -> Option<String> {
        if self.stages.is_empty() {
            return None;
        }

        let mut head = format!("Run summary: {} words, {} lines", self.words, self.lines);
        if let Some(placeholders) = self.placeholders {
            head.push_str(&format!(", {placeholders} placeholders"));
        }
        let mut out = vec![head];
        for (stage, elapsed) in &self.stages {
            out.push(format!(
                "  {:6} {:8.1}ms",
                stage.name(),
                elapsed.as_secs_f64() * 1000.0
            ));
        }
        for path in &self.written {
            out.push(format!("  wrote {}", path.display()));
        }
        Some(out.join("\n"))
    }
}

impl PipelineLogger for RunReportLogger {
    fn stage(&mut self, stage: Stage, elapsed: Duration) {
        log::debug!("Stage {} took {:.1}ms", stage.name(), elapsed.as_secs_f64() * 1000.0);
        self.stages.push((stage, elapsed));
    }

    fn loaded(&mut self, words: usize, lines: usize) {
        self.words = words;
        self.lines = lines;
    }

    fn aligned(&mut self, summary: &AlignmentSummary) {
        self.placeholders = Some(summary.placeholder_count);
        log::info!("{}", summary.to_string().trim_end());
    }

    fn wrote(&mut self, path: &Path) {
        self.written.push(path.to_path_buf());
    }

    fn finish(&self) {
        if let Some(text) = self.report() {
            log::info!("\n{text}");
        }
    }
}
