//! The aggregation run: collect in parallel, merge once, finalize.
//!
//! Every task owns a fresh [`WorkerPartial`] and hands it back when done.
//! Nothing shared is written while tasks run; the only synchronization is the
//! join before the sequential merge. Partials are merged in task order, so a
//! given chunk size produces the same rounding no matter how many threads
//! picked the tasks up.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::cleaner::CleaningRules;
use super::error::StatsError;
use super::finalize::MarketSummary;
use super::merge::Merge;
use super::partial::WorkerPartial;
use super::row_parallel::scatter_reduce;
use super::settings::{ExecutionMode, Schedule};
use crate::ports::record_source::RecordSource;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Unreadable(String),
    OutOfMemory,
    TooFewRecords(usize),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Unreadable(reason) => write!(f, "unreadable ({reason})"),
            SkipReason::OutOfMemory => write!(f, "out of memory while loading"),
            SkipReason::TooFewRecords(n) => write!(f, "only {n} usable record(s)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: SkipReason,
}

/// Everything a finished run hands to a reporter.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub summary: MarketSummary,
    pub skipped: Vec<SkippedFile>,
    pub files_found: usize,
    pub workers: usize,
    pub elapsed: Duration,
}

/// Result of one task: its partial plus the files it had to skip.
#[derive(Debug, Default)]
struct TaskOutput {
    partial: WorkerPartial,
    skipped: Vec<SkippedFile>,
}

pub struct Aggregator<'a> {
    source: &'a (dyn RecordSource + Sync),
    rules: CleaningRules,
}

impl<'a> Aggregator<'a> {
    pub fn new(source: &'a (dyn RecordSource + Sync), rules: CleaningRules) -> Self {
        Self { source, rules }
    }

    /// File-parallel run: each file is one unit of work.
    pub fn run_files(&self, files: &[PathBuf], schedule: &Schedule) -> Result<RunReport, StatsError> {
        let started = Instant::now();
        let chunk_size = schedule.chunk_size.max(1);

        let (outputs, workers) = match schedule.mode {
            ExecutionMode::Serial => (vec![self.collect(files)?], 1),
            ExecutionMode::Parallel => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(schedule.threads.unwrap_or(0))
                    .build()
                    .map_err(|e| StatsError::ThreadPool {
                        reason: e.to_string(),
                    })?;
                let workers = pool.current_num_threads();
                info!(files = files.len(), workers, chunk_size, "collecting");
                let outputs = pool.install(|| {
                    files
                        .par_chunks(chunk_size)
                        .map(|chunk| self.collect(chunk))
                        .collect::<Result<Vec<_>, _>>()
                })?;
                (outputs, workers)
            }
        };

        let mut merged = WorkerPartial::default();
        let mut skipped = Vec::new();
        for output in outputs {
            merged.merge(&output.partial);
            skipped.extend(output.skipped);
        }

        let summary = MarketSummary::finalize(&merged);
        let elapsed = started.elapsed();
        info!(
            files_used = summary.files_used,
            skipped = skipped.len(),
            decades = summary.decades.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "run finished"
        );

        Ok(RunReport {
            summary,
            skipped,
            files_found: files.len(),
            workers,
            elapsed,
        })
    }

    /// Row-parallel run over a single file. The file is required: any load
    /// failure aborts the run.
    pub fn run_rows(&self, path: &Path, workers: usize) -> Result<RunReport, StatsError> {
        let started = Instant::now();
        let workers = workers.max(1);
        let records = self.source.load(path)?;
        info!(path = %path.display(), rows = records.len(), workers, "scattering rows");

        let mut skipped = Vec::new();
        let merged = if records.len() <= 1 {
            warn!(path = %path.display(), records = records.len(), "too few records, nothing to aggregate");
            skipped.push(SkippedFile {
                path: path.to_path_buf(),
                reason: SkipReason::TooFewRecords(records.len()),
            });
            WorkerPartial::default()
        } else {
            let dataset: Arc<[_]> = records.into();
            let mut merged = scatter_reduce(dataset, workers, self.rules)?;
            merged.files_used = 1;
            merged
        };

        let summary = MarketSummary::finalize(&merged);
        Ok(RunReport {
            summary,
            skipped,
            files_found: 1,
            workers,
            elapsed: started.elapsed(),
        })
    }

    /// Load and fold `files` into one partial, in order.
    fn collect(&self, files: &[PathBuf]) -> Result<TaskOutput, StatsError> {
        let mut out = TaskOutput::default();

        for path in files {
            let records = match self.source.load(path) {
                Ok(records) => records,
                Err(e) if e.is_skippable() => {
                    warn!(path = %path.display(), error = %e, "skipping file");
                    let reason = match e {
                        StatsError::Allocation { .. } => SkipReason::OutOfMemory,
                        other => SkipReason::Unreadable(other.to_string()),
                    };
                    out.skipped.push(SkippedFile {
                        path: path.clone(),
                        reason,
                    });
                    continue;
                }
                Err(e) => return Err(e),
            };

            if out.partial.accumulate_file(&records, &self.rules) {
                debug!(path = %path.display(), records = records.len(), "file aggregated");
            } else {
                warn!(path = %path.display(), records = records.len(), "skipping file with too few records");
                out.skipped.push(SkippedFile {
                    path: path.clone(),
                    reason: SkipReason::TooFewRecords(records.len()),
                });
            }
        }

        Ok(out)
    }
}
