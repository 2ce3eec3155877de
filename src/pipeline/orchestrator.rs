//! Batch orchestration
//!
//! [`BatchOrchestrator`] wires discovery, per-file analysis, pacing and
//! summarization into one sequential run. Per-file failures stay inside
//! their [`crate::model::FileResult`]; only discovery faults surface on the
//! batch itself, and even then a well-formed [`crate::model::BatchResult`]
//! is returned.

use crate::analyzer::{AnalysisClient, FileAnalysisRunner};
use crate::model::BatchResult;
use crate::pipeline::aggregate::Aggregator;
use crate::pipeline::progress::{NoOpSink, ProgressSink};
use crate::sampler::Sampler;
use crate::scanner::FileSource;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};

/// Pause between consecutive analysis calls
pub const DEFAULT_DELAY: Duration = Duration::from_millis(500);

/// Sequential batch pipeline over a directory of source files
pub struct BatchOrchestrator<F, C, S>
where
    F: FileSource,
    C: AnalysisClient,
    S: Sampler,
{
    source: F,
    runner: FileAnalysisRunner<C, S>,
    sink: Box<dyn ProgressSink>,
    delay: Duration,
    cancel: Arc<AtomicBool>,
}

impl<F, C, S> BatchOrchestrator<F, C, S>
where
    F: FileSource,
    C: AnalysisClient,
    S: Sampler,
{
    /// Create an orchestrator with the default pacing and no progress output
    pub fn new(source: F, runner: FileAnalysisRunner<C, S>) -> Self {
        Self {
            source,
            runner,
            sink: Box::new(NoOpSink),
            delay: DEFAULT_DELAY,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Replace the progress sink
    pub fn with_sink(mut self, sink: Box<dyn ProgressSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Override the pause between consecutive analysis calls
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Cancellation handle. Setting the flag to true stops the run before
    /// the next file; files already analyzed keep their results.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Run the batch over all eligible files under `root`.
    ///
    /// Files are analyzed one at a time in prioritized order, with a pause
    /// between consecutive calls. Results appear in `file_results` in the
    /// same order the files were scheduled. Discovery failure yields a
    /// batch with no file results and a populated `error`.
    pub fn run(&self, root: &Path) -> BatchResult {
        let started = Instant::now();
        let mut batch = BatchResult::new(root);

        let files = match self.source.scan(root) {
            Ok(files) => self.source.prioritize(files),
            Err(e) => {
                log::error!("discovery failed for {}: {}", root.display(), e);
                batch.error = Some(e.to_string());
                batch.finished_at = Some(SystemTime::now());
                batch.summary = Aggregator::summarize(&[], started.elapsed());
                self.sink.batch_finished(&batch);
                return batch;
            }
        };

        let total = files.len();
        log::info!("analyzing {} files under {}", total, root.display());
        self.sink.batch_started(total);

        for (index, file) in files.iter().enumerate() {
            if self.cancel.load(Ordering::SeqCst) {
                log::info!("cancelled after {} of {} files", index, total);
                break;
            }
            if index > 0 && !self.delay.is_zero() {
                std::thread::sleep(self.delay);
            }

            self.sink.file_started(index, total, &file.path);
            let result = self.runner.run(file);
            self.sink.file_finished(index, total, &result);
            batch.file_results.push(result);
        }

        batch.summary = Aggregator::summarize(&batch.file_results, started.elapsed());
        batch.finished_at = Some(SystemTime::now());
        self.sink.batch_finished(&batch);
        batch
    }
}
