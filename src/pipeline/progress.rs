//! Progress observation for batch runs
//!
//! Pluggable sinks receive per-file progress as the orchestrator works
//! through the batch. [`NoOpSink`] is the default, [`ConsoleSink`] renders
//! a progress bar, and [`MemorySink`] records events for tests.

use crate::model::{BatchResult, FileResult};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::Mutex;

/// Progress event, as recorded by [`MemorySink`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// Batch started with the given file count
    BatchStarted {
        /// Number of files to process
        total: usize,
    },
    /// One file's analysis began
    FileStarted {
        /// Zero-based position in the prioritized order
        index: usize,
        /// File path
        path: String,
    },
    /// One file's analysis finished
    FileFinished {
        /// Zero-based position in the prioritized order
        index: usize,
        /// Whether the analysis call succeeded
        success: bool,
        /// Number of optimizations found
        optimizations: usize,
    },
    /// The whole batch finished
    BatchFinished {
        /// Number of results collected
        results: usize,
    },
}

/// Trait for pluggable batch progress observation
pub trait ProgressSink: Send + Sync {
    /// Sink name
    fn name(&self) -> &str;

    /// Called once before the first file
    fn batch_started(&self, total: usize);

    /// Called before each file's analysis
    fn file_started(&self, index: usize, total: usize, path: &Path);

    /// Called after each file's analysis, success or not
    fn file_finished(&self, index: usize, total: usize, result: &FileResult);

    /// Called once after the batch is summarized
    fn batch_finished(&self, result: &BatchResult);
}

/// No-op sink (default)
pub struct NoOpSink;

impl ProgressSink for NoOpSink {
    fn name(&self) -> &str {
        "noop"
    }

    fn batch_started(&self, _total: usize) {}

    fn file_started(&self, _index: usize, _total: usize, _path: &Path) {}

    fn file_finished(&self, _index: usize, _total: usize, _result: &FileResult) {}

    fn batch_finished(&self, _result: &BatchResult) {}
}

/// Console sink rendering an indicatif progress bar with per-file lines
#[derive(Default)]
pub struct ConsoleSink {
    bar: Mutex<Option<ProgressBar>>,
}

impl ConsoleSink {
    /// Create a console sink
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressSink for ConsoleSink {
    fn name(&self) -> &str {
        "console"
    }

    fn batch_started(&self, total: usize) {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::with_template("{bar:30.cyan/blue} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        *self.bar.lock().expect("console sink lock poisoned") = Some(bar);
    }

    fn file_started(&self, _index: usize, _total: usize, path: &Path) {
        if let Some(bar) = self.bar.lock().expect("console sink lock poisoned").as_ref() {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            bar.set_message(name);
        }
    }

    fn file_finished(&self, _index: usize, _total: usize, result: &FileResult) {
        let guard = self.bar.lock().expect("console sink lock poisoned");
        if let Some(bar) = guard.as_ref() {
            let line = if !result.success {
                format!(
                    "  {} {}: {}",
                    style("✗").red(),
                    result.file_name(),
                    result.error.as_deref().unwrap_or("analysis failed")
                )
            } else if result.has_optimizations() {
                format!(
                    "  {} {}: {} optimizations",
                    style("✓").green(),
                    result.file_name(),
                    result.optimization_count()
                )
            } else {
                format!(
                    "  {} {}: no optimizations needed",
                    style("✓").green(),
                    result.file_name()
                )
            };
            bar.println(line);
            bar.inc(1);
        }
    }

    fn batch_finished(&self, result: &BatchResult) {
        if let Some(bar) = self
            .bar
            .lock()
            .expect("console sink lock poisoned")
            .take()
        {
            bar.finish_and_clear();
        }
        log::info!(
            "batch finished: {} results, {} with optimizations",
            result.file_results.len(),
            result.summary.files_with_optimizations
        );
    }
}

/// In-memory sink for testing
#[derive(Default)]
pub struct MemorySink {
    events: Mutex<Vec<ProgressEvent>>,
}

impl MemorySink {
    /// Create a new memory sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded events
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex was poisoned by a panicking thread.
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .expect("memory sink lock poisoned")
            .clone()
    }
}

impl ProgressSink for MemorySink {
    fn name(&self) -> &str {
        "memory"
    }

    fn batch_started(&self, total: usize) {
        self.events
            .lock()
            .expect("memory sink lock poisoned")
            .push(ProgressEvent::BatchStarted { total });
    }

    fn file_started(&self, index: usize, _total: usize, path: &Path) {
        self.events
            .lock()
            .expect("memory sink lock poisoned")
            .push(ProgressEvent::FileStarted {
                index,
                path: path.display().to_string(),
            });
    }

    fn file_finished(&self, index: usize, _total: usize, result: &FileResult) {
        self.events
            .lock()
            .expect("memory sink lock poisoned")
            .push(ProgressEvent::FileFinished {
                index,
                success: result.success,
                optimizations: result.optimization_count(),
            });
    }

    fn batch_finished(&self, result: &BatchResult) {
        self.events
            .lock()
            .expect("memory sink lock poisoned")
            .push(ProgressEvent::BatchFinished {
                results: result.file_results.len(),
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FileRecord, MemorySnapshot};

    fn dummy_result(success: bool) -> FileResult {
        let file = FileRecord::new("x.cs", "x");
        if success {
            FileResult {
                success: true,
                error: None,
                ..FileResult::failed(&file, MemorySnapshot::zero(), String::new())
            }
        } else {
            FileResult::failed(&file, MemorySnapshot::zero(), "err".to_string())
        }
    }

    #[test]
    fn test_noop_sink_does_nothing() {
        let sink = NoOpSink;
        assert_eq!(sink.name(), "noop");
        sink.batch_started(3);
        sink.file_started(0, 3, Path::new("a.cs"));
        sink.file_finished(0, 3, &dummy_result(true));
        sink.batch_finished(&BatchResult::new("."));
    }

    #[test]
    fn test_memory_sink_records_event_sequence() {
        let sink = MemorySink::new();
        assert_eq!(sink.name(), "memory");

        sink.batch_started(2);
        sink.file_started(0, 2, Path::new("a.cs"));
        sink.file_finished(0, 2, &dummy_result(true));
        sink.file_started(1, 2, Path::new("b.cs"));
        sink.file_finished(1, 2, &dummy_result(false));

        let events = sink.events();
        assert_eq!(events.len(), 5);
        assert_eq!(events[0], ProgressEvent::BatchStarted { total: 2 });
        assert!(matches!(
            events[4],
            ProgressEvent::FileFinished {
                index: 1,
                success: false,
                ..
            }
        ));
    }

    #[test]
    fn test_console_sink_survives_full_sequence() {
        let sink = ConsoleSink::new();
        sink.batch_started(1);
        sink.file_started(0, 1, Path::new("a.cs"));
        sink.file_finished(0, 1, &dummy_result(true));
        sink.batch_finished(&BatchResult::new("."));
    }

    #[test]
    fn test_console_sink_finish_without_start_is_harmless() {
        let sink = ConsoleSink::new();
        sink.file_finished(0, 1, &dummy_result(false));
        sink.batch_finished(&BatchResult::new("."));
    }
}
