//! Per-file analysis runner
//!
//! [`FileAnalysisRunner`] is the isolation point of the pipeline: it drives
//! one file through the analysis client, attaches memory snapshots, and
//! always returns a well-formed [`FileResult`]. Collaborator failures are
//! captured into the result's error field and never propagate past this
//! boundary, so one bad file cannot abort the batch.

use crate::analyzer::client::AnalysisClient;
use crate::analyzer::estimate::estimated_saving;
use crate::analyzer::parser::parse_analysis;
use crate::model::{FileRecord, FileResult, MemorySnapshot};
use crate::sampler::{ProcessSampler, Sampler};
use std::time::SystemTime;

/// Drives one file through analysis and snapshot bookkeeping
pub struct FileAnalysisRunner<C: AnalysisClient, S: Sampler = ProcessSampler> {
    client: C,
    sampler: S,
}

impl<C: AnalysisClient> FileAnalysisRunner<C> {
    /// Create a runner sampling this process's own counters
    pub fn new(client: C) -> Self {
        Self::with_sampler(client, ProcessSampler::new())
    }
}

impl<C: AnalysisClient, S: Sampler> FileAnalysisRunner<C, S> {
    /// Create a runner with a custom sampler implementation
    pub fn with_sampler(client: C, sampler: S) -> Self {
        Self { client, sampler }
    }

    /// Analyze one file. Never returns an error: client failures become a
    /// result with `success == false` and a populated `error`.
    pub fn run(&self, file: &FileRecord) -> FileResult {
        let before = self.sampler.sample();

        let reply = match self.client.analyze(file) {
            Ok(reply) => reply,
            Err(e) => {
                log::warn!("analysis failed for {}: {}", file.path.display(), e);
                return FileResult::failed(file, before, e.to_string());
            }
        };

        let (suggestions, optimized) = parse_analysis(file, &reply);

        // Synthetic "after" snapshot: current counters scaled down by the
        // per-category estimation policy. No compiled comparison happens.
        let saving = estimated_saving(&suggestions);
        let current = self.sampler.sample();
        let after = MemorySnapshot {
            allocated_bytes: scale_down(current.allocated_bytes, saving),
            working_set: scale_down(current.working_set, saving),
            gen_collections: current.gen_collections,
            captured_at: SystemTime::now(),
        };

        let improvement_pct = improvement_percentage(&before, &after);

        FileResult {
            path: file.path.clone(),
            original: file.content.clone(),
            optimized,
            suggestions,
            memory_before: before,
            memory_after: after,
            improvement_pct,
            success: true,
            error: None,
        }
    }
}

fn scale_down(value: i64, saving: f64) -> i64 {
    (value as f64 * (1.0 - saving)) as i64
}

/// `max(0, (before − after) / before × 100)`, zero when `before` has no
/// allocation to compare against. Clamped into `[0, 100]`.
pub fn improvement_percentage(before: &MemorySnapshot, after: &MemorySnapshot) -> f64 {
    if before.allocated_bytes <= 0 {
        return 0.0;
    }
    let raw = (before.allocated_bytes - after.allocated_bytes) as f64
        / before.allocated_bytes as f64
        * 100.0;
    raw.clamp(0.0, 100.0)
}
