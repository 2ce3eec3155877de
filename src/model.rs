//! Core data model for batch analysis results
//!
//! These types flow through the whole pipeline: discovery produces
//! [`FileRecord`]s, the per-file runner produces [`FileResult`]s, and the
//! orchestrator collects them into a [`BatchResult`] with a derived
//! [`Summary`].

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// One source file enumerated by discovery.
///
/// Created by the discovery collaborator and read-only thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    /// Path to the file on disk
    pub path: PathBuf,
    /// Full textual content (may be empty, never absent)
    pub content: String,
    /// Language tag derived from the file extension
    pub language: String,
}

impl FileRecord {
    /// Create a record, deriving the language tag from the path extension
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        let path = path.into();
        let language = language_for_path(&path).to_string();
        Self {
            path,
            content: content.into(),
            language,
        }
    }
}

/// Map a file extension to a language tag for the analysis prompt
pub fn language_for_path(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("cs") => "csharp",
        Some("rs") => "rust",
        Some("java") => "java",
        Some("py") => "python",
        Some("ts") => "typescript",
        Some("js") => "javascript",
        Some("go") => "go",
        Some("cpp") | Some("cc") | Some("cxx") => "cpp",
        _ => "text",
    }
}

/// Severity of an optimization suggestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    /// Significant memory impact
    High,
    /// Moderate memory impact
    Medium,
    /// Minor memory impact
    Low,
}

impl Severity {
    /// Normalize a free-text severity from the analysis service.
    ///
    /// Absent or garbage values map to [`Severity::Medium`].
    pub fn normalize(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("high") => Self::High,
            Some("low") => Self::Low,
            _ => Self::Medium,
        }
    }

    /// Lowercase label, used as a CSS class in the HTML report
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        };
        write!(f, "{}", label)
    }
}

/// One optimization finding for one file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    /// Optimization category label (e.g. "String Concatenation")
    pub category: String,
    /// Free-text description of the finding
    pub description: String,
    /// Optional location marker (line number or range, as reported)
    pub location: Option<String>,
    /// Normalized severity
    pub severity: Severity,
    /// Original code snippet, when the service provided one
    pub before: Option<String>,
    /// Optimized code snippet, when the service provided one
    pub after: Option<String>,
}

/// Point-in-time resource reading of the analysis process itself.
///
/// The counters describe this tool's own process, not the analyzed
/// program. See [`crate::sampler`] for why that inaccuracy is preserved.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MemorySnapshot {
    /// Allocated bytes (resident set of this process)
    pub allocated_bytes: i64,
    /// Working set (virtual size of this process)
    pub working_set: i64,
    /// Generational collection counters; always zero under a non-GC runtime
    pub gen_collections: [i64; 3],
    /// Capture timestamp
    pub captured_at: SystemTime,
}

impl MemorySnapshot {
    /// An all-zero snapshot timestamped now
    pub fn zero() -> Self {
        Self {
            allocated_bytes: 0,
            working_set: 0,
            gen_collections: [0; 3],
            captured_at: SystemTime::now(),
        }
    }

    /// Counter-wise difference `after − before`.
    ///
    /// Deltas may legitimately be negative (memory released, asymmetric
    /// collections) and are preserved as-is, never clamped.
    pub fn delta(before: &Self, after: &Self) -> Self {
        Self {
            allocated_bytes: after.allocated_bytes - before.allocated_bytes,
            working_set: after.working_set - before.working_set,
            gen_collections: [
                after.gen_collections[0] - before.gen_collections[0],
                after.gen_collections[1] - before.gen_collections[1],
                after.gen_collections[2] - before.gen_collections[2],
            ],
            captured_at: after.captured_at,
        }
    }
}

/// Outcome of analyzing one file.
///
/// Created exactly once per file by the runner and immutable afterwards.
/// A failed analysis is still a well-formed result: `success` is false,
/// `error` is set, and `optimized` falls back to the original content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileResult {
    /// Path of the analyzed file
    pub path: PathBuf,
    /// Original file content
    pub original: String,
    /// Optimized content (equals `original` when analysis failed)
    pub optimized: String,
    /// Optimization findings, in service-reported order
    pub suggestions: Vec<Suggestion>,
    /// Snapshot taken before the analysis call
    pub memory_before: MemorySnapshot,
    /// Synthetic snapshot after the call (estimation policy, not profiling)
    pub memory_after: MemorySnapshot,
    /// Estimated memory improvement, always in `[0, 100]`
    pub improvement_pct: f64,
    /// Whether the analysis call succeeded
    pub success: bool,
    /// Failure message when `success` is false
    pub error: Option<String>,
}

impl FileResult {
    /// Build the result for a failed analysis call.
    ///
    /// Optimized content defaults to the original; the suggestion list is
    /// empty and the improvement is zero.
    pub fn failed(file: &FileRecord, before: MemorySnapshot, error: String) -> Self {
        Self {
            path: file.path.clone(),
            original: file.content.clone(),
            optimized: file.content.clone(),
            suggestions: Vec::new(),
            memory_before: before,
            memory_after: before,
            improvement_pct: 0.0,
            success: false,
            error: Some(error),
        }
    }

    /// Number of optimization findings
    pub fn optimization_count(&self) -> usize {
        self.suggestions.len()
    }

    /// Whether at least one optimization was found
    pub fn has_optimizations(&self) -> bool {
        !self.suggestions.is_empty()
    }

    /// File basename for display, falling back to the full path
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Outcome of one orchestration run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResult {
    /// Root path that was analyzed
    pub root: PathBuf,
    /// When the run started
    pub started_at: SystemTime,
    /// When the run finished; always set once `run` returns
    pub finished_at: Option<SystemTime>,
    /// Per-file results, in prioritized input order
    pub file_results: Vec<FileResult>,
    /// Derived statistics over `file_results`
    pub summary: Summary,
    /// Orchestration-level fault (e.g. discovery failure)
    pub error: Option<String>,
}

impl BatchResult {
    /// Start a new batch result for the given root
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            started_at: SystemTime::now(),
            finished_at: None,
            file_results: Vec::new(),
            summary: Summary::default(),
            error: None,
        }
    }
}

/// One entry in the most-optimized-files ranking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRanking {
    /// Path of the ranked file
    pub path: PathBuf,
    /// Number of optimizations found
    pub optimization_count: usize,
    /// Estimated improvement percentage
    pub improvement_pct: f64,
}

/// Derived statistics over a batch run.
///
/// Ranked lists are vectors rather than maps so their ordering is explicit
/// and deterministic for a given input.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Summary {
    /// Number of files attempted
    pub total_files: usize,
    /// Files with at least one optimization
    pub files_with_optimizations: usize,
    /// Total optimization count across all files
    pub total_optimizations: usize,
    /// Mean improvement over files with optimizations only; 0 when none
    pub average_improvement_pct: f64,
    /// Wall-clock duration of the run
    pub elapsed: Duration,
    /// Optimization-type histogram, descending count, at most 10 entries
    pub top_categories: Vec<(String, usize)>,
    /// Most-optimized files, descending count, at most 5 entries
    pub most_optimized: Vec<FileRanking>,
}
