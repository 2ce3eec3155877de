#![warn(missing_docs)]
#![warn(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! code-slim library
//!
//! This library provides the core functionality for AI-assisted memory
//! optimization of source trees. It can be used programmatically in addition
//! to the CLI interface.
//!
//! # Basic Example
//!
//! Summarizing analysis results:
//!
//! ```
//! use code_slim::pipeline::Aggregator;
//! use std::time::Duration;
//!
//! let summary = Aggregator::summarize(&[], Duration::from_secs(1));
//! assert_eq!(summary.total_files, 0);
//! assert_eq!(summary.average_improvement_pct, 0.0);
//! ```
//!
//! # Advanced Example: Write-back with backups
//!
//! Originals are backed up before any overwrite:
//!
//! ```
//! use code_slim::infra::RealFileSystem;
//! use code_slim::writeback::WriteBackManager;
//! use tempfile::TempDir;
//!
//! let workspace = TempDir::new().unwrap();
//! let backup_dir = workspace.path().join("backup");
//!
//! let manager = WriteBackManager::new(RealFileSystem);
//! let report = manager.overwrite_in_place(&[], &backup_dir).unwrap();
//! assert_eq!(report.overwritten(), 0);
//! ```

/// Analysis client, response parsing and per-file runner
pub mod analyzer;
/// Command handlers for CLI operations
pub mod cmd;
/// Configuration file management
pub mod config;
/// Error types with contextual suggestions
pub mod error;
/// Shared formatting utilities
pub mod fmt;
/// Infrastructure traits for filesystem operations
pub mod infra;
/// Core data model: files, suggestions, snapshots, results
pub mod model;
/// Batch pipeline orchestration
pub mod pipeline;
/// HTML report rendering
pub mod report;
/// Process memory sampling
pub mod sampler;
/// Source file discovery
pub mod scanner;
/// Writing optimized content back to disk
pub mod writeback;
