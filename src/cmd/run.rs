//! Run command implementation
//!
//! Handles the `code-slim run` command: discover source files, analyze each
//! one through the configured service, write the results back, and print a
//! summary (optionally with an HTML report or a JSON dump).

use anyhow::Result;
use console::style;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::analyzer::{FileAnalysisRunner, OpenAiClient};
use crate::config::ConfigLoader;
use crate::error::CodeSlimError;
use crate::fmt::{format_bytes_signed, CHART, CHECKMARK, FLOPPY, MICROSCOPE, ROCKET, WARNING};
use crate::infra::RealFileSystem;
use crate::model::{BatchResult, MemorySnapshot};
use crate::pipeline::{BatchOrchestrator, ConsoleSink};
use crate::report::render_report;
use crate::scanner::DirectoryScanner;
use crate::writeback::{default_backup_dir, WriteBackManager};

/// Options for the run command, mapped from CLI flags
pub struct RunOptions {
    /// Write optimized copies into this directory instead of overwriting
    pub output_dir: Option<PathBuf>,
    /// Overwrite originals in place (backup first)
    pub overwrite: bool,
    /// Confirmation for overwrite mode
    pub yes: bool,
    /// Write the HTML report to this path
    pub report: Option<PathBuf>,
    /// Print the batch result as JSON instead of the console summary
    pub json: bool,
    /// Override the pause between analysis calls
    pub delay_ms: Option<u64>,
}

/// Run the full analysis pipeline over a directory
pub fn cmd_run(path: &str, options: &RunOptions) -> Result<()> {
    let root = PathBuf::from(path);

    if options.overwrite && !options.yes {
        return Err(CodeSlimError::OverwriteNotConfirmed { root }.into());
    }

    if !root.is_dir() {
        return Err(CodeSlimError::Discovery {
            source: crate::scanner::ScanError::RootNotFound { root: root.clone() },
            root,
        }
        .into());
    }

    let config_root = env::current_dir().map_err(|source| CodeSlimError::Io {
        context: "resolving current directory".to_string(),
        source,
    })?;
    let config =
        ConfigLoader::load(&config_root).map_err(|e| CodeSlimError::ConfigInvalid {
            reason: format!("{e:#}"),
        })?;

    // Fail on a missing API key before any files are touched
    let client = OpenAiClient::from_settings(&config.analysis).map_err(CodeSlimError::Analysis)?;

    if !options.json {
        println!(
            "{} {} Analyzing {}",
            ROCKET,
            style("code-slim run").bold(),
            style(root.display()).cyan()
        );
        println!();
    }

    let scanner = DirectoryScanner::new(
        config.batch.extensions.clone(),
        config.batch.skip_dirs.clone(),
        config.batch.max_file_kb * 1024,
    );
    let runner = FileAnalysisRunner::new(client);
    let delay = Duration::from_millis(options.delay_ms.unwrap_or(config.batch.delay_ms));

    let mut orchestrator = BatchOrchestrator::new(scanner, runner).with_delay(delay);
    if !options.json {
        orchestrator = orchestrator.with_sink(Box::new(ConsoleSink::new()));
    }

    let batch = orchestrator.run(&root);

    if let Some(error) = &batch.error {
        return Err(anyhow::anyhow!("{}", error)
            .context(format!("analysis of {} could not start", root.display())));
    }

    write_results(&batch, &root, options)?;

    if let Some(report_path) = &options.report {
        let html = render_report(&batch);
        std::fs::write(report_path, html).map_err(|source| CodeSlimError::Io {
            context: format!("writing report to {}", report_path.display()),
            source,
        })?;
        if !options.json {
            println!(
                "{} Report written to {}",
                CHART,
                style(report_path.display()).cyan()
            );
        }
    }

    if options.json {
        println!("{}", serde_json::to_string_pretty(&batch)?);
    } else {
        print_summary(&batch);
    }

    Ok(())
}

fn write_results(batch: &BatchResult, root: &Path, options: &RunOptions) -> Result<()> {
    let manager = WriteBackManager::new(RealFileSystem);

    if options.overwrite {
        let backup_dir = default_backup_dir(root);
        let report = manager
            .overwrite_in_place(&batch.file_results, &backup_dir)
            .map_err(CodeSlimError::WriteBack)?;
        if !options.json && !report.outcomes.is_empty() {
            println!(
                "{} Overwrote {} files ({} failed), backups in {}",
                FLOPPY,
                style(report.overwritten()).green(),
                if report.failed() > 0 {
                    style(report.failed()).red()
                } else {
                    style(report.failed()).dim()
                },
                style(backup_dir.display()).cyan()
            );
            println!();
        }
    } else if let Some(out_dir) = &options.output_dir {
        let written = manager
            .save_to_directory(&batch.file_results, out_dir)
            .map_err(CodeSlimError::WriteBack)?;
        if !options.json && !written.is_empty() {
            println!(
                "{} Saved {} optimized files to {}",
                FLOPPY,
                style(written.len()).green(),
                style(out_dir.display()).cyan()
            );
            println!();
        }
    }

    Ok(())
}

fn print_summary(batch: &BatchResult) {
    let summary = &batch.summary;

    println!();
    println!("{} {}", MICROSCOPE, style("Analysis Summary").bold());
    println!("   Files analyzed:           {}", summary.total_files);
    println!(
        "   Files with optimizations: {}",
        style(summary.files_with_optimizations).green()
    );
    println!(
        "   Total optimizations:      {}",
        style(summary.total_optimizations).green()
    );
    println!(
        "   Average improvement:      {}",
        style(format!("{:.2}%", summary.average_improvement_pct)).cyan()
    );
    println!(
        "   Duration:                 {:.1}s",
        summary.elapsed.as_secs_f64()
    );

    if !summary.top_categories.is_empty() {
        println!();
        println!("{} Top optimization types:", CHART);
        for (category, count) in &summary.top_categories {
            println!("   {} {} ({})", style("•").dim(), category, count);
        }
    }

    if !summary.most_optimized.is_empty() {
        println!();
        println!("{} Most optimized files:", CHECKMARK);
        for ranking in &summary.most_optimized {
            println!(
                "   {} {} ({} optimizations, {:.2}%)",
                style("•").dim(),
                ranking.path.display(),
                ranking.optimization_count,
                ranking.improvement_pct
            );
        }
    }

    let failed: Vec<_> = batch.file_results.iter().filter(|r| !r.success).collect();
    if !failed.is_empty() {
        println!();
        println!(
            "{} {} files failed analysis:",
            WARNING,
            style(failed.len()).red()
        );
        for result in failed {
            println!(
                "   {} {}: {}",
                style("•").dim(),
                result.file_name(),
                style(result.error.as_deref().unwrap_or("unknown error")).dim()
            );
        }
    }

    if let Some(first) = batch.file_results.iter().find(|r| r.success) {
        let delta = MemorySnapshot::delta(&first.memory_before, &first.memory_after);
        log::debug!(
            "first file snapshot delta: {} allocated",
            format_bytes_signed(delta.allocated_bytes)
        );
    }
}
