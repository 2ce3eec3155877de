//! Batch summarization
//!
//! Folds per-file results into a [`Summary`]: counts, the mean improvement
//! across files that actually had optimizations, a category histogram, and
//! the most-optimized files ranking.

use crate::model::{FileRanking, FileResult, Summary};
use std::time::Duration;

/// Maximum number of categories kept in the histogram
pub const TOP_CATEGORIES: usize = 10;

/// Maximum number of files kept in the ranking
pub const TOP_FILES: usize = 5;

/// Folds a batch's file results into a summary
pub struct Aggregator;

impl Aggregator {
    /// Summarize a slice of file results
    ///
    /// The average improvement is taken over files with at least one
    /// optimization; files without any (including failed ones) do not
    /// dilute the mean. An empty batch yields an all-zero summary.
    pub fn summarize(results: &[FileResult], elapsed: Duration) -> Summary {
        let total_files = results.len();
        let with_optimizations: Vec<&FileResult> =
            results.iter().filter(|r| r.has_optimizations()).collect();

        let total_optimizations: usize = results.iter().map(FileResult::optimization_count).sum();

        let average_improvement_pct = if with_optimizations.is_empty() {
            0.0
        } else {
            with_optimizations
                .iter()
                .map(|r| r.improvement_pct)
                .sum::<f64>()
                / with_optimizations.len() as f64
        };

        Summary {
            total_files,
            files_with_optimizations: with_optimizations.len(),
            total_optimizations,
            average_improvement_pct,
            elapsed,
            top_categories: top_categories(results),
            most_optimized: most_optimized(results),
        }
    }
}

/// Histogram of suggestion categories, most frequent first
///
/// Categories are counted in encounter order and the sort is stable, so
/// ties keep their first-seen order. At most [`TOP_CATEGORIES`] entries.
fn top_categories(results: &[FileResult]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for result in results {
        for suggestion in &result.suggestions {
            match counts.iter_mut().find(|(name, _)| *name == suggestion.category) {
                Some((_, count)) => *count += 1,
                None => counts.push((suggestion.category.clone(), 1)),
            }
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(TOP_CATEGORIES);
    counts
}

/// Files with the most optimizations, at most [`TOP_FILES`] entries
///
/// Files without any optimizations are excluded. The sort is stable, so
/// files with equal counts keep their batch order.
fn most_optimized(results: &[FileResult]) -> Vec<FileRanking> {
    let mut ranked: Vec<FileRanking> = results
        .iter()
        .filter(|r| r.has_optimizations())
        .map(|r| FileRanking {
            path: r.path.clone(),
            optimization_count: r.optimization_count(),
            improvement_pct: r.improvement_pct,
        })
        .collect();
    ranked.sort_by(|a, b| b.optimization_count.cmp(&a.optimization_count));
    ranked.truncate(TOP_FILES);
    ranked
}
