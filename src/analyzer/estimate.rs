//! Synthetic memory-improvement estimation policy
//!
//! No compiled before/after comparison is performed: each suggestion
//! category maps to a fixed assumed fractional saving, the fractions are
//! summed, and the total is capped. This is a labeled heuristic, not a
//! measurement, and it feeds the synthetic "after" snapshot in
//! [`crate::analyzer::runner`].

use crate::model::Suggestion;

/// Ceiling on the summed estimate
pub const MAX_ESTIMATED_SAVING: f64 = 0.50;

/// Fixed assumed saving for one suggestion, keyed by category keyword
fn saving_for_category(category: &str) -> f64 {
    let category = category.to_ascii_lowercase();
    if category.contains("string") {
        0.15
    } else if category.contains("collection") {
        0.20
    } else if category.contains("boxing") {
        0.10
    } else if category.contains("disposal") {
        0.05
    } else if category.contains("linq") {
        0.12
    } else if category.contains("lazy") {
        0.08
    } else {
        0.05
    }
}

/// Estimate the fractional memory saving for a suggestion set.
///
/// Per-category fractions are summed and capped at
/// [`MAX_ESTIMATED_SAVING`]; an empty set estimates zero.
pub fn estimated_saving(suggestions: &[Suggestion]) -> f64 {
    let total: f64 = suggestions
        .iter()
        .map(|s| saving_for_category(&s.category))
        .sum();
    total.min(MAX_ESTIMATED_SAVING)
}
