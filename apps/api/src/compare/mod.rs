//! Before/after comparison of an optimization result, section by section.

pub mod cache;
pub mod diff;
pub mod handlers;
pub mod render;

use std::sync::Arc;

use crate::compare::cache::DiffCache;
use crate::compare::diff::DiffRun;
use crate::compare::render::{build_report, ComparisonReport};
use crate::models::optimization::OptimizationResult;

/// Diffs every section (through the cache) and renders both views of each.
pub async fn compare_result(cache: &DiffCache, result: &OptimizationResult) -> ComparisonReport {
    let mut runs: Vec<Arc<[DiffRun]>> = Vec::with_capacity(result.sections.len());
    for section in &result.sections {
        runs.push(cache.runs(&section.original, &section.optimized).await);
    }
    let borrowed: Vec<&[DiffRun]> = runs.iter().map(|r| r.as_ref()).collect();
    build_report(result, &borrowed)
}
