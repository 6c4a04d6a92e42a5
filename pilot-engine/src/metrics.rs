//! Placement metric explanations
//!
//! Shared by the evaluation watcher and the plan dry-run summary.

use pilot_core::domain::evaluation::AllocationMetric;

/// Explains why allocations of a task group could not be placed, one line
/// per obstacle, each prefixed with `prefix`
pub fn format_alloc_metrics(metric: &AllocationMetric, scores: bool, prefix: &str) -> Vec<String> {
    let mut out = Vec::new();

    if metric.nodes_evaluated == 0 {
        out.push(format!("{prefix}* no nodes were eligible for evaluation"));
    }

    for (dc, available) in &metric.nodes_available {
        if *available == 0 {
            out.push(format!("{prefix}* no nodes are available in datacenter {dc:?}"));
        }
    }

    for (class, count) in &metric.class_filtered {
        out.push(format!("{prefix}* class {class:?} filtered {count} nodes"));
    }
    for (constraint, count) in &metric.constraint_filtered {
        out.push(format!("{prefix}* constraint {constraint:?} filtered {count} nodes"));
    }

    if metric.nodes_exhausted > 0 {
        out.push(format!(
            "{prefix}* resources exhausted on {} nodes",
            metric.nodes_exhausted
        ));
    }
    for (class, count) in &metric.class_exhausted {
        out.push(format!("{prefix}* class {class:?} exhausted on {count} nodes"));
    }
    for (dimension, count) in &metric.dimension_exhausted {
        out.push(format!("{prefix}* dimension {dimension:?} exhausted on {count} nodes"));
    }

    for dimension in &metric.quota_exhausted {
        out.push(format!("{prefix}* quota limit hit {dimension:?}"));
    }

    if scores {
        for (name, score) in &metric.scores {
            out.push(format!("{prefix}* score {name:?} = {score:.6}"));
        }
    }

    out
}
