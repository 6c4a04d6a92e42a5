//! Plan rendering
//!
//! Turns the scheduler's dry-run response into the report shown before a job
//! is submitted: the annotated diff, the placement summary, job warnings and
//! the modify index to enforce on a following registration.

mod diff;
mod dry_run;
mod palette;

pub use palette::Palette;

use chrono::{DateTime, Utc};
use colored::Color;
use pilot_core::domain::job::Job;
use pilot_core::dto::job::JobPlanResponse;

use diff::DiffRenderer;
use dry_run::render_dry_run;

/// Rendering switches for a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanOptions {
    /// Expand added and deleted groups and tasks
    pub verbose: bool,
    /// Include the job diff
    pub show_diff: bool,
    pub no_color: bool,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            verbose: false,
            show_diff: true,
            no_color: false,
        }
    }
}

/// Outcome of a plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanReport {
    /// Whether submitting the job would stop, place, migrate, destructively
    /// update or canary any allocation
    pub changes_pending: bool,
    /// Index to enforce when registering the planned job
    pub job_modify_index: u64,
    pub rendered: String,
}

/// Renders the full plan report
pub fn render_plan(
    response: &JobPlanResponse,
    job: &Job,
    options: &PlanOptions,
    now: DateTime<Utc>,
) -> String {
    let palette = Palette::new(!options.no_color);
    let mut out = String::new();

    if let Some(diff) = response.diff.as_ref().filter(|_| options.show_diff) {
        let rendered = DiffRenderer::new(palette, options.verbose).job(diff);
        out.push_str(rendered.trim());
        out.push_str("\n\n");
    }

    out.push_str(&palette.bold("Scheduler dry-run:"));
    out.push('\n');
    out.push_str(&render_dry_run(response, job, palette, now));
    out.push_str("\n\n");

    if !response.warnings.is_empty() {
        let warnings = format!("Job Warnings:\n{}", response.warnings);
        out.push_str(&palette.paint_bold(&warnings, Color::Yellow));
        out.push_str("\n\n");
    }

    out.push_str(&palette.bold(&format!("Job Modify Index: {}", response.job_modify_index)));
    out
}
