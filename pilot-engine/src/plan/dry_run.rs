//! Scheduler dry-run summary

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use colored::Color;
use pilot_core::domain::job::{Job, JobType};
use pilot_core::dto::job::JobPlanResponse;

use super::palette::Palette;
use crate::format::{format_nanos, format_time, format_time_difference};
use crate::metrics::format_alloc_metrics;

const TRIGGER_ROLLING_UPDATE: &str = "rolling-update";

/// Explains whether every allocation of the plan could be placed, when the
/// next rolling-update evaluation runs, and when a periodic job launches next
pub(crate) fn render_dry_run(
    response: &JobPlanResponse,
    job: &Job,
    palette: Palette,
    now: DateTime<Utc>,
) -> String {
    let rolling = response
        .created_evals
        .iter()
        .rev()
        .find(|eval| eval.triggered_by == TRIGGER_ROLLING_UPDATE);

    let mut out = String::new();
    if response.failed_tg_allocs.is_empty() {
        out.push_str(&palette.paint_bold("- All tasks successfully allocated.", Color::Green));
        out.push('\n');
    } else {
        let header = if job.job_type == JobType::System {
            "- WARNING: Failed to place allocations on all nodes."
        } else {
            "- WARNING: Failed to place all allocations."
        };
        out.push_str(&palette.paint_bold(header, Color::Yellow));
        out.push('\n');

        for (group, metric) in &response.failed_tg_allocs {
            let noun = if metric.coalesced_failures > 0 {
                "allocations"
            } else {
                "allocation"
            };
            let title = format!(
                "Task Group {:?} (failed to place {} {}):",
                group,
                metric.failed_allocations(),
                noun
            );
            out.push_str(&format!("  {}\n", palette.paint(&title, Color::Yellow)));

            let lines = format_alloc_metrics(metric, false, "    ").join("\n");
            out.push_str(&palette.paint(&lines, Color::Yellow));
            out.push_str("\n\n");
        }

        if rolling.is_none() {
            out.pop();
        }
    }

    if let Some(eval) = rolling {
        let line = format!(
            "- Rolling update, next evaluation will be in {}.",
            format_nanos(eval.wait)
        );
        out.push_str(&palette.paint(&line, Color::Green));
        out.push('\n');
    }

    let next_launch = response
        .next_periodic_launch
        .filter(|next| next.timestamp() >= 1 && !job.is_parameterized());
    if let Some(next) = next_launch {
        match periodic_time_zone(job) {
            Ok(_) => {
                let line = format!(
                    "- If submitted now, next periodic launch would be at {} ({} from now).",
                    format_time(next),
                    format_time_difference(now, next)
                );
                out.push_str(&palette.paint(&line, Color::Green));
            }
            Err(err) => {
                let line = format!("- Invalid time zone: {}", err);
                out.push_str(&palette.paint(&line, Color::Yellow));
            }
        }
        out.push('\n');
    }

    if out.ends_with('\n') {
        out.pop();
    }
    out
}

/// Time zone the periodic schedule is evaluated in; UTC when unset
fn periodic_time_zone(job: &Job) -> Result<Tz, String> {
    match job.periodic.as_ref().map(|p| p.time_zone.as_str()) {
        None | Some("") => Ok(Tz::UTC),
        Some(name) => name.parse::<Tz>().map_err(|e| e.to_string()),
    }
}
