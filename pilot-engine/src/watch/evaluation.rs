//! Evaluation watcher

use pilot_client::ControlPlane;
use pilot_core::domain::evaluation::Evaluation;
use std::time::Duration;
use tracing::{debug, error, info};

use super::BlockingQuery;
use crate::error::{DeployError, Result};
use crate::format::IdLength;
use crate::metrics::format_alloc_metrics;

/// Terminal result of an evaluation
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum EvaluationOutcome {
    /// Every allocation was placed
    Placed(Evaluation),
    /// At least one task group could not be fully placed
    PlacementFailed(Evaluation),
}

/// Polls one evaluation until the scheduler is done with it
pub(crate) struct EvaluationWatcher<'a> {
    client: &'a dyn ControlPlane,
    wait: Duration,
    ids: IdLength,
}

impl<'a> EvaluationWatcher<'a> {
    pub fn new(client: &'a dyn ControlPlane, wait: Duration, ids: IdLength) -> Self {
        Self { client, wait, ids }
    }

    pub async fn watch(&self, eval_id: &str) -> Result<EvaluationOutcome> {
        let mut query = BlockingQuery::new(self.wait);
        let short_id = self.ids.shorten(eval_id);

        loop {
            let options = query.next_options();
            let response = self
                .client
                .evaluation_info(eval_id, &options)
                .await
                .map_err(|e| DeployError::remote("failed to get eval info", e))?;

            let Some(eval) = query.accept(response).await else {
                continue;
            };

            if !eval.status.is_terminal() {
                info!("evaluation \"{}\" has status \"{}\"", short_id, eval.status);
                continue;
            }

            if eval.failed_tg_allocs.is_empty() {
                info!(
                    "evaluation \"{}\" finished with status \"{}\"",
                    short_id, eval.status
                );
                return Ok(EvaluationOutcome::Placed(eval));
            }

            error!("{}", describe_placement_failure(&eval, self.ids).join("\n"));
            if !eval.blocked_eval.is_empty() {
                error!(
                    "blocked evaluation \"{}\" waiting for additional capacity to place remainder",
                    self.ids.shorten(&eval.blocked_eval)
                );
            }
            debug!("evaluation \"{}\" settled at index {}", short_id, query.last_index());

            return Ok(EvaluationOutcome::PlacementFailed(eval));
        }
    }
}

/// Per task group breakdown of why an evaluation could not place everything
pub(crate) fn describe_placement_failure(eval: &Evaluation, ids: IdLength) -> Vec<String> {
    let mut lines = vec![format!(
        "evaluation \"{}\" finished with status \"{}\" but failed to place all allocations",
        ids.shorten(&eval.id),
        eval.status
    )];

    for (group, metric) in &eval.failed_tg_allocs {
        lines.push(format!(
            "  task group \"{}\" failed to place {} allocation(s):",
            group,
            metric.failed_allocations()
        ));
        lines.extend(format_alloc_metrics(metric, false, "    "));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedControlPlane;
    use pilot_core::domain::evaluation::{AllocationMetric, EvaluationStatus};

    fn failed_eval() -> Evaluation {
        let mut eval = Evaluation::new("9f2c1a55-1111-2222-3333-444455556666", EvaluationStatus::Complete);
        eval.failed_tg_allocs.insert(
            "cache".to_string(),
            AllocationMetric {
                nodes_evaluated: 3,
                nodes_exhausted: 3,
                coalesced_failures: 2,
                ..Default::default()
            },
        );
        eval
    }

    #[test]
    fn test_describe_counts_coalesced_failures() {
        let lines = describe_placement_failure(&failed_eval(), IdLength::Short);
        assert_eq!(
            lines,
            vec![
                "evaluation \"9f2c1a55\" finished with status \"complete\" but failed to place all allocations",
                "  task group \"cache\" failed to place 3 allocation(s):",
                "    * resources exhausted on 3 nodes",
            ]
        );
    }

    #[tokio::test]
    async fn test_watch_skips_pending_until_terminal() {
        let client = ScriptedControlPlane::new();
        client.push_evaluation(Evaluation::new("e1", EvaluationStatus::Pending));
        client.push_evaluation(Evaluation::new("e1", EvaluationStatus::Complete));

        let watcher = EvaluationWatcher::new(&client, Duration::from_millis(5), IdLength::Full);
        let outcome = watcher.watch("e1").await.unwrap();

        assert!(matches!(outcome, EvaluationOutcome::Placed(eval) if eval.id == "e1"));
        assert_eq!(client.evaluation_reads(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_watch_ignores_snapshot_with_repeated_index() {
        let client = ScriptedControlPlane::new();
        client.push_evaluation(Evaluation::new("e1", EvaluationStatus::Pending));
        client.push_stale_evaluation(failed_eval());
        client.push_evaluation(Evaluation::new("e1", EvaluationStatus::Complete));

        let watcher = EvaluationWatcher::new(&client, Duration::from_secs(10), IdLength::Full);
        let outcome = watcher.watch("e1").await.unwrap();

        assert!(matches!(outcome, EvaluationOutcome::Placed(eval) if eval.id == "e1"));
        assert_eq!(client.evaluation_reads(), 3);
    }

    #[tokio::test]
    async fn test_watch_reports_placement_failure() {
        let client = ScriptedControlPlane::new();
        client.push_evaluation(failed_eval());

        let watcher = EvaluationWatcher::new(&client, Duration::from_millis(5), IdLength::Short);
        let outcome = watcher.watch("9f2c1a55-1111-2222-3333-444455556666").await.unwrap();

        match outcome {
            EvaluationOutcome::PlacementFailed(eval) => {
                assert_eq!(eval.failed_tg_allocs["cache"].failed_allocations(), 3);
            }
            other => panic!("expected placement failure, got {other:?}"),
        }
    }
}
