//! Deployment watcher
//!
//! Follows a deployment to a terminal state and decides when its canaries are
//! healthy enough to promote.

use pilot_client::ControlPlane;
use pilot_core::domain::deployment::{Deployment, DeploymentStatus};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, error, info};

use super::BlockingQuery;
use crate::diagnostics::FailureDiagnostics;
use crate::error::{DeployError, Result};
use crate::format::IdLength;

/// Canary bookkeeping carried by a session across polls
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct PromotionState {
    /// Some group reached its canary target; sticky once set
    pub needs_promotion: bool,
    /// A promote-all call has been issued
    pub promoted: bool,
}

/// Terminal result of a deployment watch
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DeploymentOutcome {
    Successful,
    /// Canaries are healthy and auto-promotion is off
    AwaitingPromotion,
    Failed(DeploymentStatus),
}

/// Group-level health tally of one deployment snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct GroupHealth {
    pub healthy: usize,
    pub total: usize,
}

impl GroupHealth {
    pub fn all_healthy(&self) -> bool {
        self.healthy == self.total
    }
}

/// Classifies every task group of a running deployment
///
/// A group without canaries is healthy once all desired allocations are.
/// A group with canaries is healthy once every canary is, which also marks
/// the deployment as needing promotion. Unhealthy allocations are reported
/// but left to the scheduler.
pub(crate) fn assess(deployment: &Deployment, promotion: &mut PromotionState) -> GroupHealth {
    let mut healthy = 0;

    for (name, state) in &deployment.task_groups {
        debug!(
            "group {}: {} desired canaries, {} healthy allocs, {} desired total",
            name, state.desired_canaries, state.healthy_allocs, state.desired_total
        );

        if state.desired_canaries == 0 && state.healthy_allocs == state.desired_total {
            healthy += 1;
        } else if state.desired_canaries > 0 && state.healthy_allocs == state.desired_canaries {
            healthy += 1;
            promotion.needs_promotion = true;
        } else if state.unhealthy_allocs > 0 {
            error!(
                "group \"{}\" has {} unhealthy allocations",
                name, state.unhealthy_allocs
            );
        }
    }

    GroupHealth {
        healthy,
        total: deployment.task_groups.len(),
    }
}

/// Polls one deployment until it succeeds, fails, or waits on a manual promotion
pub(crate) struct DeploymentWatcher<'a> {
    client: &'a dyn ControlPlane,
    diagnostics: &'a FailureDiagnostics,
    wait: Duration,
    ids: IdLength,
    auto_promote: bool,
}

impl<'a> DeploymentWatcher<'a> {
    pub fn new(
        client: &'a dyn ControlPlane,
        diagnostics: &'a FailureDiagnostics,
        wait: Duration,
        ids: IdLength,
        auto_promote: bool,
    ) -> Self {
        Self {
            client,
            diagnostics,
            wait,
            ids,
            auto_promote,
        }
    }

    pub async fn watch(
        &self,
        deployment_id: &str,
        promotion: &mut PromotionState,
    ) -> Result<DeploymentOutcome> {
        let started = Instant::now();
        let mut query = BlockingQuery::new(self.wait);
        let short_id = self.ids.shorten(deployment_id);

        loop {
            let options = query.next_options();
            let response = self
                .client
                .deployment_info(deployment_id, &options)
                .await
                .map_err(|e| DeployError::remote("failed to get deployment", e))?;

            let Some(deployment) = query.accept(response).await else {
                continue;
            };

            match &deployment.status {
                DeploymentStatus::Successful => {
                    info!(
                        "deployment \"{}\" completed with status \"{}\"",
                        short_id, deployment.status
                    );
                    return Ok(DeploymentOutcome::Successful);
                }
                DeploymentStatus::Running => {
                    debug!(
                        "deployment \"{}\" has been running for {:.1}s",
                        short_id,
                        started.elapsed().as_secs_f64()
                    );

                    if promotion.promoted {
                        continue;
                    }

                    let health = assess(&deployment, promotion);
                    if !health.all_healthy() || !promotion.needs_promotion {
                        continue;
                    }

                    if !self.auto_promote {
                        info!(
                            "deployment \"{}\" has healthy canaries but must be manually promoted",
                            short_id
                        );
                        return Ok(DeploymentOutcome::AwaitingPromotion);
                    }

                    info!(
                        "deployment \"{}\" has healthy canaries - attempting auto-promotion",
                        short_id
                    );
                    self.client
                        .promote_deployment_all(deployment_id)
                        .await
                        .map_err(|e| DeployError::remote("promotion failed", e))?;
                    promotion.promoted = true;
                }
                status => {
                    error!("deployment \"{}\" has status \"{}\"", short_id, status);
                    self.diagnostics.report(deployment_id).await;
                    return Ok(DeploymentOutcome::Failed(status.clone()));
                }
            }
        }
    }
}
