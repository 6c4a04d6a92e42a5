//! Deployment session
//!
//! One session drives one job from validation to a terminal outcome. It owns
//! the job and the watch state, and is discarded afterwards.

use pilot_client::{ControlPlane, QueryOptions, RegisterOptions};
use pilot_core::domain::evaluation::Evaluation;
use pilot_core::domain::job::{Job, JobType};
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::diagnostics::FailureDiagnostics;
use crate::error::{DeployError, Result};
use crate::reconcile::{reconcile_counts, reconcile_redeploy_meta};
use crate::watch::{
    DeploymentOutcome, DeploymentWatcher, EvaluationOutcome, EvaluationWatcher, JobStatusOutcome,
    JobStatusWatcher, PromotionState,
};

/// Caller-controlled deploy flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeployOptions {
    /// Reject the registration if the remote job changed since `job_modify_index`
    pub enforce_index: bool,
    pub job_modify_index: u64,
    /// Keep the counts of the submitted job instead of the running ones
    pub use_template_count: bool,
    /// Promote healthy canaries without waiting for an operator
    pub auto_promote: bool,
}

/// How a successful deploy ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployOutcome {
    /// The deployment succeeded, or the job reached the running state
    Deployed,
    /// Canaries are healthy and wait for a manual promotion
    AwaitingPromotion,
    /// Registered a job type with no rollout to follow
    Registered,
}

pub(crate) struct DeploymentSession<'a> {
    client: &'a dyn ControlPlane,
    diagnostics: &'a FailureDiagnostics,
    config: &'a EngineConfig,
    job: Job,
    options: DeployOptions,
    is_redeploy: bool,
    deployment_id: Option<String>,
    promotion: PromotionState,
}

impl<'a> DeploymentSession<'a> {
    pub fn new(
        client: &'a dyn ControlPlane,
        diagnostics: &'a FailureDiagnostics,
        config: &'a EngineConfig,
        job: Job,
        options: DeployOptions,
    ) -> Self {
        Self {
            client,
            diagnostics,
            config,
            job,
            options,
            is_redeploy: false,
            deployment_id: None,
            promotion: PromotionState::default(),
        }
    }

    /// Marks the session as a redeploy, whose marker must not be overwritten
    /// by the remote one
    pub fn redeploy(mut self) -> Self {
        self.is_redeploy = true;
        self
    }

    pub async fn run(mut self) -> Result<DeployOutcome> {
        self.validate().await?;
        self.reconcile().await?;
        self.check_counts()?;

        let eval_id = self.register().await?;
        let evaluation = match eval_id {
            Some(eval_id) => Some(self.watch_evaluation(&eval_id).await?),
            None => None,
        };

        match self.job.job_type {
            JobType::Service => {
                self.deployment_id = evaluation
                    .map(|eval| eval.deployment_id)
                    .filter(|id| !id.is_empty());

                match self.deployment_id.clone() {
                    Some(deployment_id) => self.watch_deployment(&deployment_id).await,
                    None => {
                        info!("no deployment ID found, monitoring for running status");
                        self.wait_job_running().await
                    }
                }
            }
            JobType::Batch => self.wait_job_running().await,
            _ => Ok(DeployOutcome::Registered),
        }
    }

    async fn validate(&self) -> Result<()> {
        let response = self
            .client
            .validate_job(&self.job)
            .await
            .map_err(|e| DeployError::remote("validation failed", e))?;

        if !response.error.is_empty() {
            return Err(DeployError::Validation(response.error));
        }
        if !response.warnings.is_empty() {
            info!("job validation warnings: {}", response.warnings);
        }

        Ok(())
    }

    /// Aligns counts and the redeploy marker with the running job
    async fn reconcile(&mut self) -> Result<()> {
        let merge_counts = !self.options.use_template_count;
        let merge_marker = !self.is_redeploy;
        if !merge_counts && !merge_marker {
            return Ok(());
        }

        let remote = self.fetch_remote_job().await?;
        if merge_counts {
            reconcile_counts(&mut self.job, remote.as_ref());
        }
        if merge_marker {
            reconcile_redeploy_meta(&mut self.job, remote.as_ref());
        }

        Ok(())
    }

    /// The running job of the same identifier, if any
    async fn fetch_remote_job(&self) -> Result<Option<Job>> {
        match self
            .client
            .job_info(self.job.identifier(), &QueryOptions::default())
            .await
        {
            Ok(response) => Ok(Some(response.value)),
            Err(e) if e.is_not_found() => {
                debug!("job \"{}\" is not running yet", self.job.identifier());
                Ok(None)
            }
            Err(e) => Err(DeployError::remote("failed to get job info", e)),
        }
    }

    /// System jobs place one allocation per node and carry no count
    fn check_counts(&self) -> Result<()> {
        if self.job.job_type != JobType::System && self.job.total_count() == 0 {
            return Err(DeployError::NothingToDo);
        }
        Ok(())
    }

    /// Registers the job and returns the evaluation it created, if any
    async fn register(&self) -> Result<Option<String>> {
        info!("registering job \"{}\"", self.job.identifier());

        let options = if self.options.enforce_index {
            RegisterOptions {
                enforce_index: true,
                modify_index: self.options.job_modify_index,
            }
        } else {
            RegisterOptions::default()
        };

        let response = self
            .client
            .register_job(&self.job, options)
            .await
            .map_err(|e| DeployError::remote("job register failed", e))?;

        if !response.warnings.is_empty() {
            info!("job registration warnings: {}", response.warnings);
        }

        Ok(Some(response.eval_id).filter(|id| !id.is_empty()))
    }

    async fn watch_evaluation(&self, eval_id: &str) -> Result<Evaluation> {
        let watcher = EvaluationWatcher::new(
            self.client,
            self.config.eval_wait,
            self.config.id_length(),
        );

        match watcher.watch(eval_id).await? {
            EvaluationOutcome::Placed(eval) => Ok(eval),
            EvaluationOutcome::PlacementFailed(_) => Err(DeployError::manual(
                "abandoning deployment due to failed/blocked evaluation(s)",
            )),
        }
    }

    async fn watch_deployment(&mut self, deployment_id: &str) -> Result<DeployOutcome> {
        info!(
            "monitoring deployment \"{}\"",
            self.config.id_length().shorten(deployment_id)
        );

        let watcher = DeploymentWatcher::new(
            self.client,
            self.diagnostics,
            self.config.deployment_wait,
            self.config.id_length(),
            self.options.auto_promote,
        );

        match watcher.watch(deployment_id, &mut self.promotion).await? {
            DeploymentOutcome::Successful => Ok(DeployOutcome::Deployed),
            DeploymentOutcome::AwaitingPromotion => Ok(DeployOutcome::AwaitingPromotion),
            DeploymentOutcome::Failed(_) => {
                Err(DeployError::manual("abandoning unsuccessful deployment"))
            }
        }
    }

    async fn wait_job_running(&self) -> Result<DeployOutcome> {
        let watcher = JobStatusWatcher::new(self.client, self.config.job_wait);

        match watcher.wait_running(self.job.identifier()).await? {
            JobStatusOutcome::Running => Ok(DeployOutcome::Deployed),
            JobStatusOutcome::Stopped(status) => Err(DeployError::manual(format!(
                "job \"{}\" has status \"{}\"",
                self.job.identifier(),
                status
            ))),
        }
    }
}
