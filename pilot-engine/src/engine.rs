//! Deployment engine
//!
//! Entry points for deploying, planning and redeploying jobs. Each call runs to
//! completion on its own session; the engine itself keeps no state between
//! calls.

use chrono::{SecondsFormat, Utc};
use pilot_client::ControlPlane;
use pilot_core::domain::job::Job;
use std::sync::Arc;
use tracing::info;

use crate::config::EngineConfig;
use crate::diagnostics::FailureDiagnostics;
use crate::error::{DeployError, Result};
use crate::plan::{PlanOptions, PlanReport, render_plan};
use crate::reconcile::stamp_redeploy_marker;
use crate::session::{DeployOptions, DeployOutcome, DeploymentSession};

/// Request to roll an already running job
#[derive(Debug, Clone, Default)]
pub struct RedeployRequest {
    pub job_name: String,
    /// Task groups to roll; every group when empty
    pub groups: Vec<String>,
    pub auto_promote: bool,
}

/// Orchestrates jobs against one control plane
pub struct Engine {
    pub(crate) client: Arc<dyn ControlPlane>,
    pub(crate) config: EngineConfig,
    diagnostics: FailureDiagnostics,
}

impl Engine {
    pub fn new(client: Arc<dyn ControlPlane>, config: EngineConfig) -> Self {
        let diagnostics = FailureDiagnostics::new(
            Arc::clone(&client),
            config.id_length(),
            config.diagnostic_concurrency,
        );

        Self {
            client,
            config,
            diagnostics,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Registers a job and follows it until the scheduler reaches a terminal state
    pub async fn deploy(&self, job: Job, options: DeployOptions) -> Result<DeployOutcome> {
        self.session(job, options).run().await
    }

    /// Dry-runs a job and renders what the scheduler would do
    pub async fn plan(&self, job: &Job, options: PlanOptions) -> Result<PlanReport> {
        let response = self
            .client
            .plan_job(job, true)
            .await
            .map_err(|e| DeployError::remote("plan failed", e))?;

        let rendered = render_plan(&response, job, &options, Utc::now());

        Ok(PlanReport {
            changes_pending: response.has_pending_changes(),
            job_modify_index: response.job_modify_index,
            rendered,
        })
    }

    /// Forces a new version of a running job by stamping the redeploy marker
    /// on the requested task groups
    pub async fn redeploy(&self, request: RedeployRequest) -> Result<DeployOutcome> {
        let mut job = self.fetch_job(&request.job_name).await?;

        let stamp = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        stamp_redeploy_marker(&mut job, &request.groups, &stamp)?;

        info!(
            "redeploying job \"{}\" with marker {}",
            request.job_name, stamp
        );

        let options = DeployOptions {
            auto_promote: request.auto_promote,
            ..Default::default()
        };
        self.session(job, options).redeploy().run().await
    }

    fn session(&self, job: Job, options: DeployOptions) -> DeploymentSession<'_> {
        DeploymentSession::new(
            self.client.as_ref(),
            &self.diagnostics,
            &self.config,
            job,
            options,
        )
    }
}
