//! Job-related API endpoints

use pilot_core::domain::job::{Job, JobListStub};
use pilot_core::dto::job::{
    EvalOptions, JobDeregisterResponse, JobEvaluateRequest, JobEvaluateResponse, JobPlanResponse,
    JobRegisterResponse, JobValidateResponse, ParseJobRequest, PlanJobRequest, RegisterJobRequest,
    ValidateJobRequest,
};
use reqwest::Method;
use tracing::debug;

use crate::NomadClient;
use crate::control_plane::{QueryOptions, QueryResponse, RegisterOptions};
use crate::error::Result;

impl NomadClient {
    // =============================================================================
    // Job Specification
    // =============================================================================

    /// Convert an HCL job file into a job
    ///
    /// # Arguments
    /// * `hcl` - The HCL source of the job file
    ///
    /// # Returns
    /// The canonicalized job
    pub async fn parse_job(&self, hcl: &str) -> Result<Job> {
        let response = self
            .request(Method::POST, &["v1", "jobs", "parse"])?
            .json(&ParseJobRequest {
                job_hcl: hcl.to_string(),
                canonicalize: true,
            })
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Validate a job without registering it
    ///
    /// A valid job yields a response with an empty `error`.
    pub async fn validate_job(&self, job: &Job) -> Result<JobValidateResponse> {
        let response = self
            .request(Method::POST, &["v1", "validate", "job"])?
            .json(&ValidateJobRequest { job })
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Dry-run a job registration
    ///
    /// # Arguments
    /// * `job` - The job to plan
    /// * `diff` - Whether to include a structured diff against the running job
    pub async fn plan_job(&self, job: &Job, diff: bool) -> Result<JobPlanResponse> {
        let response = self
            .request(Method::POST, &["v1", "job", job.identifier(), "plan"])?
            .json(&PlanJobRequest {
                job,
                diff,
                policy_override: false,
            })
            .send()
            .await?;

        self.handle_response(response).await
    }

    // =============================================================================
    // Job Lifecycle
    // =============================================================================

    /// Register (create or update) a job
    ///
    /// # Arguments
    /// * `job` - The job to register
    /// * `options` - Index enforcement guard
    ///
    /// # Returns
    /// The registration result, including the evaluation it triggered
    pub async fn register_job(
        &self,
        job: &Job,
        options: RegisterOptions,
    ) -> Result<JobRegisterResponse> {
        debug!(
            "registering job {} (enforce_index: {}, modify_index: {})",
            job.identifier(),
            options.enforce_index,
            options.modify_index
        );

        let response = self
            .request(Method::POST, &["v1", "jobs"])?
            .json(&RegisterJobRequest {
                job,
                enforce_index: options.enforce_index,
                job_modify_index: options.modify_index,
            })
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Get a job by ID
    ///
    /// A missing job surfaces as an error for which `is_not_found()` holds.
    pub async fn job_info(&self, job_id: &str, options: &QueryOptions) -> Result<QueryResponse<Job>> {
        let response = self.query(&["v1", "job", job_id], options)?.send().await?;

        self.handle_query_response(response).await
    }

    /// Stop a job
    ///
    /// # Arguments
    /// * `job_id` - The job ID
    /// * `purge` - Also remove the job from the scheduler's state
    pub async fn deregister_job(&self, job_id: &str, purge: bool) -> Result<JobDeregisterResponse> {
        let response = self
            .request(Method::DELETE, &["v1", "job", job_id])?
            .query(&[("purge", purge)])
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// List every job visible in the client's namespace
    pub async fn list_jobs(&self) -> Result<Vec<JobListStub>> {
        let response = self.request(Method::GET, &["v1", "jobs"])?.send().await?;

        self.handle_response(response).await
    }

    /// Force the scheduler to evaluate a job again
    ///
    /// # Returns
    /// The ID of the evaluation that was created
    pub async fn force_evaluate(&self, job_id: &str) -> Result<JobEvaluateResponse> {
        let response = self
            .request(Method::POST, &["v1", "job", job_id, "evaluate"])?
            .json(&JobEvaluateRequest {
                job_id: job_id.to_string(),
                eval_options: EvalOptions::default(),
            })
            .send()
            .await?;

        self.handle_response(response).await
    }
}
