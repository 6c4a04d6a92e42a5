//! Control-plane abstraction
//!
//! The orchestration engine talks to the scheduler only through
//! [`ControlPlane`], so it can be driven by [`NomadClient`](crate::NomadClient)
//! in production and by scripted doubles in tests.

use async_trait::async_trait;
use pilot_core::domain::allocation::Allocation;
use pilot_core::domain::deployment::Deployment;
use pilot_core::domain::evaluation::Evaluation;
use pilot_core::domain::job::{Job, JobListStub};
use pilot_core::domain::node::{AgentSelf, NodeListStub};
use pilot_core::dto::deployment::DeploymentUpdateResponse;
use pilot_core::dto::job::{
    JobDeregisterResponse, JobEvaluateResponse, JobPlanResponse, JobRegisterResponse,
    JobValidateResponse,
};
use pilot_core::dto::node::NodeDrainUpdateResponse;
use std::time::Duration;

use crate::NomadClient;
use crate::error::Result;

/// Blocking-query options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// Return only once the server index exceeds this value (0 = return immediately)
    pub wait_index: u64,
    /// Upper bound the server holds the request open
    pub wait_time: Option<Duration>,
}

impl QueryOptions {
    pub fn blocking(wait_index: u64, wait_time: Duration) -> Self {
        Self {
            wait_index,
            wait_time: Some(wait_time),
        }
    }
}

/// Metadata returned alongside a blocking read
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryMeta {
    /// Index of the state the response reflects
    pub last_index: u64,
}

/// A value read through a blocking query
#[derive(Debug, Clone)]
pub struct QueryResponse<T> {
    pub value: T,
    pub meta: QueryMeta,
}

/// Registration options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegisterOptions {
    /// Reject the registration if the remote modify index differs from `modify_index`
    pub enforce_index: bool,
    pub modify_index: u64,
}

/// Operations the orchestration engine needs from the scheduler
#[async_trait]
pub trait ControlPlane: Send + Sync {
    /// Converts an HCL job file into a job
    async fn parse_job(&self, hcl: &str) -> Result<Job>;

    /// Validates a job without registering it
    async fn validate_job(&self, job: &Job) -> Result<JobValidateResponse>;

    /// Dry-runs a job registration
    async fn plan_job(&self, job: &Job, diff: bool) -> Result<JobPlanResponse>;

    /// Registers (creates or updates) a job
    async fn register_job(&self, job: &Job, options: RegisterOptions)
    -> Result<JobRegisterResponse>;

    /// Reads a job by ID
    async fn job_info(&self, job_id: &str, options: &QueryOptions) -> Result<QueryResponse<Job>>;

    /// Stops a job, optionally purging it
    async fn deregister_job(&self, job_id: &str, purge: bool) -> Result<JobDeregisterResponse>;

    /// Reads an evaluation by ID
    async fn evaluation_info(
        &self,
        eval_id: &str,
        options: &QueryOptions,
    ) -> Result<QueryResponse<Evaluation>>;

    /// Reads a deployment by ID
    async fn deployment_info(
        &self,
        deployment_id: &str,
        options: &QueryOptions,
    ) -> Result<QueryResponse<Deployment>>;

    /// Promotes every canary of a deployment
    async fn promote_deployment_all(&self, deployment_id: &str)
    -> Result<DeploymentUpdateResponse>;

    /// Lists the allocations created by a deployment
    async fn deployment_allocations(&self, deployment_id: &str) -> Result<Vec<Allocation>>;

    /// Reads a full allocation by ID
    async fn allocation_info(&self, alloc_id: &str) -> Result<Allocation>;

    /// Lists every job
    async fn list_jobs(&self) -> Result<Vec<JobListStub>>;

    /// Creates a new evaluation for a job
    async fn force_evaluate(&self, job_id: &str) -> Result<JobEvaluateResponse>;

    /// Lists every client node
    async fn list_nodes(&self) -> Result<Vec<NodeListStub>>;

    /// Reads the allocations placed on a node
    async fn node_allocations(
        &self,
        node_id: &str,
        options: &QueryOptions,
    ) -> Result<QueryResponse<Vec<Allocation>>>;

    /// Starts or stops draining a node
    async fn toggle_drain(&self, node_id: &str, enable: bool) -> Result<NodeDrainUpdateResponse>;

    /// Describes the agent the client talks to
    async fn agent_self(&self) -> Result<AgentSelf>;

    /// Forces a cluster garbage collection
    async fn garbage_collect(&self) -> Result<()>;
}

#[async_trait]
impl ControlPlane for NomadClient {
    async fn parse_job(&self, hcl: &str) -> Result<Job> {
        NomadClient::parse_job(self, hcl).await
    }

    async fn validate_job(&self, job: &Job) -> Result<JobValidateResponse> {
        NomadClient::validate_job(self, job).await
    }

    async fn plan_job(&self, job: &Job, diff: bool) -> Result<JobPlanResponse> {
        NomadClient::plan_job(self, job, diff).await
    }

    async fn register_job(
        &self,
        job: &Job,
        options: RegisterOptions,
    ) -> Result<JobRegisterResponse> {
        NomadClient::register_job(self, job, options).await
    }

    async fn job_info(&self, job_id: &str, options: &QueryOptions) -> Result<QueryResponse<Job>> {
        NomadClient::job_info(self, job_id, options).await
    }

    async fn deregister_job(&self, job_id: &str, purge: bool) -> Result<JobDeregisterResponse> {
        NomadClient::deregister_job(self, job_id, purge).await
    }

    async fn evaluation_info(
        &self,
        eval_id: &str,
        options: &QueryOptions,
    ) -> Result<QueryResponse<Evaluation>> {
        NomadClient::evaluation_info(self, eval_id, options).await
    }

    async fn deployment_info(
        &self,
        deployment_id: &str,
        options: &QueryOptions,
    ) -> Result<QueryResponse<Deployment>> {
        NomadClient::deployment_info(self, deployment_id, options).await
    }

    async fn promote_deployment_all(
        &self,
        deployment_id: &str,
    ) -> Result<DeploymentUpdateResponse> {
        NomadClient::promote_deployment_all(self, deployment_id).await
    }

    async fn deployment_allocations(&self, deployment_id: &str) -> Result<Vec<Allocation>> {
        NomadClient::deployment_allocations(self, deployment_id).await
    }

    async fn allocation_info(&self, alloc_id: &str) -> Result<Allocation> {
        NomadClient::allocation_info(self, alloc_id).await
    }

    async fn list_jobs(&self) -> Result<Vec<JobListStub>> {
        NomadClient::list_jobs(self).await
    }

    async fn force_evaluate(&self, job_id: &str) -> Result<JobEvaluateResponse> {
        NomadClient::force_evaluate(self, job_id).await
    }

    async fn list_nodes(&self) -> Result<Vec<NodeListStub>> {
        NomadClient::list_nodes(self).await
    }

    async fn node_allocations(
        &self,
        node_id: &str,
        options: &QueryOptions,
    ) -> Result<QueryResponse<Vec<Allocation>>> {
        NomadClient::node_allocations(self, node_id, options).await
    }

    async fn toggle_drain(&self, node_id: &str, enable: bool) -> Result<NodeDrainUpdateResponse> {
        NomadClient::toggle_drain(self, node_id, enable).await
    }

    async fn agent_self(&self) -> Result<AgentSelf> {
        NomadClient::agent_self(self).await
    }

    async fn garbage_collect(&self) -> Result<()> {
        NomadClient::garbage_collect(self).await
    }
}
