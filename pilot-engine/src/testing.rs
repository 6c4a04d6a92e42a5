//! Scripted control plane for engine tests
//!
//! Blocking reads pop queued snapshots and report a fresh index, unless the
//! snapshot was queued as stale, in which case the previous index is repeated.
//! Running out of snapshots is an error, so a watcher that polls more often
//! than a test expects fails instead of hanging.

use async_trait::async_trait;
use pilot_client::{
    ClientError, ControlPlane, QueryMeta, QueryOptions, QueryResponse, RegisterOptions, Result,
};
use pilot_core::domain::allocation::{Allocation, TaskEvent, TaskState};
use pilot_core::domain::deployment::{Deployment, DeploymentState, DeploymentStatus};
use pilot_core::domain::evaluation::Evaluation;
use pilot_core::domain::job::{Job, JobListStub, JobType, TaskGroup};
use pilot_core::domain::node::{AgentSelf, NodeListStub};
use pilot_core::dto::deployment::DeploymentUpdateResponse;
use pilot_core::dto::job::{
    JobDeregisterResponse, JobEvaluateResponse, JobPlanResponse, JobRegisterResponse,
    JobValidateResponse,
};
use pilot_core::dto::node::NodeDrainUpdateResponse;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::sync::Mutex;

#[derive(Default)]
struct Script {
    validation_error: String,
    parsed_job: Option<Job>,
    remote_job: Option<Job>,
    register_eval_id: String,
    plan: JobPlanResponse,
    job_statuses: VecDeque<String>,
    evaluations: VecDeque<(Evaluation, bool)>,
    deployments: VecDeque<(Deployment, bool)>,
    deployment_allocations: Vec<Allocation>,
    allocations: BTreeMap<String, Allocation>,
    jobs: Vec<JobListStub>,
    unevaluable_jobs: BTreeSet<String>,
    nodes: Vec<NodeListStub>,
    node_allocations: VecDeque<(Vec<Allocation>, bool)>,
    agent_node_id: Option<String>,
    index: u64,

    registrations: Vec<(Job, RegisterOptions)>,
    promotions: Vec<String>,
    deregistrations: Vec<(String, bool)>,
    evaluation_reads: usize,
    deployment_reads: usize,
    parse_calls: usize,
    forced_evaluations: Vec<String>,
    node_allocation_reads: usize,
    drain_toggles: Vec<(String, bool)>,
    gc_calls: usize,
}

impl Script {
    fn next_meta(&mut self) -> QueryMeta {
        self.index += 1;
        QueryMeta {
            last_index: self.index,
        }
    }

    /// Meta for a snapshot served with the index already handed out
    fn meta(&mut self, stale: bool) -> QueryMeta {
        if stale {
            QueryMeta {
                last_index: self.index,
            }
        } else {
            self.next_meta()
        }
    }
}

#[derive(Default)]
pub(crate) struct ScriptedControlPlane {
    script: Mutex<Script>,
}

impl ScriptedControlPlane {
    pub fn new() -> Self {
        Self::default()
    }

    /// Job returned by non-blocking job reads
    pub fn with_remote_job(self, job: Job) -> Self {
        self.script.lock().unwrap().remote_job = Some(job);
        self
    }

    pub fn set_validation_error(&self, error: &str) {
        self.script.lock().unwrap().validation_error = error.to_string();
    }

    pub fn set_parsed_job(&self, job: Job) {
        self.script.lock().unwrap().parsed_job = Some(job);
    }

    pub fn set_register_eval(&self, eval_id: &str) {
        self.script.lock().unwrap().register_eval_id = eval_id.to_string();
    }

    pub fn set_plan(&self, plan: JobPlanResponse) {
        self.script.lock().unwrap().plan = plan;
    }

    /// Status returned by the next blocking job read
    pub fn push_job_status(&self, status: &str) {
        self.script
            .lock()
            .unwrap()
            .job_statuses
            .push_back(status.to_string());
    }

    pub fn push_evaluation(&self, eval: Evaluation) {
        self.script.lock().unwrap().evaluations.push_back((eval, false));
    }

    /// Evaluation served with the previous index, as a watcher must ignore it
    pub fn push_stale_evaluation(&self, eval: Evaluation) {
        self.script.lock().unwrap().evaluations.push_back((eval, true));
    }

    pub fn push_deployment(&self, deployment: Deployment) {
        self.script
            .lock()
            .unwrap()
            .deployments
            .push_back((deployment, false));
    }

    /// Deployment served with the previous index, as a watcher must ignore it
    pub fn push_stale_deployment(&self, deployment: Deployment) {
        self.script
            .lock()
            .unwrap()
            .deployments
            .push_back((deployment, true));
    }

    pub fn set_deployment_allocations(&self, allocations: Vec<Allocation>) {
        self.script.lock().unwrap().deployment_allocations = allocations;
    }

    pub fn add_allocation(&self, allocation: Allocation) {
        self.script
            .lock()
            .unwrap()
            .allocations
            .insert(allocation.id.clone(), allocation);
    }

    pub fn set_jobs(&self, jobs: &[&str]) {
        self.script.lock().unwrap().jobs = jobs
            .iter()
            .map(|id| JobListStub {
                id: id.to_string(),
                name: id.to_string(),
                ..Default::default()
            })
            .collect();
    }

    /// Forced evaluations of this job fail with a 404
    pub fn reject_evaluation(&self, job_id: &str) {
        self.script
            .lock()
            .unwrap()
            .unevaluable_jobs
            .insert(job_id.to_string());
    }

    /// Nodes from `(id, name)` pairs
    pub fn set_nodes(&self, nodes: &[(&str, &str)]) {
        self.script.lock().unwrap().nodes = nodes
            .iter()
            .map(|(id, name)| NodeListStub {
                id: id.to_string(),
                name: name.to_string(),
                ..Default::default()
            })
            .collect();
    }

    pub fn set_agent_node_id(&self, node_id: &str) {
        self.script.lock().unwrap().agent_node_id = Some(node_id.to_string());
    }

    pub fn push_node_allocations(&self, allocations: Vec<Allocation>) {
        self.script
            .lock()
            .unwrap()
            .node_allocations
            .push_back((allocations, false));
    }

    /// Node allocations served with the previous index
    pub fn push_stale_node_allocations(&self, allocations: Vec<Allocation>) {
        self.script
            .lock()
            .unwrap()
            .node_allocations
            .push_back((allocations, true));
    }

    pub fn forced_evaluations(&self) -> Vec<String> {
        self.script.lock().unwrap().forced_evaluations.clone()
    }

    pub fn node_allocation_reads(&self) -> usize {
        self.script.lock().unwrap().node_allocation_reads
    }

    pub fn drain_toggles(&self) -> Vec<(String, bool)> {
        self.script.lock().unwrap().drain_toggles.clone()
    }

    pub fn gc_calls(&self) -> usize {
        self.script.lock().unwrap().gc_calls
    }

    pub fn registrations(&self) -> Vec<(Job, RegisterOptions)> {
        self.script.lock().unwrap().registrations.clone()
    }

    pub fn promotions(&self) -> Vec<String> {
        self.script.lock().unwrap().promotions.clone()
    }

    pub fn deregistrations(&self) -> Vec<(String, bool)> {
        self.script.lock().unwrap().deregistrations.clone()
    }

    pub fn evaluation_reads(&self) -> usize {
        self.script.lock().unwrap().evaluation_reads
    }

    pub fn deployment_reads(&self) -> usize {
        self.script.lock().unwrap().deployment_reads
    }

    pub fn parse_calls(&self) -> usize {
        self.script.lock().unwrap().parse_calls
    }
}

fn exhausted(what: &str) -> ClientError {
    ClientError::api_error(500, format!("no scripted {what} left"))
}

fn not_found(what: &str, id: &str) -> ClientError {
    ClientError::api_error(404, format!("{what} {id} not found"))
}

#[async_trait]
impl ControlPlane for ScriptedControlPlane {
    async fn parse_job(&self, _hcl: &str) -> Result<Job> {
        let mut script = self.script.lock().unwrap();
        script.parse_calls += 1;
        script
            .parsed_job
            .clone()
            .ok_or_else(|| ClientError::api_error(400, "unable to parse job"))
    }

    async fn validate_job(&self, _job: &Job) -> Result<JobValidateResponse> {
        let script = self.script.lock().unwrap();
        Ok(JobValidateResponse {
            error: script.validation_error.clone(),
            ..Default::default()
        })
    }

    async fn plan_job(&self, _job: &Job, _diff: bool) -> Result<JobPlanResponse> {
        Ok(self.script.lock().unwrap().plan.clone())
    }

    async fn register_job(
        &self,
        job: &Job,
        options: RegisterOptions,
    ) -> Result<JobRegisterResponse> {
        let mut script = self.script.lock().unwrap();
        script.registrations.push((job.clone(), options));
        let meta = script.next_meta();
        Ok(JobRegisterResponse {
            eval_id: script.register_eval_id.clone(),
            job_modify_index: meta.last_index,
            ..Default::default()
        })
    }

    async fn job_info(&self, job_id: &str, options: &QueryOptions) -> Result<QueryResponse<Job>> {
        let mut script = self.script.lock().unwrap();

        if options.wait_time.is_none() {
            let job = script
                .remote_job
                .clone()
                .ok_or_else(|| not_found("job", job_id))?;
            let meta = script.next_meta();
            return Ok(QueryResponse { value: job, meta });
        }

        let status = script
            .job_statuses
            .pop_front()
            .ok_or_else(|| exhausted("job status"))?;
        let mut job = script.remote_job.clone().unwrap_or_else(|| Job {
            id: Some(job_id.to_string()),
            name: job_id.to_string(),
            ..Default::default()
        });
        job.status = Some(status);
        let meta = script.next_meta();
        Ok(QueryResponse { value: job, meta })
    }

    async fn deregister_job(&self, job_id: &str, purge: bool) -> Result<JobDeregisterResponse> {
        let mut script = self.script.lock().unwrap();
        script.deregistrations.push((job_id.to_string(), purge));
        Ok(JobDeregisterResponse::default())
    }

    async fn evaluation_info(
        &self,
        _eval_id: &str,
        _options: &QueryOptions,
    ) -> Result<QueryResponse<Evaluation>> {
        let mut script = self.script.lock().unwrap();
        script.evaluation_reads += 1;
        let (value, stale) = script
            .evaluations
            .pop_front()
            .ok_or_else(|| exhausted("evaluation"))?;
        let meta = script.meta(stale);
        Ok(QueryResponse { value, meta })
    }

    async fn deployment_info(
        &self,
        _deployment_id: &str,
        _options: &QueryOptions,
    ) -> Result<QueryResponse<Deployment>> {
        let mut script = self.script.lock().unwrap();
        script.deployment_reads += 1;
        let (value, stale) = script
            .deployments
            .pop_front()
            .ok_or_else(|| exhausted("deployment"))?;
        let meta = script.meta(stale);
        Ok(QueryResponse { value, meta })
    }

    async fn promote_deployment_all(
        &self,
        deployment_id: &str,
    ) -> Result<DeploymentUpdateResponse> {
        let mut script = self.script.lock().unwrap();
        script.promotions.push(deployment_id.to_string());
        Ok(DeploymentUpdateResponse::default())
    }

    async fn deployment_allocations(&self, _deployment_id: &str) -> Result<Vec<Allocation>> {
        Ok(self.script.lock().unwrap().deployment_allocations.clone())
    }

    async fn allocation_info(&self, alloc_id: &str) -> Result<Allocation> {
        self.script
            .lock()
            .unwrap()
            .allocations
            .get(alloc_id)
            .cloned()
            .ok_or_else(|| not_found("allocation", alloc_id))
    }

    async fn list_jobs(&self) -> Result<Vec<JobListStub>> {
        Ok(self.script.lock().unwrap().jobs.clone())
    }

    async fn force_evaluate(&self, job_id: &str) -> Result<JobEvaluateResponse> {
        let mut script = self.script.lock().unwrap();
        if script.unevaluable_jobs.contains(job_id) {
            return Err(not_found("job", job_id));
        }
        script.forced_evaluations.push(job_id.to_string());
        let meta = script.next_meta();
        Ok(JobEvaluateResponse {
            eval_id: format!("eval-{job_id}"),
            eval_create_index: meta.last_index,
        })
    }

    async fn list_nodes(&self) -> Result<Vec<NodeListStub>> {
        Ok(self.script.lock().unwrap().nodes.clone())
    }

    async fn node_allocations(
        &self,
        _node_id: &str,
        _options: &QueryOptions,
    ) -> Result<QueryResponse<Vec<Allocation>>> {
        let mut script = self.script.lock().unwrap();
        script.node_allocation_reads += 1;
        let (value, stale) = script
            .node_allocations
            .pop_front()
            .ok_or_else(|| exhausted("node allocations"))?;
        let meta = script.meta(stale);
        Ok(QueryResponse { value, meta })
    }

    async fn toggle_drain(&self, node_id: &str, enable: bool) -> Result<NodeDrainUpdateResponse> {
        let mut script = self.script.lock().unwrap();
        if !script.nodes.iter().any(|n| n.id == node_id)
            && script.agent_node_id.as_deref() != Some(node_id)
        {
            return Err(not_found("node", node_id));
        }
        script.drain_toggles.push((node_id.to_string(), enable));
        Ok(NodeDrainUpdateResponse::default())
    }

    async fn agent_self(&self) -> Result<AgentSelf> {
        let script = self.script.lock().unwrap();
        let mut agent = AgentSelf::default();
        if let Some(node_id) = &script.agent_node_id {
            agent
                .stats
                .entry("client".to_string())
                .or_default()
                .insert("node_id".to_string(), node_id.clone());
        }
        Ok(agent)
    }

    async fn garbage_collect(&self) -> Result<()> {
        self.script.lock().unwrap().gc_calls += 1;
        Ok(())
    }
}

/// A job with the given `(group, count)` pairs
pub(crate) fn job(name: &str, job_type: JobType, groups: &[(&str, u32)]) -> Job {
    Job {
        id: Some(name.to_string()),
        name: name.to_string(),
        job_type,
        task_groups: groups
            .iter()
            .map(|(group, count)| TaskGroup::new(*group, *count))
            .collect(),
        ..Default::default()
    }
}

/// A deployment snapshot from
/// `(group, desired_total, desired_canaries, healthy, unhealthy)` tuples
pub(crate) fn deployment(status: DeploymentStatus, groups: &[(&str, u32, u32, u32, u32)]) -> Deployment {
    Deployment {
        id: "d1".to_string(),
        job_id: "web".to_string(),
        status,
        status_description: String::new(),
        task_groups: groups
            .iter()
            .map(|(name, total, canaries, healthy, unhealthy)| {
                (
                    name.to_string(),
                    DeploymentState {
                        desired_total: *total,
                        desired_canaries: *canaries,
                        placed_allocs: healthy + unhealthy,
                        healthy_allocs: *healthy,
                        unhealthy_allocs: *unhealthy,
                        promoted: false,
                    },
                )
            })
            .collect(),
    }
}

/// An allocation from `(task, state, events)` tuples
pub(crate) fn allocation(id: &str, tasks: &[(&str, &str, Vec<TaskEvent>)]) -> Allocation {
    Allocation {
        id: id.to_string(),
        name: String::new(),
        task_group: String::new(),
        client_status: String::new(),
        task_states: tasks
            .iter()
            .map(|(name, state, events)| {
                (
                    name.to_string(),
                    TaskState {
                        state: state.to_string(),
                        failed: false,
                        events: events.clone(),
                    },
                )
            })
            .collect(),
    }
}

/// An allocation list stub with a client status
pub(crate) fn allocation_with_status(id: &str, client_status: &str) -> Allocation {
    Allocation {
        client_status: client_status.to_string(),
        ..allocation(id, &[])
    }
}
