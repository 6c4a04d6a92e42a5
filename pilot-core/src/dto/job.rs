//! Job DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::evaluation::{AllocationMetric, Evaluation};
use crate::domain::job::Job;
use crate::domain::null_as_default;
use crate::domain::plan::{JobDiff, PlanAnnotations};

/// Request to convert an HCL job file into its JSON form
#[derive(Debug, Clone, Serialize)]
pub struct ParseJobRequest {
    #[serde(rename = "JobHCL")]
    pub job_hcl: String,
    #[serde(rename = "Canonicalize")]
    pub canonicalize: bool,
}

/// Request wrapping a job for validation
#[derive(Debug, Clone, Serialize)]
pub struct ValidateJobRequest<'a> {
    #[serde(rename = "Job")]
    pub job: &'a Job,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JobValidateResponse {
    #[serde(rename = "DriverConfigValidated")]
    pub driver_config_validated: bool,
    #[serde(rename = "ValidationErrors", deserialize_with = "null_as_default")]
    pub validation_errors: Vec<String>,
    /// Aggregated validation error; empty when the job is valid
    #[serde(rename = "Error")]
    pub error: String,
    #[serde(rename = "Warnings")]
    pub warnings: String,
}

/// Request to register (create or update) a job
#[derive(Debug, Clone, Serialize)]
pub struct RegisterJobRequest<'a> {
    #[serde(rename = "Job")]
    pub job: &'a Job,
    /// Only register if the remote job's modify index still equals `job_modify_index`
    #[serde(rename = "EnforceIndex")]
    pub enforce_index: bool,
    #[serde(rename = "JobModifyIndex")]
    pub job_modify_index: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JobRegisterResponse {
    #[serde(rename = "EvalID")]
    pub eval_id: String,
    #[serde(rename = "EvalCreateIndex")]
    pub eval_create_index: u64,
    #[serde(rename = "JobModifyIndex")]
    pub job_modify_index: u64,
    #[serde(rename = "Warnings")]
    pub warnings: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JobDeregisterResponse {
    #[serde(rename = "EvalID")]
    pub eval_id: String,
    #[serde(rename = "JobModifyIndex")]
    pub job_modify_index: u64,
}

/// Request to force a new evaluation of a job
#[derive(Debug, Clone, Serialize)]
pub struct JobEvaluateRequest {
    #[serde(rename = "JobID")]
    pub job_id: String,
    #[serde(rename = "EvalOptions")]
    pub eval_options: EvalOptions,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct EvalOptions {
    /// Also reschedule failed allocations
    #[serde(rename = "ForceReschedule")]
    pub force_reschedule: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JobEvaluateResponse {
    #[serde(rename = "EvalID")]
    pub eval_id: String,
    #[serde(rename = "EvalCreateIndex")]
    pub eval_create_index: u64,
}

/// Dry-run plan request
#[derive(Debug, Clone, Serialize)]
pub struct PlanJobRequest<'a> {
    #[serde(rename = "Job")]
    pub job: &'a Job,
    #[serde(rename = "Diff")]
    pub diff: bool,
    #[serde(rename = "PolicyOverride")]
    pub policy_override: bool,
}

/// Result of a dry-run plan
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JobPlanResponse {
    #[serde(rename = "JobModifyIndex")]
    pub job_modify_index: u64,
    #[serde(rename = "CreatedEvals", deserialize_with = "null_as_default")]
    pub created_evals: Vec<Evaluation>,
    #[serde(rename = "Diff")]
    pub diff: Option<JobDiff>,
    #[serde(rename = "Annotations")]
    pub annotations: Option<PlanAnnotations>,
    #[serde(rename = "FailedTGAllocs", deserialize_with = "null_as_default")]
    pub failed_tg_allocs: BTreeMap<String, AllocationMetric>,
    /// Zero time (year 1) when the job is not periodic
    #[serde(rename = "NextPeriodicLaunch")]
    pub next_periodic_launch: Option<DateTime<Utc>>,
    #[serde(rename = "Warnings")]
    pub warnings: String,
}

impl JobPlanResponse {
    /// Whether applying this plan would disrupt any allocation
    pub fn has_pending_changes(&self) -> bool {
        self.annotations
            .as_ref()
            .is_some_and(PlanAnnotations::has_pending_changes)
    }
}
