//! Deployment domain types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::null_as_default;

/// Deployment status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DeploymentStatus {
    Running,
    Successful,
    Failed,
    Cancelled,
    Other(String),
}

impl DeploymentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            DeploymentStatus::Running => "running",
            DeploymentStatus::Successful => "successful",
            DeploymentStatus::Failed => "failed",
            DeploymentStatus::Cancelled => "cancelled",
            DeploymentStatus::Other(other) => other,
        }
    }
}

impl From<String> for DeploymentStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "running" => DeploymentStatus::Running,
            "successful" => DeploymentStatus::Successful,
            "failed" => DeploymentStatus::Failed,
            "cancelled" | "canceled" => DeploymentStatus::Cancelled,
            _ => DeploymentStatus::Other(value),
        }
    }
}

impl From<DeploymentStatus> for String {
    fn from(value: DeploymentStatus) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tracked rollout of a service job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deployment {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "JobID", default)]
    pub job_id: String,
    #[serde(rename = "Status")]
    pub status: DeploymentStatus,
    #[serde(rename = "StatusDescription", default)]
    pub status_description: String,
    #[serde(rename = "TaskGroups", default, deserialize_with = "null_as_default")]
    pub task_groups: BTreeMap<String, DeploymentState>,
}

/// Per task group rollout progress
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeploymentState {
    #[serde(rename = "DesiredTotal")]
    pub desired_total: u32,
    #[serde(rename = "DesiredCanaries")]
    pub desired_canaries: u32,
    #[serde(rename = "PlacedAllocs")]
    pub placed_allocs: u32,
    #[serde(rename = "HealthyAllocs")]
    pub healthy_allocs: u32,
    #[serde(rename = "UnhealthyAllocs")]
    pub unhealthy_allocs: u32,
    #[serde(rename = "Promoted")]
    pub promoted: bool,
}
