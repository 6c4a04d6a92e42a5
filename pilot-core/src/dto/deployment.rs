//! Deployment DTOs

use serde::{Deserialize, Serialize};

/// Request to promote every canary of a deployment
#[derive(Debug, Clone, Serialize)]
pub struct PromoteRequest {
    #[serde(rename = "DeploymentID")]
    pub deployment_id: String,
    #[serde(rename = "All")]
    pub all: bool,
}

impl PromoteRequest {
    pub fn all(deployment_id: impl Into<String>) -> Self {
        Self {
            deployment_id: deployment_id.into(),
            all: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeploymentUpdateResponse {
    #[serde(rename = "EvalID")]
    pub eval_id: String,
    #[serde(rename = "DeploymentModifyIndex")]
    pub deployment_modify_index: u64,
}
