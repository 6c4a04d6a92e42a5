//! Node DTOs

use serde::{Deserialize, Serialize};

use crate::domain::null_as_default;

/// Drain parameters; a zero deadline waits for allocations indefinitely
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DrainSpec {
    /// Nanoseconds before remaining allocations are forced off; 0 = no deadline
    #[serde(rename = "Deadline")]
    pub deadline: i64,
    #[serde(rename = "IgnoreSystemJobs")]
    pub ignore_system_jobs: bool,
}

/// Request to start or stop draining a node
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeDrainRequest {
    #[serde(rename = "NodeID")]
    pub node_id: String,
    /// `None` stops an ongoing drain
    #[serde(rename = "DrainSpec")]
    pub drain_spec: Option<DrainSpec>,
    #[serde(rename = "MarkEligible")]
    pub mark_eligible: bool,
}

impl NodeDrainRequest {
    pub fn new(node_id: impl Into<String>, enable: bool) -> Self {
        Self {
            node_id: node_id.into(),
            drain_spec: enable.then(DrainSpec::default),
            mark_eligible: !enable,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeDrainUpdateResponse {
    #[serde(rename = "EvalIDs", deserialize_with = "null_as_default")]
    pub eval_ids: Vec<String>,
    #[serde(rename = "NodeModifyIndex")]
    pub node_modify_index: u64,
}
