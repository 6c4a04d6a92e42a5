//! Node and agent domain types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::null_as_default;

/// A client node as listed by the control plane
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeListStub {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Datacenter")]
    pub datacenter: String,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "Drain")]
    pub drain: bool,
    #[serde(rename = "SchedulingEligibility")]
    pub scheduling_eligibility: String,
}

/// The part of the local agent's self-description the CLI needs
///
/// Unlike the rest of the API, the agent endpoint uses lowercase keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AgentSelf {
    /// Stats per subsystem (`client`, `nomad`, `raft`, ...)
    #[serde(deserialize_with = "null_as_default")]
    pub stats: BTreeMap<String, BTreeMap<String, String>>,
}

impl AgentSelf {
    /// Node ID of the local agent; absent when it does not run in client mode
    pub fn client_node_id(&self) -> Option<&str> {
        self.stats
            .get("client")?
            .get("node_id")
            .map(String::as_str)
            .filter(|id| !id.is_empty())
    }
}
