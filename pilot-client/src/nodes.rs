//! Node and agent API endpoints

use pilot_core::domain::allocation::Allocation;
use pilot_core::domain::node::{AgentSelf, NodeListStub};
use pilot_core::dto::node::{NodeDrainRequest, NodeDrainUpdateResponse};
use reqwest::Method;
use tracing::debug;

use crate::NomadClient;
use crate::control_plane::{QueryOptions, QueryResponse};
use crate::error::Result;

impl NomadClient {
    // =============================================================================
    // Node Query
    // =============================================================================

    /// List every client node of the cluster
    pub async fn list_nodes(&self) -> Result<Vec<NodeListStub>> {
        let response = self.request(Method::GET, &["v1", "nodes"])?.send().await?;

        self.handle_response(response).await
    }

    /// List the allocations placed on a node
    ///
    /// # Arguments
    /// * `node_id` - The node ID
    /// * `options` - Blocking-query options
    pub async fn node_allocations(
        &self,
        node_id: &str,
        options: &QueryOptions,
    ) -> Result<QueryResponse<Vec<Allocation>>> {
        let response = self
            .query(&["v1", "node", node_id, "allocations"], options)?
            .send()
            .await?;

        self.handle_query_response(response).await
    }

    /// Describe the agent the client is connected to
    pub async fn agent_self(&self) -> Result<AgentSelf> {
        let response = self
            .request(Method::GET, &["v1", "agent", "self"])?
            .send()
            .await?;

        self.handle_response(response).await
    }

    // =============================================================================
    // Node Lifecycle
    // =============================================================================

    /// Start or stop draining a node
    ///
    /// A drain started here has no deadline: allocations are migrated as
    /// their jobs allow.
    pub async fn toggle_drain(&self, node_id: &str, enable: bool) -> Result<NodeDrainUpdateResponse> {
        debug!("setting drain of node {} to {}", node_id, enable);

        let response = self
            .request(Method::POST, &["v1", "node", node_id, "drain"])?
            .json(&NodeDrainRequest::new(node_id, enable))
            .send()
            .await?;

        self.handle_response(response).await
    }
}
