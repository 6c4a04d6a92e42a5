//! Node drain watcher

use pilot_client::ControlPlane;
use std::time::Duration;
use tracing::{debug, info};

use super::BlockingQuery;
use crate::error::{DeployError, Result};

/// Follows a draining node until nothing is left running on it
pub(crate) struct NodeDrainWatcher<'a> {
    client: &'a dyn ControlPlane,
    wait: Duration,
}

impl<'a> NodeDrainWatcher<'a> {
    pub fn new(client: &'a dyn ControlPlane, wait: Duration) -> Self {
        Self { client, wait }
    }

    /// Returns once no allocation on the node is pending or running
    pub async fn wait_drained(&self, node_id: &str) -> Result<()> {
        let mut query = BlockingQuery::new(self.wait);

        loop {
            let options = query.next_options();
            let response = self
                .client
                .node_allocations(node_id, &options)
                .await
                .map_err(|e| DeployError::remote("failed to list node allocations", e))?;

            let Some(allocations) = query.accept(response).await else {
                continue;
            };

            let remaining = allocations.iter().filter(|a| a.is_active()).count();
            if remaining == 0 {
                debug!("node {} drained at index {}", node_id, query.last_index());
                return Ok(());
            }

            info!("{} pending allocations remaining", remaining);
        }
    }
}
