//! Cluster operations
//!
//! Node drains and garbage collection. A drain is followed with a blocking
//! watch until the node runs nothing; garbage collection is a single call.

use tracing::info;

use crate::engine::Engine;
use crate::error::{DeployError, Result};
use crate::watch::NodeDrainWatcher;

/// Which node an operation targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeSelector {
    Id(String),
    /// A node name that must be unique in the cluster
    Name(String),
    /// The node of the agent the client talks to
    Local,
}

impl Engine {
    /// Resolves a selector to a node ID
    pub async fn resolve_node(&self, selector: &NodeSelector) -> Result<String> {
        match selector {
            NodeSelector::Id(id) => Ok(id.clone()),
            NodeSelector::Name(name) => {
                let nodes = self
                    .client
                    .list_nodes()
                    .await
                    .map_err(|e| DeployError::remote("failed to list nodes", e))?;

                let mut matching: Vec<String> = nodes
                    .into_iter()
                    .filter(|node| &node.name == name)
                    .map(|node| node.id)
                    .collect();

                match matching.len() {
                    1 => Ok(matching.remove(0)),
                    count => Err(DeployError::NodeLookup {
                        name: name.clone(),
                        count,
                    }),
                }
            }
            NodeSelector::Local => {
                let agent = self
                    .client
                    .agent_self()
                    .await
                    .map_err(|e| DeployError::remote("failed to query local agent", e))?;

                agent
                    .client_node_id()
                    .map(str::to_string)
                    .ok_or(DeployError::NotAClient)
            }
        }
    }

    /// Drains a node and waits until no allocation on it is pending or
    /// running; returns the drained node's ID
    pub async fn drain_node(&self, selector: &NodeSelector) -> Result<String> {
        let node_id = self.resolve_node(selector).await?;

        info!("draining node {}", self.config.id_length().shorten(&node_id));
        self.client
            .toggle_drain(&node_id, true)
            .await
            .map_err(|e| DeployError::remote("failed to enable drain", e))?;

        NodeDrainWatcher::new(self.client.as_ref(), self.config.drain_wait)
            .wait_drained(&node_id)
            .await?;

        Ok(node_id)
    }

    /// Forces a cluster garbage collection
    pub async fn garbage_collect(&self) -> Result<()> {
        self.client
            .garbage_collect()
            .await
            .map_err(|e| DeployError::remote("garbage collection failed", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::testing::{ScriptedControlPlane, allocation_with_status};
    use std::sync::Arc;
    use std::time::Duration;

    fn setup() -> (Arc<ScriptedControlPlane>, Engine) {
        let client = Arc::new(ScriptedControlPlane::new());
        client.set_nodes(&[
            ("n1", "worker-1"),
            ("n2", "worker-2"),
            ("n3", "worker-2"),
        ]);
        let engine = Engine::new(
            client.clone(),
            EngineConfig::default().with_wait(Duration::from_millis(5)),
        );
        (client, engine)
    }

    #[tokio::test]
    async fn test_resolve_by_name() {
        let (_, engine) = setup();

        let id = engine
            .resolve_node(&NodeSelector::Name("worker-1".to_string()))
            .await
            .unwrap();
        assert_eq!(id, "n1");

        let err = engine
            .resolve_node(&NodeSelector::Name("worker-2".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "found 2 nodes matching name `worker-2`");

        let err = engine
            .resolve_node(&NodeSelector::Name("worker-9".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, DeployError::NodeLookup { count: 0, .. }));
    }

    #[tokio::test]
    async fn test_resolve_local_node() {
        let (client, engine) = setup();
        assert!(matches!(
            engine.resolve_node(&NodeSelector::Local).await,
            Err(DeployError::NotAClient)
        ));

        client.set_agent_node_id("n2");
        assert_eq!(engine.resolve_node(&NodeSelector::Local).await.unwrap(), "n2");
    }

    #[tokio::test]
    async fn test_drain_enables_then_waits() {
        let (client, engine) = setup();
        client.push_node_allocations(vec![allocation_with_status("a1", "running")]);
        client.push_node_allocations(vec![allocation_with_status("a1", "complete")]);

        let node_id = engine
            .drain_node(&NodeSelector::Name("worker-1".to_string()))
            .await
            .unwrap();

        assert_eq!(node_id, "n1");
        assert_eq!(client.drain_toggles(), vec![("n1".to_string(), true)]);
        assert_eq!(client.node_allocation_reads(), 2);
    }

    #[tokio::test]
    async fn test_drain_of_unknown_node_does_not_watch() {
        let (client, engine) = setup();
        let err = engine
            .drain_node(&NodeSelector::Id("missing".to_string()))
            .await
            .unwrap_err();

        assert!(err.to_string().starts_with("failed to enable drain"));
        assert_eq!(client.node_allocation_reads(), 0);
    }

    #[tokio::test]
    async fn test_garbage_collect() {
        let (client, engine) = setup();
        engine.garbage_collect().await.unwrap();
        assert_eq!(client.gc_calls(), 1);
    }
}
