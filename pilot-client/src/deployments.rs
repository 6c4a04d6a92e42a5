//! Deployment-related API endpoints

use pilot_core::domain::allocation::Allocation;
use pilot_core::domain::deployment::Deployment;
use pilot_core::dto::deployment::{DeploymentUpdateResponse, PromoteRequest};
use reqwest::Method;

use crate::NomadClient;
use crate::control_plane::{QueryOptions, QueryResponse};
use crate::error::Result;

impl NomadClient {
    // =============================================================================
    // Deployment Query
    // =============================================================================

    /// Get a deployment by ID
    ///
    /// # Arguments
    /// * `deployment_id` - The deployment ID
    /// * `options` - Blocking-query options
    pub async fn deployment_info(
        &self,
        deployment_id: &str,
        options: &QueryOptions,
    ) -> Result<QueryResponse<Deployment>> {
        let response = self
            .query(&["v1", "deployment", deployment_id], options)?
            .send()
            .await?;

        self.handle_query_response(response).await
    }

    /// List the allocations belonging to a deployment
    pub async fn deployment_allocations(&self, deployment_id: &str) -> Result<Vec<Allocation>> {
        let response = self
            .request(Method::GET, &["v1", "deployment", "allocations", deployment_id])?
            .send()
            .await?;

        self.handle_response(response).await
    }

    // =============================================================================
    // Deployment Lifecycle
    // =============================================================================

    /// Promote all canaries of a deployment
    pub async fn promote_deployment_all(
        &self,
        deployment_id: &str,
    ) -> Result<DeploymentUpdateResponse> {
        let response = self
            .request(Method::POST, &["v1", "deployment", "promote", deployment_id])?
            .json(&PromoteRequest::all(deployment_id))
            .send()
            .await?;

        self.handle_response(response).await
    }
}
