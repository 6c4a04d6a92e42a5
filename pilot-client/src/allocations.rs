//! Allocation-related API endpoints

use pilot_core::domain::allocation::Allocation;
use reqwest::Method;

use crate::NomadClient;
use crate::error::Result;

impl NomadClient {
    /// Get a full allocation, including task states and events
    pub async fn allocation_info(&self, alloc_id: &str) -> Result<Allocation> {
        let response = self
            .request(Method::GET, &["v1", "allocation", alloc_id])?
            .send()
            .await?;

        self.handle_response(response).await
    }
}
