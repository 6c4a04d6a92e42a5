//! Cluster-wide system endpoints

use reqwest::Method;

use crate::NomadClient;
use crate::error::Result;

impl NomadClient {
    /// Force a garbage collection of jobs, evaluations, allocations and nodes
    pub async fn garbage_collect(&self) -> Result<()> {
        let response = self
            .request(Method::PUT, &["v1", "system", "gc"])?
            .send()
            .await?;

        self.handle_empty_response(response).await
    }
}
