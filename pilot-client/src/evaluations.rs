//! Evaluation-related API endpoints

use pilot_core::domain::evaluation::Evaluation;

use crate::NomadClient;
use crate::control_plane::{QueryOptions, QueryResponse};
use crate::error::Result;

impl NomadClient {
    /// Get an evaluation by ID
    ///
    /// # Arguments
    /// * `eval_id` - The evaluation ID
    /// * `options` - Blocking-query options
    pub async fn evaluation_info(
        &self,
        eval_id: &str,
        options: &QueryOptions,
    ) -> Result<QueryResponse<Evaluation>> {
        let response = self
            .query(&["v1", "evaluation", eval_id], options)?
            .send()
            .await?;

        self.handle_query_response(response).await
    }
}
