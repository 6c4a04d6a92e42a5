//! Job status watcher
//!
//! Batch jobs, and service jobs without a deployment, have no richer signal
//! than the job's own status.

use pilot_client::ControlPlane;
use std::time::Duration;
use tracing::{debug, error, info};

use super::BlockingQuery;
use crate::error::{DeployError, Result};

const STATUS_RUNNING: &str = "running";
const STATUS_PENDING: &str = "pending";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum JobStatusOutcome {
    Running,
    /// The job settled on a status other than running
    Stopped(String),
}

pub(crate) struct JobStatusWatcher<'a> {
    client: &'a dyn ControlPlane,
    wait: Duration,
}

impl<'a> JobStatusWatcher<'a> {
    pub fn new(client: &'a dyn ControlPlane, wait: Duration) -> Self {
        Self { client, wait }
    }

    /// Waits until the job leaves the pending state
    pub async fn wait_running(&self, job_id: &str) -> Result<JobStatusOutcome> {
        let mut query = BlockingQuery::new(self.wait);

        loop {
            let options = query.next_options();
            let response = self
                .client
                .job_info(job_id, &options)
                .await
                .map_err(|e| DeployError::remote("failed to get job info", e))?;

            let Some(job) = query.accept(response).await else {
                continue;
            };

            let status = job.status.unwrap_or_default();
            match status.as_str() {
                STATUS_RUNNING => {
                    info!("job \"{}\" has status \"{}\"", job_id, status);
                    return Ok(JobStatusOutcome::Running);
                }
                STATUS_PENDING => {
                    debug!("job \"{}\" has status \"{}\"", job_id, status);
                }
                _ => {
                    error!("job \"{}\" has status \"{}\"", job_id, status);
                    return Ok(JobStatusOutcome::Stopped(status));
                }
            }
        }
    }
}
