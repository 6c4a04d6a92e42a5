//! Blocking-query watchers
//!
//! Each watcher long-polls one scheduler object until it reaches a terminal
//! state. Watches run one after another inside a session, never concurrently.

mod deployment;
mod evaluation;
mod job;
mod node;

pub(crate) use deployment::{DeploymentOutcome, DeploymentWatcher, PromotionState};
pub(crate) use evaluation::{EvaluationOutcome, EvaluationWatcher};
pub(crate) use job::{JobStatusOutcome, JobStatusWatcher};
pub(crate) use node::NodeDrainWatcher;

use pilot_client::{QueryOptions, QueryResponse};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Index bookkeeping for one blocking-query loop
///
/// A response whose index has not moved past the last one seen carries no new
/// state. Instead of re-issuing the request straight away, the next request
/// is held back until the wait time of the previous one has elapsed.
#[derive(Debug)]
pub(crate) struct BlockingQuery {
    wait: Duration,
    last_index: u64,
    issued_at: Instant,
}

impl BlockingQuery {
    pub fn new(wait: Duration) -> Self {
        Self {
            wait,
            last_index: 0,
            issued_at: Instant::now(),
        }
    }

    /// Options for the next request; marks the request as issued now
    pub fn next_options(&mut self) -> QueryOptions {
        self.issued_at = Instant::now();
        QueryOptions::blocking(self.last_index, self.wait)
    }

    /// Returns the value if the response is fresh
    ///
    /// A stale response sleeps out the rest of the wait window and yields `None`.
    pub async fn accept<T>(&mut self, response: QueryResponse<T>) -> Option<T> {
        if response.meta.last_index <= self.last_index {
            debug!(
                "index {} has not advanced past {}, backing off",
                response.meta.last_index, self.last_index
            );
            tokio::time::sleep_until(self.issued_at + self.wait).await;
            return None;
        }

        self.last_index = response.meta.last_index;
        Some(response.value)
    }

    pub fn last_index(&self) -> u64 {
        self.last_index
    }
}
