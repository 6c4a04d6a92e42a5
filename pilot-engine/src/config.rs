//! Engine configuration
//!
//! Defines the tunables of an orchestration run: how long each blocking query
//! may be held open, how many allocations are inspected in parallel after a
//! failure, and how identifiers are printed.

use std::time::Duration;

use crate::error::{DeployError, Result};
use crate::format::IdLength;

/// Engine configuration
///
/// Passed explicitly into the engine and every watcher it starts.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Wait time for blocking evaluation queries
    pub eval_wait: Duration,

    /// Wait time for blocking deployment queries
    pub deployment_wait: Duration,

    /// Wait time for blocking job-status queries
    pub job_wait: Duration,

    /// Wait time for blocking node-allocation queries while draining
    pub drain_wait: Duration,

    /// Maximum allocations fetched in parallel when diagnosing a failure
    pub diagnostic_concurrency: usize,

    /// Print full identifiers instead of 8-character prefixes
    pub full_ids: bool,
}

impl EngineConfig {
    /// Creates a configuration with defaults
    pub fn new() -> Self {
        Self {
            eval_wait: Duration::from_secs(10),
            deployment_wait: Duration::from_secs(10),
            job_wait: Duration::from_secs(5),
            drain_wait: Duration::from_secs(10),
            diagnostic_concurrency: 4,
            full_ids: false,
        }
    }

    pub fn with_full_ids(mut self, full_ids: bool) -> Self {
        self.full_ids = full_ids;
        self
    }

    pub fn with_diagnostic_concurrency(mut self, concurrency: usize) -> Self {
        self.diagnostic_concurrency = concurrency;
        self
    }

    /// Applies one wait time to every blocking query
    pub fn with_wait(mut self, wait: Duration) -> Self {
        self.eval_wait = wait;
        self.deployment_wait = wait;
        self.job_wait = wait;
        self.drain_wait = wait;
        self
    }

    pub fn id_length(&self) -> IdLength {
        if self.full_ids {
            IdLength::Full
        } else {
            IdLength::Short
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.eval_wait.is_zero()
            || self.deployment_wait.is_zero()
            || self.job_wait.is_zero()
            || self.drain_wait.is_zero()
        {
            return Err(DeployError::InvalidInput(
                "blocking query wait times must be greater than 0".to_string(),
            ));
        }

        if self.diagnostic_concurrency == 0 {
            return Err(DeployError::InvalidInput(
                "diagnostic_concurrency must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
