//! Error types for deployment orchestration

use pilot_client::ClientError;
use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, DeployError>;

/// Errors raised while orchestrating a job
///
/// Everything up to `InvalidInput` is raised before the job is registered and
/// leaves the scheduler untouched.
#[derive(Debug, Error)]
pub enum DeployError {
    /// The scheduler rejected the job specification
    #[error("validation failed: {0}")]
    Validation(String),

    /// Every task group of a non-system job has a count of zero
    #[error("all task groups have a count of 0, nothing to do")]
    NothingToDo,

    /// The job does not exist on the scheduler
    #[error("job \"{0}\" not found on server")]
    JobNotFound(String),

    /// A named task group does not exist in the job
    #[error("could not find task group: {0}")]
    GroupNotFound(String),

    /// A node name did not match exactly one node
    #[error("found {count} nodes matching name `{name}`")]
    NodeLookup { name: String, count: usize },

    /// The local agent runs without a client, so it has no node to drain
    #[error("could not find client node id, is the agent in client mode?")]
    NotAClient,

    /// Caller supplied inconsistent or malformed input
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The scheduler did not reach the desired state after registration
    #[error("{0}, manual intervention required")]
    ManualIntervention(String),

    /// A control-plane call failed
    #[error("{context}: {source}")]
    Remote {
        context: String,
        #[source]
        source: ClientError,
    },
}

impl DeployError {
    pub fn remote(context: impl Into<String>, source: ClientError) -> Self {
        Self::Remote {
            context: context.into(),
            source,
        }
    }

    pub fn manual(reason: impl Into<String>) -> Self {
        Self::ManualIntervention(reason.into())
    }

    pub fn is_manual_intervention(&self) -> bool {
        matches!(self, Self::ManualIntervention(_))
    }
}
