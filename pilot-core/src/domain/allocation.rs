//! Allocation domain types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::null_as_default;

/// Client-side task state that counts as healthy progress
pub const TASK_STATE_RUNNING: &str = "running";

pub const ALLOC_CLIENT_STATUS_PENDING: &str = "pending";
pub const ALLOC_CLIENT_STATUS_RUNNING: &str = "running";

/// An allocation of a task group onto a node
///
/// The same shape decodes both the list stubs returned for a deployment and
/// the full allocation document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "TaskGroup", default)]
    pub task_group: String,
    #[serde(rename = "ClientStatus", default)]
    pub client_status: String,
    #[serde(rename = "TaskStates", default, deserialize_with = "null_as_default")]
    pub task_states: BTreeMap<String, TaskState>,
}

impl Allocation {
    /// Whether the allocation still occupies its node
    pub fn is_active(&self) -> bool {
        self.client_status == ALLOC_CLIENT_STATUS_PENDING
            || self.client_status == ALLOC_CLIENT_STATUS_RUNNING
    }

    /// Whether any task of this allocation is outside the running state
    pub fn has_stalled_task(&self) -> bool {
        self.task_states
            .values()
            .any(|state| state.state != TASK_STATE_RUNNING)
    }
}

/// State of a single task inside an allocation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskState {
    #[serde(rename = "State")]
    pub state: String,
    #[serde(rename = "Failed")]
    pub failed: bool,
    #[serde(rename = "Events", deserialize_with = "null_as_default")]
    pub events: Vec<TaskEvent>,
}

/// A lifecycle event reported by the client running a task
///
/// Durations (`kill_timeout`, `start_delay`) are in nanoseconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskEvent {
    #[serde(rename = "Type")]
    pub event_type: String,
    #[serde(rename = "Time")]
    pub time: i64,
    #[serde(rename = "Message")]
    pub message: String,
    #[serde(rename = "KillReason")]
    pub kill_reason: String,
    #[serde(rename = "KillTimeout")]
    pub kill_timeout: i64,
    #[serde(rename = "KillError")]
    pub kill_error: String,
    #[serde(rename = "ExitCode")]
    pub exit_code: i32,
    #[serde(rename = "Signal")]
    pub signal: i32,
    #[serde(rename = "StartDelay")]
    pub start_delay: i64,
    #[serde(rename = "RestartReason")]
    pub restart_reason: String,
    #[serde(rename = "FailedSibling")]
    pub failed_sibling: String,
    #[serde(rename = "TaskSignal")]
    pub task_signal: String,
    #[serde(rename = "TaskSignalReason")]
    pub task_signal_reason: String,
    #[serde(rename = "DriverError")]
    pub driver_error: String,
    #[serde(rename = "DriverMessage")]
    pub driver_message: String,
    #[serde(rename = "SetupError")]
    pub setup_error: String,
    #[serde(rename = "ValidationError")]
    pub validation_error: String,
    #[serde(rename = "DownloadError")]
    pub download_error: String,
}

impl TaskEvent {
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            ..Default::default()
        }
    }
}
