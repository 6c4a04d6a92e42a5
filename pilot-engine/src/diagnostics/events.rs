//! Human-readable task event descriptions

use pilot_core::domain::allocation::TaskEvent;

use crate::format::format_nanos;

pub const TASK_SETUP: &str = "Setup";
pub const TASK_STARTED: &str = "Started";
pub const TASK_RECEIVED: &str = "Received";
pub const TASK_FAILED_VALIDATION: &str = "Failed Validation";
pub const TASK_SETUP_FAILURE: &str = "Setup Failure";
pub const TASK_DRIVER_FAILURE: &str = "Driver Failure";
pub const TASK_DOWNLOADING_ARTIFACTS: &str = "Downloading Artifacts";
pub const TASK_ARTIFACT_DOWNLOAD_FAILED: &str = "Failed Artifact Download";
pub const TASK_KILLING: &str = "Killing";
pub const TASK_KILLED: &str = "Killed";
pub const TASK_TERMINATED: &str = "Terminated";
pub const TASK_RESTARTING: &str = "Restarting";
pub const TASK_NOT_RESTARTING: &str = "Not Restarting";
pub const TASK_SIBLING_FAILED: &str = "Sibling Task Failed";
pub const TASK_SIGNALING: &str = "Signaling";
pub const TASK_RESTART_SIGNAL: &str = "Restart Signaled";
pub const TASK_DRIVER_MESSAGE: &str = "Driver";
pub const TASK_LEADER_DEAD: &str = "Leader Task Dead";

/// Describes a task event, falling back to generic text when the event
/// carries no detail. Unknown event types use the raw message.
pub fn describe_event(event: &TaskEvent) -> String {
    match event.event_type.as_str() {
        TASK_SETUP => event.message.clone(),
        TASK_STARTED => "Task started by client".to_string(),
        TASK_RECEIVED => "Task received by client".to_string(),
        TASK_FAILED_VALIDATION => or_default(&event.validation_error, "Validation of task failed"),
        TASK_SETUP_FAILURE => or_default(&event.setup_error, "Task setup failed"),
        TASK_DRIVER_FAILURE => or_default(&event.driver_error, "Failed to start task"),
        TASK_DOWNLOADING_ARTIFACTS => "Client is downloading artifacts".to_string(),
        TASK_ARTIFACT_DOWNLOAD_FAILED => {
            or_default(&event.download_error, "Failed to download artifacts")
        }
        TASK_KILLING => {
            if !event.kill_reason.is_empty() {
                format!("Killing task: {}", event.kill_reason)
            } else if event.kill_timeout != 0 {
                format!(
                    "Sent interrupt. Waiting {} before force killing",
                    format_nanos(event.kill_timeout)
                )
            } else {
                "Sent interrupt".to_string()
            }
        }
        TASK_KILLED => or_default(&event.kill_error, "Task successfully killed"),
        TASK_TERMINATED => {
            let mut parts = vec![format!("Exit Code: {}", event.exit_code)];
            if event.signal != 0 {
                parts.push(format!("Signal: {}", event.signal));
            }
            if !event.message.is_empty() {
                parts.push(format!("Exit Message: {:?}", event.message));
            }
            parts.join(", ")
        }
        TASK_RESTARTING => {
            let delay = format!("Task restarting in {}", format_nanos(event.start_delay));
            if event.restart_reason.is_empty() {
                delay
            } else {
                format!("{} - {}", event.restart_reason, delay)
            }
        }
        TASK_NOT_RESTARTING => or_default(&event.restart_reason, "Task exceeded restart policy"),
        TASK_SIBLING_FAILED => {
            if event.failed_sibling.is_empty() {
                "Task's sibling failed".to_string()
            } else {
                format!("Task's sibling {:?} failed", event.failed_sibling)
            }
        }
        TASK_SIGNALING => {
            match (event.task_signal.as_str(), event.task_signal_reason.as_str()) {
                ("", "") => "Task being sent a signal".to_string(),
                ("", reason) => reason.to_string(),
                (signal, "") => format!("Task being sent signal {}", signal),
                (signal, reason) => format!("Task being sent signal {}: {}", signal, reason),
            }
        }
        TASK_RESTART_SIGNAL => or_default(&event.restart_reason, "Task signaled to restart"),
        TASK_DRIVER_MESSAGE => event.driver_message.clone(),
        TASK_LEADER_DEAD => "Leader Task in Group dead".to_string(),
        _ => event.message.clone(),
    }
}

fn or_default(detail: &str, fallback: &str) -> String {
    if detail.is_empty() {
        fallback.to_string()
    } else {
        detail.to_string()
    }
}
