//! Job file loading
//!
//! JSON job files are decoded locally. Anything else is treated as HCL and
//! converted by the control plane.

use pilot_client::ControlPlane;
use pilot_core::domain::job::Job;
use serde_json::Value;
use tracing::debug;

use crate::error::{DeployError, Result};

/// Turns the contents of a job file into a job
pub async fn load_job(client: &dyn ControlPlane, contents: &str) -> Result<Job> {
    let trimmed = contents.trim_start();
    if trimmed.starts_with('{') {
        debug!("decoding job file as JSON");
        return decode_json(trimmed);
    }

    debug!("sending job file to the control plane for HCL parsing");
    client
        .parse_job(contents)
        .await
        .map_err(|e| DeployError::remote("jobspec parse failed", e))
}

/// Decodes a JSON job, either bare or wrapped as `{"Job": {...}}`
pub fn decode_json(contents: &str) -> Result<Job> {
    let value: Value = serde_json::from_str(contents)
        .map_err(|e| DeployError::InvalidInput(format!("invalid job JSON: {e}")))?;

    let value = match value {
        Value::Object(mut map) if map.get("Job").is_some_and(Value::is_object) => {
            map.remove("Job").unwrap_or(Value::Null)
        }
        other => other,
    };

    let job: Job = serde_json::from_value(value)
        .map_err(|e| DeployError::InvalidInput(format!("invalid job JSON: {e}")))?;

    if job.identifier().is_empty() {
        return Err(DeployError::InvalidInput(
            "job file has neither an ID nor a Name".to_string(),
        ));
    }

    Ok(job)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedControlPlane;
    use pilot_core::domain::job::{JobType, TaskGroup};

    #[test]
    fn test_decode_bare_and_wrapped() {
        let bare = r#"{"ID": "web", "Name": "web", "TaskGroups": [{"Name": "app", "Count": 2}]}"#;
        let wrapped = format!(r#"{{"Job": {bare}}}"#);

        let from_bare = decode_json(bare).unwrap();
        let from_wrapped = decode_json(&wrapped).unwrap();

        assert_eq!(from_bare, from_wrapped);
        assert_eq!(from_bare.group("app").unwrap().count, 2);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            decode_json("{not json"),
            Err(DeployError::InvalidInput(_))
        ));
        assert!(matches!(
            decode_json(r#"{"TaskGroups": []}"#),
            Err(DeployError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_hcl_goes_to_control_plane() {
        let client = ScriptedControlPlane::new();
        client.set_parsed_job(Job {
            name: "cache".to_string(),
            job_type: JobType::Service,
            task_groups: vec![TaskGroup::new("redis", 1)],
            ..Default::default()
        });

        let job = load_job(&client, "job \"cache\" {\n  group \"redis\" {}\n}\n")
            .await
            .unwrap();

        assert_eq!(job.name, "cache");
        assert_eq!(client.parse_calls(), 1);
    }

    #[tokio::test]
    async fn test_json_never_reaches_control_plane() {
        let client = ScriptedControlPlane::new();
        let job = load_job(&client, "\n  {\"Name\": \"web\"}").await.unwrap();
        assert_eq!(job.identifier(), "web");
        assert_eq!(client.parse_calls(), 0);
    }
}
