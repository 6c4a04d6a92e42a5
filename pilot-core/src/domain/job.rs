//! Job domain types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Scheduler job type
///
/// Unknown types are kept verbatim so a job fetched from the scheduler can be
/// registered again without losing its type.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobType {
    #[default]
    Service,
    Batch,
    System,
    Other(String),
}

impl JobType {
    pub fn as_str(&self) -> &str {
        match self {
            JobType::Service => "service",
            JobType::Batch => "batch",
            JobType::System => "system",
            JobType::Other(other) => other,
        }
    }
}

impl From<String> for JobType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "service" => JobType::Service,
            "batch" => JobType::Batch,
            "system" => JobType::System,
            _ => JobType::Other(value),
        }
    }
}

impl From<JobType> for String {
    fn from(value: JobType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Job specification
///
/// Only the fields the orchestrator reads or rewrites are typed. Everything
/// else lands in `extra` and is sent back untouched on registration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Job {
    #[serde(rename = "ID", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "Type", default)]
    pub job_type: JobType,
    #[serde(rename = "Region", default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(rename = "Namespace", default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Remote lifecycle status (pending, running, dead); absent on local specs
    #[serde(rename = "Status", default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(rename = "Stop", default, skip_serializing_if = "Option::is_none")]
    pub stop: Option<bool>,
    #[serde(
        rename = "JobModifyIndex",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub job_modify_index: Option<u64>,
    #[serde(
        rename = "ParameterizedJob",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub parameterized_job: Option<Value>,
    #[serde(rename = "Periodic", default, skip_serializing_if = "Option::is_none")]
    pub periodic: Option<PeriodicConfig>,
    #[serde(rename = "TaskGroups", default)]
    pub task_groups: Vec<TaskGroup>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Job {
    /// Identifier used in API paths: the job ID, falling back to its name
    pub fn identifier(&self) -> &str {
        match &self.id {
            Some(id) if !id.is_empty() => id,
            _ => &self.name,
        }
    }

    /// Sum of desired counts across all task groups
    pub fn total_count(&self) -> u64 {
        self.task_groups.iter().map(|g| u64::from(g.count)).sum()
    }

    pub fn is_parameterized(&self) -> bool {
        self.parameterized_job.is_some()
    }

    pub fn group(&self, name: &str) -> Option<&TaskGroup> {
        self.task_groups.iter().find(|g| g.name == name)
    }

    pub fn group_mut(&mut self, name: &str) -> Option<&mut TaskGroup> {
        self.task_groups.iter_mut().find(|g| g.name == name)
    }
}

/// Periodic launch configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodicConfig {
    /// IANA time zone the schedule is evaluated in; UTC when empty
    #[serde(rename = "TimeZone", default, skip_serializing_if = "String::is_empty")]
    pub time_zone: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A job as listed by the control plane
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobListStub {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Type")]
    pub job_type: JobType,
    #[serde(rename = "Status")]
    pub status: String,
}

/// A named set of tasks scheduled together
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskGroup {
    #[serde(rename = "Name")]
    pub name: String,
    /// Desired number of allocations; the scheduler defaults an absent count to 1
    #[serde(rename = "Count", default = "default_count")]
    pub count: u32,
    #[serde(rename = "Meta", default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<BTreeMap<String, String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_count() -> u32 {
    1
}

impl TaskGroup {
    pub fn new(name: impl Into<String>, count: u32) -> Self {
        Self {
            name: name.into(),
            count,
            meta: None,
            extra: Map::new(),
        }
    }

    /// Mutable access to the metadata map, creating it when absent
    pub fn meta_mut(&mut self) -> &mut BTreeMap<String, String> {
        self.meta.get_or_insert_with(BTreeMap::new)
    }

    pub fn meta_value(&self, key: &str) -> Option<&str> {
        self.meta.as_ref()?.get(key).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_fields_survive_reencoding() {
        let raw = r#"{
            "ID": "web",
            "Name": "web",
            "Type": "service",
            "Datacenters": ["dc1"],
            "TaskGroups": [
                {"Name": "app", "Count": 3, "Tasks": [{"Name": "server", "Driver": "docker"}]}
            ]
        }"#;

        let job: Job = serde_json::from_str(raw).unwrap();
        assert_eq!(job.extra["Datacenters"], serde_json::json!(["dc1"]));
        assert_eq!(job.task_groups[0].count, 3);

        let encoded = serde_json::to_value(&job).unwrap();
        assert_eq!(encoded["Datacenters"], serde_json::json!(["dc1"]));
        assert_eq!(encoded["TaskGroups"][0]["Tasks"][0]["Driver"], "docker");
        assert!(encoded["TaskGroups"][0].get("Meta").is_none());
    }

    #[test]
    fn test_job_type_defaults_and_other() {
        let job: Job = serde_json::from_str(r#"{"Name": "a"}"#).unwrap();
        assert_eq!(job.job_type, JobType::Service);

        let job: Job = serde_json::from_str(r#"{"Name": "a", "Type": "sysbatch"}"#).unwrap();
        assert_eq!(job.job_type, JobType::Other("sysbatch".to_string()));
        let encoded = serde_json::to_value(&job).unwrap();
        assert_eq!(encoded["Type"], "sysbatch");
    }

    #[test]
    fn test_periodic_time_zone_round_trips() {
        let raw = r#"{"Name": "report", "Periodic": {"Spec": "0 3 * * *", "TimeZone": "Europe/Berlin"}}"#;
        let job: Job = serde_json::from_str(raw).unwrap();
        let periodic = job.periodic.as_ref().unwrap();
        assert_eq!(periodic.time_zone, "Europe/Berlin");

        let encoded = serde_json::to_value(&job).unwrap();
        assert_eq!(encoded["Periodic"]["Spec"], "0 3 * * *");
        assert_eq!(encoded["Periodic"]["TimeZone"], "Europe/Berlin");
    }

    #[test]
    fn test_missing_count_defaults_to_one() {
        let group: TaskGroup = serde_json::from_str(r#"{"Name": "app"}"#).unwrap();
        assert_eq!(group.count, 1);
    }

    #[test]
    fn test_total_count_and_identifier() {
        let mut job = Job {
            name: "web".to_string(),
            task_groups: vec![TaskGroup::new("a", 2), TaskGroup::new("b", 0)],
            ..Default::default()
        };
        assert_eq!(job.total_count(), 2);
        assert_eq!(job.identifier(), "web");

        job.id = Some("web-prod".to_string());
        assert_eq!(job.identifier(), "web-prod");
    }

    #[test]
    fn test_meta_mut_creates_map() {
        let mut group = TaskGroup::new("app", 1);
        assert!(group.meta.is_none());
        group.meta_mut().insert("k".to_string(), "v".to_string());
        assert_eq!(group.meta_value("k"), Some("v"));
    }
}
