//! Plan diff domain types
//!
//! A plan produces a tree of diffs: job, task groups, tasks, and arbitrarily
//! nested objects, each tagged with how it changes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::null_as_default;

/// How a diff node changes between the running and the submitted job
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiffType {
    Added,
    Deleted,
    Edited,
    #[default]
    #[serde(other)]
    None,
}

/// Job-level diff
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobDiff {
    #[serde(rename = "Type")]
    pub diff_type: DiffType,
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Fields", deserialize_with = "null_as_default")]
    pub fields: Vec<FieldDiff>,
    #[serde(rename = "Objects", deserialize_with = "null_as_default")]
    pub objects: Vec<ObjectDiff>,
    #[serde(rename = "TaskGroups", deserialize_with = "null_as_default")]
    pub task_groups: Vec<TaskGroupDiff>,
}

/// Task group diff, including the scheduler's update histogram
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskGroupDiff {
    #[serde(rename = "Type")]
    pub diff_type: DiffType,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Fields", deserialize_with = "null_as_default")]
    pub fields: Vec<FieldDiff>,
    #[serde(rename = "Objects", deserialize_with = "null_as_default")]
    pub objects: Vec<ObjectDiff>,
    #[serde(rename = "Tasks", deserialize_with = "null_as_default")]
    pub tasks: Vec<TaskDiff>,
    /// Update type (create, destroy, canary, ...) to allocation count
    #[serde(rename = "Updates", deserialize_with = "null_as_default")]
    pub updates: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskDiff {
    #[serde(rename = "Type")]
    pub diff_type: DiffType,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Fields", deserialize_with = "null_as_default")]
    pub fields: Vec<FieldDiff>,
    #[serde(rename = "Objects", deserialize_with = "null_as_default")]
    pub objects: Vec<ObjectDiff>,
    #[serde(rename = "Annotations", deserialize_with = "null_as_default")]
    pub annotations: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectDiff {
    #[serde(rename = "Type")]
    pub diff_type: DiffType,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Fields", deserialize_with = "null_as_default")]
    pub fields: Vec<FieldDiff>,
    #[serde(rename = "Objects", deserialize_with = "null_as_default")]
    pub objects: Vec<ObjectDiff>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldDiff {
    #[serde(rename = "Type")]
    pub diff_type: DiffType,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Old")]
    pub old: String,
    #[serde(rename = "New")]
    pub new: String,
    #[serde(rename = "Annotations", deserialize_with = "null_as_default")]
    pub annotations: Vec<String>,
}

/// Scheduler annotations attached to a plan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanAnnotations {
    #[serde(rename = "DesiredTGUpdates", deserialize_with = "null_as_default")]
    pub desired_tg_updates: BTreeMap<String, DesiredUpdates>,
}

impl PlanAnnotations {
    /// True iff any task group would stop, place, migrate, destructively
    /// update or canary at least one allocation
    pub fn has_pending_changes(&self) -> bool {
        self.desired_tg_updates
            .values()
            .any(|updates| updates.disruptive_total() > 0)
    }
}

/// Desired allocation changes for one task group
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesiredUpdates {
    #[serde(rename = "Ignore")]
    pub ignore: u64,
    #[serde(rename = "Place")]
    pub place: u64,
    #[serde(rename = "Migrate")]
    pub migrate: u64,
    #[serde(rename = "Stop")]
    pub stop: u64,
    #[serde(rename = "InPlaceUpdate")]
    pub in_place_update: u64,
    #[serde(rename = "DestructiveUpdate")]
    pub destructive_update: u64,
    #[serde(rename = "Canary")]
    pub canary: u64,
}

impl DesiredUpdates {
    /// In-place updates and ignored allocations do not count as changes
    pub fn disruptive_total(&self) -> u64 {
        self.stop + self.place + self.migrate + self.destructive_update + self.canary
    }
}
