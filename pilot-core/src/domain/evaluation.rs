//! Evaluation domain types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::null_as_default;

/// Evaluation status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EvaluationStatus {
    Pending,
    Blocked,
    Complete,
    Failed,
    Cancelled,
    Other(String),
}

impl EvaluationStatus {
    pub fn as_str(&self) -> &str {
        match self {
            EvaluationStatus::Pending => "pending",
            EvaluationStatus::Blocked => "blocked",
            EvaluationStatus::Complete => "complete",
            EvaluationStatus::Failed => "failed",
            EvaluationStatus::Cancelled => "canceled",
            EvaluationStatus::Other(other) => other,
        }
    }

    /// Whether the scheduler is done with this evaluation
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            EvaluationStatus::Complete | EvaluationStatus::Failed | EvaluationStatus::Cancelled
        )
    }
}

impl From<String> for EvaluationStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "pending" => EvaluationStatus::Pending,
            "blocked" => EvaluationStatus::Blocked,
            "complete" => EvaluationStatus::Complete,
            "failed" => EvaluationStatus::Failed,
            "canceled" | "cancelled" => EvaluationStatus::Cancelled,
            _ => EvaluationStatus::Other(value),
        }
    }
}

impl From<EvaluationStatus> for String {
    fn from(value: EvaluationStatus) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for EvaluationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scheduler evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Status")]
    pub status: EvaluationStatus,
    #[serde(rename = "TriggeredBy", default)]
    pub triggered_by: String,
    #[serde(rename = "DeploymentID", default)]
    pub deployment_id: String,
    #[serde(rename = "BlockedEval", default)]
    pub blocked_eval: String,
    /// Delay before a follow-up evaluation runs, in nanoseconds
    #[serde(rename = "Wait", default)]
    pub wait: i64,
    #[serde(
        rename = "FailedTGAllocs",
        default,
        deserialize_with = "null_as_default"
    )]
    pub failed_tg_allocs: BTreeMap<String, AllocationMetric>,
}

impl Evaluation {
    pub fn new(id: impl Into<String>, status: EvaluationStatus) -> Self {
        Self {
            id: id.into(),
            status,
            triggered_by: String::new(),
            deployment_id: String::new(),
            blocked_eval: String::new(),
            wait: 0,
            failed_tg_allocs: BTreeMap::new(),
        }
    }
}

/// Placement metrics for a task group that could not be fully placed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocationMetric {
    #[serde(rename = "NodesEvaluated")]
    pub nodes_evaluated: u64,
    #[serde(rename = "NodesFiltered")]
    pub nodes_filtered: u64,
    #[serde(rename = "NodesAvailable", deserialize_with = "null_as_default")]
    pub nodes_available: BTreeMap<String, u64>,
    #[serde(rename = "ClassFiltered", deserialize_with = "null_as_default")]
    pub class_filtered: BTreeMap<String, u64>,
    #[serde(rename = "ConstraintFiltered", deserialize_with = "null_as_default")]
    pub constraint_filtered: BTreeMap<String, u64>,
    #[serde(rename = "NodesExhausted")]
    pub nodes_exhausted: u64,
    #[serde(rename = "ClassExhausted", deserialize_with = "null_as_default")]
    pub class_exhausted: BTreeMap<String, u64>,
    #[serde(rename = "DimensionExhausted", deserialize_with = "null_as_default")]
    pub dimension_exhausted: BTreeMap<String, u64>,
    #[serde(rename = "QuotaExhausted", deserialize_with = "null_as_default")]
    pub quota_exhausted: Vec<String>,
    #[serde(rename = "Scores", deserialize_with = "null_as_default")]
    pub scores: BTreeMap<String, f64>,
    /// Additional failures folded into this one report
    #[serde(rename = "CoalescedFailures")]
    pub coalesced_failures: u64,
}

impl AllocationMetric {
    /// Number of allocations this metric stands for
    pub fn failed_allocations(&self) -> u64 {
        self.coalesced_failures + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_with_null_collections() {
        let raw = r#"{
            "ID": "9f2c1a55-0000-0000-0000-000000000000",
            "Status": "complete",
            "FailedTGAllocs": {
                "cache": {"NodesEvaluated": 3, "ClassFiltered": null, "CoalescedFailures": 2}
            }
        }"#;

        let eval: Evaluation = serde_json::from_str(raw).unwrap();
        assert_eq!(eval.status, EvaluationStatus::Complete);
        assert!(eval.status.is_terminal());
        let metric = &eval.failed_tg_allocs["cache"];
        assert!(metric.class_filtered.is_empty());
        assert_eq!(metric.failed_allocations(), 3);
    }

    #[test]
    fn test_null_failed_allocs() {
        let raw = r#"{"ID": "e1", "Status": "pending", "FailedTGAllocs": null}"#;
        let eval: Evaluation = serde_json::from_str(raw).unwrap();
        assert!(eval.failed_tg_allocs.is_empty());
        assert!(!eval.status.is_terminal());
    }

    #[test]
    fn test_cancelled_spellings() {
        assert_eq!(
            EvaluationStatus::from("canceled".to_string()),
            EvaluationStatus::Cancelled
        );
        assert_eq!(
            EvaluationStatus::from("cancelled".to_string()),
            EvaluationStatus::Cancelled
        );
    }
}
