//! Pilot Engine
//!
//! Deployment orchestration for a cluster scheduler.
//!
//! Architecture:
//! - Engine: entry points for deploy, plan and redeploy
//! - Session: one orchestration run, from validation to a terminal outcome
//! - Watchers: blocking-query loops over evaluations, deployments and job status
//! - Diagnostics: per-allocation failure reports after a failed deployment
//! - Plan: rendering of the scheduler's dry-run diff
//! - Operations: scaling, restarts, forced evaluations, node drains and
//!   garbage collection
//!
//! The engine never persists state and never rolls back; when the scheduler
//! does not reach the desired state the caller is told that manual
//! intervention is required.

mod cluster;
mod config;
mod diagnostics;
mod engine;
mod error;
mod format;
pub mod jobspec;
mod metrics;
mod operations;
pub mod plan;
pub mod reconcile;
mod session;
mod watch;

#[cfg(test)]
mod testing;

pub use cluster::NodeSelector;
pub use config::EngineConfig;
pub use diagnostics::FailureDiagnostics;
pub use engine::{Engine, RedeployRequest};
pub use error::{DeployError, Result};
pub use format::IdLength;
pub use plan::{PlanOptions, PlanReport};
pub use session::{DeployOptions, DeployOutcome};
