//! Core domain types
//!
//! These types mirror the JSON documents served by the cluster scheduler's
//! HTTP API. Field names follow the scheduler's PascalCase convention on the
//! wire and snake_case in Rust.

pub mod allocation;
pub mod deployment;
pub mod evaluation;
pub mod job;
pub mod node;
pub mod plan;

use serde::{Deserialize, Deserializer};

/// The scheduler encodes empty maps and lists as `null`
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
