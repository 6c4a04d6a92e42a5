//! Data Transfer Objects for the control-plane API
//!
//! Request bodies sent to the scheduler and the response envelopes it
//! returns. Domain entities embedded in them live in [`crate::domain`].

pub mod deployment;
pub mod job;
pub mod node;
