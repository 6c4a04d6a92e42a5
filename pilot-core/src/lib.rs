//! Pilot Core
//!
//! Core types for the Pilot deployment orchestrator.
//!
//! This crate contains:
//! - Domain types: control-plane entities (Job, Evaluation, Deployment, etc.)
//! - DTOs: request and response bodies exchanged with the control plane

pub mod domain;
pub mod dto;
