//! Garbage collection command handler

use anyhow::{Context, Result};
use std::process::ExitCode;

use crate::config::Config;

/// Handle `pilot gc`
pub async fn handle_gc_command(config: &Config) -> Result<ExitCode> {
    config
        .engine(config.client())
        .garbage_collect()
        .await
        .context("failed to garbage collect")?;

    eprintln!("Done");
    Ok(ExitCode::SUCCESS)
}
