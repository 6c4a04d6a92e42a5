//! Restart command handler

use anyhow::{Context, Result};
use clap::Args;
use std::process::ExitCode;

use crate::config::Config;

/// Arguments of `pilot restart`
#[derive(Args)]
pub struct RestartArgs {
    /// Name of the running job
    pub job: String,

    /// Restart only this task group
    #[arg(short, long)]
    pub group: Option<String>,
}

/// Handle `pilot restart`
///
/// A whole job is stopped and registered again; a single group is scaled to
/// zero and back.
pub async fn handle_restart_command(args: RestartArgs, config: &Config) -> Result<ExitCode> {
    let engine = config.engine(config.client());

    match &args.group {
        Some(group) => engine
            .restart_group(&args.job, group)
            .await
            .with_context(|| format!("failed to restart group \"{}\" of job \"{}\"", group, args.job))?,
        None => engine
            .restart_job(&args.job)
            .await
            .with_context(|| format!("failed to restart job \"{}\"", args.job))?,
    }

    eprintln!("Done");
    Ok(ExitCode::SUCCESS)
}
