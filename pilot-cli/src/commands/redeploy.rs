//! Redeploy command handler

use anyhow::{Context, Result};
use clap::Args;
use colored::*;
use pilot_engine::{DeployOutcome, RedeployRequest};
use std::process::ExitCode;

use crate::config::Config;

/// Arguments of `pilot redeploy`
#[derive(Args)]
pub struct RedeployArgs {
    /// Name of the running job
    pub job: String,

    /// Task group to redeploy; repeat for several, every group when omitted
    #[arg(short, long = "group")]
    pub groups: Vec<String>,

    /// Promote healthy canaries without waiting for an operator
    #[arg(long)]
    pub auto_promote: bool,
}

/// Handle `pilot redeploy`
pub async fn handle_redeploy_command(args: RedeployArgs, config: &Config) -> Result<ExitCode> {
    let engine = config.engine(config.client());

    let request = RedeployRequest {
        job_name: args.job.clone(),
        groups: args.groups,
        auto_promote: args.auto_promote,
    };

    let outcome = engine
        .redeploy(request)
        .await
        .with_context(|| format!("failed to redeploy job \"{}\"", args.job))?;

    if outcome == DeployOutcome::AwaitingPromotion {
        eprintln!(
            "{}",
            format!("Job \"{}\" is waiting for canary promotion.", args.job).yellow()
        );
    } else {
        eprintln!("{}", format!("Job \"{}\" redeployed.", args.job).green());
    }

    Ok(ExitCode::SUCCESS)
}
