//! Deploy command handler

use anyhow::{Context, Result};
use clap::Args;
use colored::*;
use pilot_engine::{DeployOptions, DeployOutcome, PlanOptions};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

use super::read_job;
use crate::config::Config;

/// Arguments of `pilot deploy`
#[derive(Args)]
pub struct DeployArgs {
    /// Job file (JSON or HCL)
    pub file: PathBuf,

    /// Promote healthy canaries without waiting for an operator
    #[arg(long)]
    pub auto_promote: bool,

    /// Use the counts from the job file instead of the running counts
    #[arg(long)]
    pub force_count: bool,

    /// Show the plan before deploying
    #[arg(long)]
    pub plan: bool,

    /// Deploy without asking for confirmation when the plan has changes
    #[arg(short, long)]
    pub yes: bool,
}

/// Handle `pilot deploy`
pub async fn handle_deploy_command(args: DeployArgs, config: &Config) -> Result<ExitCode> {
    let job = read_job(config, &args.file).await?;
    let engine = config.engine(config.client_for(&job));

    let mut options = DeployOptions {
        use_template_count: args.force_count,
        auto_promote: args.auto_promote,
        ..Default::default()
    };

    if args.plan {
        let report = engine
            .plan(&job, PlanOptions::default())
            .await
            .context("failed to plan job")?;
        println!("{}", report.rendered);

        if report.changes_pending
            && !args.yes
            && !confirm("Changes found, continue deployment?")?
        {
            eprintln!("Abandoning deployment.");
            return Ok(ExitCode::SUCCESS);
        }

        options.enforce_index = true;
        options.job_modify_index = report.job_modify_index;
    }

    let job_id = job.identifier().to_string();
    let outcome = engine
        .deploy(job, options)
        .await
        .with_context(|| format!("failed to deploy job \"{}\"", job_id))?;

    match outcome {
        DeployOutcome::Deployed => {
            eprintln!("{}", format!("Job \"{}\" deployed.", job_id).green());
        }
        DeployOutcome::AwaitingPromotion => {
            info!(job = %job_id, "canaries are healthy and waiting for promotion");
            eprintln!(
                "{}",
                format!("Job \"{}\" is waiting for canary promotion.", job_id).yellow()
            );
        }
        DeployOutcome::Registered => {
            eprintln!("{}", format!("Job \"{}\" registered.", job_id).green());
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Ask a yes/no question on stdout until the answer is recognised
fn confirm(question: &str) -> Result<bool> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("{} [y/n]: ", question);
        io::stdout().flush()?;

        let line = lines
            .next()
            .context("no answer on standard input")?
            .context("failed to read answer")?;

        if let Some(answer) = parse_confirmation(&line) {
            return Ok(answer);
        }
    }
}

/// Interpret a confirmation answer; `None` when it is neither yes nor no
fn parse_confirmation(answer: &str) -> Option<bool> {
    match answer.trim().to_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_confirmation() {
        assert_eq!(parse_confirmation("y"), Some(true));
        assert_eq!(parse_confirmation(" YES \n"), Some(true));
        assert_eq!(parse_confirmation("No"), Some(false));
        assert_eq!(parse_confirmation("n\n"), Some(false));
        assert_eq!(parse_confirmation(""), None);
        assert_eq!(parse_confirmation("maybe"), None);
    }
}
