//! Re-evaluation command handler

use anyhow::{Context, Result};
use clap::Args;
use std::process::ExitCode;
use tracing::error;

use crate::config::Config;

/// Arguments of `pilot re-eval`
#[derive(Args)]
pub struct ReEvalArgs {
    /// Name of the job to evaluate
    #[arg(required_unless_present = "all", conflicts_with = "all")]
    pub job: Option<String>,

    /// Evaluate every job
    #[arg(long)]
    pub all: bool,
}

/// Handle `pilot re-eval`
///
/// With `--all`, jobs that fail to evaluate are reported and the command
/// exits with a failure once every job has been tried.
pub async fn handle_re_eval_command(args: ReEvalArgs, config: &Config) -> Result<ExitCode> {
    let engine = config.engine(config.client());

    match args.job {
        Some(job) => {
            let eval_id = engine
                .re_evaluate(&job)
                .await
                .with_context(|| format!("failed to evaluate job \"{}\"", job))?;
            println!("{}", eval_id);
        }
        None => {
            let failed = engine
                .re_evaluate_all()
                .await
                .context("failed to evaluate jobs")?;
            if !failed.is_empty() {
                error!("failed to evaluate {} jobs: {}", failed.len(), failed.join(", "));
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    eprintln!("Done");
    Ok(ExitCode::SUCCESS)
}
