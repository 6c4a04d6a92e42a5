//! Plan command handler

use anyhow::Result;
use clap::Args;
use pilot_engine::PlanOptions;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

use super::read_job;
use crate::config::Config;

/// Exit code when the plan has pending changes
const EXIT_CHANGES: u8 = 1;

/// Exit code when planning failed
const EXIT_ERROR: u8 = 255;

/// Arguments of `pilot plan`
#[derive(Args)]
pub struct PlanArgs {
    /// Job file (JSON or HCL)
    pub file: PathBuf,

    /// Show the full contents of added and deleted groups and tasks
    #[arg(short, long)]
    pub verbose: bool,

    /// Omit the job diff
    #[arg(long)]
    pub no_diff: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

/// Handle `pilot plan`
///
/// Errors are logged here instead of propagated so that they map to their own
/// exit code.
pub async fn handle_plan_command(args: PlanArgs, config: &Config) -> Result<ExitCode> {
    match plan(args, config).await {
        Ok(true) => Ok(ExitCode::from(EXIT_CHANGES)),
        Ok(false) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            error!("{:#}", e);
            Ok(ExitCode::from(EXIT_ERROR))
        }
    }
}

async fn plan(args: PlanArgs, config: &Config) -> Result<bool> {
    let job = read_job(config, &args.file).await?;
    let engine = config.engine(config.client_for(&job));

    let options = PlanOptions {
        verbose: args.verbose,
        show_diff: !args.no_diff,
        no_color: args.no_color || !std::io::stdout().is_terminal(),
    };

    let report = engine.plan(&job, options).await?;
    println!("{}", report.rendered);

    Ok(report.changes_pending)
}
