//! Scale command handlers
//!
//! Reads and changes the count of a single task group.

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use pilot_engine::Engine;
use std::process::ExitCode;

use crate::config::Config;

/// Scale subcommands
#[derive(Subcommand)]
pub enum ScaleCommands {
    /// Print the current count of a task group
    Get {
        job: String,
        group: String,
    },
    /// Set the count of a task group
    Set {
        job: String,
        group: String,
        count: u32,
    },
    /// Increase the count of a task group
    Up {
        job: String,
        group: String,
        count: u32,
    },
    /// Decrease the count of a task group
    Down {
        job: String,
        group: String,
        count: u32,
    },
}

/// Handle scale commands
///
/// # Arguments
/// * `command` - The scale command to execute
/// * `config` - The CLI configuration
pub async fn handle_scale_command(command: ScaleCommands, config: &Config) -> Result<ExitCode> {
    let engine = config.engine(config.client());

    match command {
        ScaleCommands::Get { job, group } => {
            let count = engine
                .group_count(&job, &group)
                .await
                .with_context(|| format!("failed to read count of \"{}\"/\"{}\"", job, group))?;
            println!("{}", count);
        }
        ScaleCommands::Set { job, group, count } => {
            let changed = engine
                .set_group_count(&job, &group, count)
                .await
                .with_context(|| format!("failed to scale \"{}\"/\"{}\"", job, group))?;
            if changed {
                eprintln!("{}", format!("Scaled {}/{} to {}.", job, group, count).green());
            } else {
                eprintln!("{}", format!("{}/{} is already at {}.", job, group, count).yellow());
            }
        }
        ScaleCommands::Up { job, group, count } => {
            adjust(&engine, &job, &group, i64::from(count)).await?;
        }
        ScaleCommands::Down { job, group, count } => {
            adjust(&engine, &job, &group, -i64::from(count)).await?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

async fn adjust(engine: &Engine, job: &str, group: &str, delta: i64) -> Result<()> {
    let count = engine
        .adjust_group_count(job, group, delta)
        .await
        .with_context(|| format!("failed to scale \"{}\"/\"{}\"", job, group))?;
    eprintln!("{}", format!("Scaled {}/{} to {}.", job, group, count).green());
    Ok(())
}
