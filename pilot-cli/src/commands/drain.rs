//! Drain command handler

use anyhow::{Context, Result};
use clap::{ArgGroup, Args};
use pilot_engine::NodeSelector;
use std::process::ExitCode;

use crate::config::Config;

/// Arguments of `pilot drain`
#[derive(Args)]
#[command(group(ArgGroup::new("node").required(true).args(["id", "name", "local"])))]
pub struct DrainArgs {
    /// ID of the node to drain
    #[arg(long)]
    pub id: Option<String>,

    /// Name of the node to drain; must match exactly one node
    #[arg(long)]
    pub name: Option<String>,

    /// Drain the node of the agent pilot talks to
    #[arg(long = "self")]
    pub local: bool,
}

impl DrainArgs {
    pub fn selector(&self) -> NodeSelector {
        match (&self.id, &self.name) {
            (Some(id), _) => NodeSelector::Id(id.clone()),
            (None, Some(name)) => NodeSelector::Name(name.clone()),
            (None, None) => NodeSelector::Local,
        }
    }
}

/// Handle `pilot drain`
///
/// Blocks until no allocation on the node is pending or running.
pub async fn handle_drain_command(args: DrainArgs, config: &Config) -> Result<ExitCode> {
    let engine = config.engine(config.client());

    engine
        .drain_node(&args.selector())
        .await
        .context("failed to drain node")?;

    eprintln!("Done");
    Ok(ExitCode::SUCCESS)
}
