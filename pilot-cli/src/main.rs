//! Pilot CLI
//!
//! Deploys jobs to a cluster scheduler and follows them until they are
//! healthy, failed, or waiting for an operator.

mod commands;
mod config;

use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "pilot")]
#[command(about = "Deploy and manage jobs on a cluster scheduler", long_about = None)]
struct Cli {
    /// Address of the scheduler's HTTP API
    #[arg(
        long,
        env = "NOMAD_ADDR",
        default_value = "http://127.0.0.1:4646",
        global = true
    )]
    address: String,

    /// Region to send requests to, unless the job names its own
    #[arg(long, env = "NOMAD_REGION", global = true)]
    region: Option<String>,

    /// Namespace to send requests to, unless the job names its own
    #[arg(long, env = "NOMAD_NAMESPACE", global = true)]
    namespace: Option<String>,

    /// ACL token
    #[arg(long, env = "NOMAD_TOKEN", hide_env_values = true, global = true)]
    token: Option<String>,

    /// Log level when RUST_LOG is not set
    #[arg(long, env = "PILOT_LOG_LEVEL", default_value = "info", global = true)]
    log_level: String,

    /// Print full identifiers instead of short prefixes
    #[arg(long, global = true)]
    full_ids: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "pilot={level},pilot_engine={level},pilot_client={level}",
                    level = cli.log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config {
        address: cli.address,
        region: cli.region,
        namespace: cli.namespace,
        token: cli.token,
        full_ids: cli.full_ids,
    };

    if let Err(e) = config.validate() {
        error!("{:#}", e);
        return ExitCode::FAILURE;
    }

    match handle_command(cli.command, &config).await {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
