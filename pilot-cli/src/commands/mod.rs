//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod deploy;
mod drain;
mod gc;
mod plan;
mod re_eval;
mod redeploy;
mod restart;
mod scale;

pub use deploy::DeployArgs;
pub use drain::DrainArgs;
pub use plan::PlanArgs;
pub use re_eval::ReEvalArgs;
pub use redeploy::RedeployArgs;
pub use restart::RestartArgs;
pub use scale::ScaleCommands;

use anyhow::{Context, Result};
use clap::Subcommand;
use pilot_core::domain::job::Job;
use pilot_engine::jobspec;
use std::path::Path;
use std::process::ExitCode;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Deploy a job and follow it until it is healthy
    Deploy(DeployArgs),
    /// Show what the scheduler would change if a job were submitted
    ///
    /// Exits 0 when there are no changes, 1 when allocations would be
    /// created or destroyed, and 255 on error.
    Plan(PlanArgs),
    /// Force a new version of a running job
    Redeploy(RedeployArgs),
    /// Get or change task group counts
    Scale {
        #[command(subcommand)]
        command: ScaleCommands,
    },
    /// Restart a job or a single task group
    Restart(RestartArgs),
    /// Force the scheduler to evaluate a job, or every job, again
    ReEval(ReEvalArgs),
    /// Drain a node and wait until nothing runs on it
    Drain(DrainArgs),
    /// Force a cluster garbage collection
    Gc,
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
///
/// # Returns
/// The process exit code on success
pub async fn handle_command(command: Commands, config: &Config) -> Result<ExitCode> {
    match command {
        Commands::Deploy(args) => deploy::handle_deploy_command(args, config).await,
        Commands::Plan(args) => plan::handle_plan_command(args, config).await,
        Commands::Redeploy(args) => redeploy::handle_redeploy_command(args, config).await,
        Commands::Scale { command } => scale::handle_scale_command(command, config).await,
        Commands::Restart(args) => restart::handle_restart_command(args, config).await,
        Commands::ReEval(args) => re_eval::handle_re_eval_command(args, config).await,
        Commands::Drain(args) => drain::handle_drain_command(args, config).await,
        Commands::Gc => gc::handle_gc_command(config).await,
    }
}

/// Read and decode a job file
///
/// JSON is decoded locally; anything else is parsed by the scheduler.
async fn read_job(config: &Config, path: &Path) -> Result<Job> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read job file {}", path.display()))?;

    let job = jobspec::load_job(&config.client(), &contents)
        .await
        .with_context(|| format!("failed to load job from {}", path.display()))?;

    Ok(job)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Cli;
    use clap::Parser;
    use pilot_engine::NodeSelector;

    fn config() -> Config {
        Config {
            address: "http://127.0.0.1:4646".to_string(),
            region: None,
            namespace: None,
            token: None,
            full_ids: false,
        }
    }

    #[test]
    fn test_parse_deploy_flags() {
        let cli = Cli::try_parse_from([
            "pilot",
            "deploy",
            "web.nomad",
            "--auto-promote",
            "--plan",
            "--yes",
        ])
        .unwrap();

        match cli.command {
            Commands::Deploy(args) => {
                assert_eq!(args.file.to_str(), Some("web.nomad"));
                assert!(args.auto_promote);
                assert!(args.plan);
                assert!(args.yes);
                assert!(!args.force_count);
            }
            _ => panic!("expected deploy"),
        }
    }

    #[test]
    fn test_parse_redeploy_groups() {
        let cli = Cli::try_parse_from([
            "pilot", "redeploy", "web", "--group", "app", "--group", "cache",
        ])
        .unwrap();

        match cli.command {
            Commands::Redeploy(args) => {
                assert_eq!(args.job, "web");
                assert_eq!(args.groups, vec!["app", "cache"]);
                assert!(!args.auto_promote);
            }
            _ => panic!("expected redeploy"),
        }
    }

    #[test]
    fn test_parse_scale_requires_count() {
        assert!(Cli::try_parse_from(["pilot", "scale", "set", "web", "app"]).is_err());
        assert!(Cli::try_parse_from(["pilot", "scale", "get", "web", "app"]).is_ok());
        assert!(Cli::try_parse_from(["pilot", "scale", "up", "web", "app", "2"]).is_ok());
    }

    #[test]
    fn test_parse_drain_selector() {
        let cli = Cli::try_parse_from(["pilot", "drain", "--name", "worker-1"]).unwrap();
        match cli.command {
            Commands::Drain(args) => {
                assert_eq!(args.selector(), NodeSelector::Name("worker-1".to_string()))
            }
            _ => panic!("expected drain"),
        }

        let cli = Cli::try_parse_from(["pilot", "drain", "--self"]).unwrap();
        match cli.command {
            Commands::Drain(args) => assert_eq!(args.selector(), NodeSelector::Local),
            _ => panic!("expected drain"),
        }

        assert!(Cli::try_parse_from(["pilot", "drain"]).is_err());
        assert!(Cli::try_parse_from(["pilot", "drain", "--id", "n1", "--self"]).is_err());
    }

    #[test]
    fn test_parse_re_eval_target() {
        let cli = Cli::try_parse_from(["pilot", "re-eval", "web"]).unwrap();
        match cli.command {
            Commands::ReEval(args) => {
                assert_eq!(args.job.as_deref(), Some("web"));
                assert!(!args.all);
            }
            _ => panic!("expected re-eval"),
        }

        assert!(Cli::try_parse_from(["pilot", "re-eval", "--all"]).is_ok());
        assert!(Cli::try_parse_from(["pilot", "re-eval"]).is_err());
        assert!(Cli::try_parse_from(["pilot", "re-eval", "web", "--all"]).is_err());
        assert!(Cli::try_parse_from(["pilot", "gc"]).is_ok());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "pilot",
            "plan",
            "web.json",
            "--address",
            "https://nomad.internal:4646",
            "--full-ids",
        ])
        .unwrap();
        assert_eq!(cli.address, "https://nomad.internal:4646");
        assert!(cli.full_ids);
    }

    #[tokio::test]
    async fn test_read_json_job_file() {
        let path = std::env::temp_dir().join(format!("pilot-read-job-{}.json", std::process::id()));
        tokio::fs::write(
            &path,
            r#"{"Job": {"ID": "web", "Name": "web", "TaskGroups": [{"Name": "app", "Count": 2}]}}"#,
        )
        .await
        .unwrap();

        let job = read_job(&config(), &path).await.unwrap();
        tokio::fs::remove_file(&path).await.unwrap();

        assert_eq!(job.identifier(), "web");
        assert_eq!(job.group("app").map(|g| g.count), Some(2));
    }

    #[tokio::test]
    async fn test_read_missing_job_file() {
        let err = read_job(&config(), Path::new("/nonexistent/pilot/job.json"))
            .await
            .unwrap_err();
        assert!(format!("{:#}", err).contains("failed to read job file"));
    }
}
