//! One-shot job operations
//!
//! Single round trips with no watch attached: reading and changing task group
//! counts, restarting a job or one of its groups, and forcing evaluations.

use pilot_client::{QueryOptions, RegisterOptions};
use pilot_core::domain::job::Job;
use tracing::{error, info};

use crate::engine::Engine;
use crate::error::{DeployError, Result};

impl Engine {
    /// Current count of a task group
    pub async fn group_count(&self, job_name: &str, group: &str) -> Result<u32> {
        let job = self.fetch_job(job_name).await?;
        job.group(group)
            .map(|g| g.count)
            .ok_or_else(|| DeployError::GroupNotFound(group.to_string()))
    }

    /// Sets the count of a task group; returns false when it already matched
    pub async fn set_group_count(&self, job_name: &str, group: &str, count: u32) -> Result<bool> {
        let mut job = self.fetch_job(job_name).await?;
        let current = job
            .group(group)
            .map(|g| g.count)
            .ok_or_else(|| DeployError::GroupNotFound(group.to_string()))?;

        if current == count {
            return Ok(false);
        }

        self.scale(&mut job, group, current, count).await?;
        Ok(true)
    }

    /// Raises or lowers the count of a task group by `delta`; returns the new count
    pub async fn adjust_group_count(&self, job_name: &str, group: &str, delta: i64) -> Result<u32> {
        let mut job = self.fetch_job(job_name).await?;
        let current = job
            .group(group)
            .map(|g| g.count)
            .ok_or_else(|| DeployError::GroupNotFound(group.to_string()))?;

        let count = i64::from(current) + delta;
        let count = u32::try_from(count).map_err(|_| {
            DeployError::InvalidInput(format!("count cannot be less than zero (got {count})"))
        })?;

        self.scale(&mut job, group, current, count).await?;
        Ok(count)
    }

    /// Stops the job and registers it again
    pub async fn restart_job(&self, job_name: &str) -> Result<()> {
        let mut job = self.fetch_job(job_name).await?;

        info!("stopping job \"{}\"", job_name);
        self.client
            .deregister_job(job_name, false)
            .await
            .map_err(|e| DeployError::remote("job deregister failed", e))?;

        info!("starting job \"{}\"", job_name);
        job.stop = Some(false);
        self.register(&job).await
    }

    /// Restarts a task group by scaling it to zero and back
    pub async fn restart_group(&self, job_name: &str, group: &str) -> Result<()> {
        let mut job = self.fetch_job(job_name).await?;
        let previous = job
            .group(group)
            .map(|g| g.count)
            .ok_or_else(|| DeployError::GroupNotFound(group.to_string()))?;

        self.scale(&mut job, group, previous, 0).await?;
        self.scale(&mut job, group, 0, previous).await
    }

    /// Forces a new evaluation of a job; returns the evaluation ID
    pub async fn re_evaluate(&self, job_name: &str) -> Result<String> {
        info!("evaluating {}", job_name);
        self.client
            .force_evaluate(job_name)
            .await
            .map(|response| response.eval_id)
            .map_err(|e| {
                if e.is_not_found() {
                    DeployError::JobNotFound(job_name.to_string())
                } else {
                    DeployError::remote("job evaluate failed", e)
                }
            })
    }

    /// Forces a new evaluation of every job
    ///
    /// A failure on one job is logged and does not stop the others. Returns
    /// the IDs of the jobs that could not be evaluated.
    pub async fn re_evaluate_all(&self) -> Result<Vec<String>> {
        let jobs = self
            .client
            .list_jobs()
            .await
            .map_err(|e| DeployError::remote("failed to list jobs", e))?;

        let mut failed = Vec::new();
        for job in jobs {
            if let Err(e) = self.re_evaluate(&job.id).await {
                error!("  {}", e);
                failed.push(job.id);
            }
        }

        Ok(failed)
    }

    /// Reads a job that must already exist
    pub(crate) async fn fetch_job(&self, job_name: &str) -> Result<Job> {
        self.client
            .job_info(job_name, &QueryOptions::default())
            .await
            .map(|response| response.value)
            .map_err(|e| {
                if e.is_not_found() {
                    DeployError::JobNotFound(job_name.to_string())
                } else {
                    DeployError::remote("failed to get job info", e)
                }
            })
    }

    async fn scale(&self, job: &mut Job, group: &str, from: u32, to: u32) -> Result<()> {
        info!(
            "scaling group \"{}\" of job \"{}\" from {} to {}",
            group,
            job.identifier(),
            from,
            to
        );

        if let Some(task_group) = job.group_mut(group) {
            task_group.count = to;
        }
        self.register(job).await
    }

    async fn register(&self, job: &Job) -> Result<()> {
        self.client
            .register_job(job, RegisterOptions::default())
            .await
            .map_err(|e| DeployError::remote("job register failed", e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::config::EngineConfig;
    use crate::engine::Engine;
    use crate::error::DeployError;
    use crate::testing::{ScriptedControlPlane, job};
    use pilot_core::domain::job::JobType;
    use std::sync::Arc;

    fn setup() -> (Arc<ScriptedControlPlane>, Engine) {
        let client = Arc::new(ScriptedControlPlane::new().with_remote_job(job(
            "web",
            JobType::Service,
            &[("app", 3), ("worker", 1)],
        )));
        let engine = Engine::new(client.clone(), EngineConfig::default());
        (client, engine)
    }

    #[tokio::test]
    async fn test_group_count() {
        let (_, engine) = setup();
        assert_eq!(engine.group_count("web", "app").await.unwrap(), 3);
        assert!(matches!(
            engine.group_count("web", "nope").await,
            Err(DeployError::GroupNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_set_count_noop_when_unchanged() {
        let (client, engine) = setup();
        assert!(!engine.set_group_count("web", "app", 3).await.unwrap());
        assert!(client.registrations().is_empty());

        assert!(engine.set_group_count("web", "app", 5).await.unwrap());
        let registrations = client.registrations();
        assert_eq!(registrations[0].0.group("app").unwrap().count, 5);
    }

    #[tokio::test]
    async fn test_adjust_count_rejects_negative() {
        let (client, engine) = setup();
        assert_eq!(engine.adjust_group_count("web", "worker", 2).await.unwrap(), 3);

        let err = engine.adjust_group_count("web", "worker", -2).await.unwrap_err();
        assert!(matches!(err, DeployError::InvalidInput(_)));
        assert_eq!(client.registrations().len(), 1);
    }

    #[tokio::test]
    async fn test_restart_job_deregisters_then_registers() {
        let (client, engine) = setup();
        engine.restart_job("web").await.unwrap();

        assert_eq!(client.deregistrations(), vec![("web".to_string(), false)]);
        let registrations = client.registrations();
        assert_eq!(registrations.len(), 1);
        assert_eq!(registrations[0].0.stop, Some(false));
    }

    #[tokio::test]
    async fn test_restart_group_scales_to_zero_and_back() {
        let (client, engine) = setup();
        engine.restart_group("web", "app").await.unwrap();

        let counts: Vec<u32> = client
            .registrations()
            .iter()
            .map(|(job, _)| job.group("app").unwrap().count)
            .collect();
        assert_eq!(counts, vec![0, 3]);
    }

    #[tokio::test]
    async fn test_re_evaluate_single_job() {
        let (client, engine) = setup();
        assert_eq!(engine.re_evaluate("web").await.unwrap(), "eval-web");
        assert_eq!(client.forced_evaluations(), vec!["web".to_string()]);

        client.reject_evaluation("ghost");
        assert!(matches!(
            engine.re_evaluate("ghost").await,
            Err(DeployError::JobNotFound(name)) if name == "ghost"
        ));
    }

    #[tokio::test]
    async fn test_re_evaluate_all_continues_past_failures() {
        let (client, engine) = setup();
        client.set_jobs(&["api", "batch", "web"]);
        client.reject_evaluation("batch");

        let failed = engine.re_evaluate_all().await.unwrap();

        assert_eq!(failed, vec!["batch".to_string()]);
        assert_eq!(
            client.forced_evaluations(),
            vec!["api".to_string(), "web".to_string()]
        );
    }

    #[tokio::test]
    async fn test_missing_job() {
        let client = Arc::new(ScriptedControlPlane::new());
        let engine = Engine::new(client, EngineConfig::default());
        assert!(matches!(
            engine.restart_job("ghost").await,
            Err(DeployError::JobNotFound(_))
        ));
    }
}
