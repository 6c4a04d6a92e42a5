//! Configuration module
//!
//! Connection settings for the scheduler and the engine built on top of them.

use anyhow::{Result, bail};
use pilot_client::NomadClient;
use pilot_core::domain::job::Job;
use pilot_engine::{Engine, EngineConfig};
use std::sync::Arc;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Address of the scheduler's HTTP API
    pub address: String,
    pub region: Option<String>,
    pub namespace: Option<String>,
    pub token: Option<String>,
    /// Print full identifiers in log output
    pub full_ids: bool,
}

impl Config {
    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.address.trim().is_empty() {
            bail!("address cannot be empty");
        }

        if !self.address.starts_with("http://") && !self.address.starts_with("https://") {
            bail!(
                "address must start with http:// or https:// (got {})",
                self.address
            );
        }

        Ok(())
    }

    /// Client scoped to the configured region and namespace
    pub fn client(&self) -> NomadClient {
        self.scoped_client(self.region.as_deref(), self.namespace.as_deref())
    }

    /// Client scoped to the job's own region and namespace, falling back to
    /// the configured ones
    pub fn client_for(&self, job: &Job) -> NomadClient {
        self.scoped_client(
            job.region.as_deref().or(self.region.as_deref()),
            job.namespace.as_deref().or(self.namespace.as_deref()),
        )
    }

    pub fn engine(&self, client: NomadClient) -> Engine {
        let engine_config = EngineConfig::default().with_full_ids(self.full_ids);
        Engine::new(Arc::new(client), engine_config)
    }

    fn scoped_client(&self, region: Option<&str>, namespace: Option<&str>) -> NomadClient {
        let mut client = NomadClient::new(&self.address);
        if let Some(region) = region {
            client = client.with_region(region);
        }
        if let Some(namespace) = namespace {
            client = client.with_namespace(namespace);
        }
        if let Some(token) = &self.token {
            client = client.with_token(token);
        }
        client
    }
}
