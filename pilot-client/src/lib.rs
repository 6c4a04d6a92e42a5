//! Pilot HTTP Client
//!
//! A type-safe HTTP client for the cluster scheduler's control-plane API.
//!
//! Reads that support blocking queries take [`QueryOptions`] and return a
//! [`QueryResponse`] carrying the index the server observed, so callers can
//! long-poll for state transitions.
//!
//! # Example
//!
//! ```no_run
//! use pilot_client::{NomadClient, QueryOptions};
//!
//! # async fn example() -> pilot_client::Result<()> {
//! let client = NomadClient::new("http://127.0.0.1:4646").with_region("eu-west");
//!
//! let job = client.job_info("web", &QueryOptions::default()).await?;
//! println!("job {} is {:?} at index {}", job.value.name, job.value.status, job.meta.last_index);
//! # Ok(())
//! # }
//! ```

mod allocations;
mod control_plane;
mod deployments;
pub mod error;
mod evaluations;
mod jobs;
mod nodes;
mod system;

// Re-export commonly used types
pub use control_plane::{ControlPlane, QueryMeta, QueryOptions, QueryResponse, RegisterOptions};
pub use error::{ClientError, Result};

use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;

/// Response header carrying the raft index of a read
const INDEX_HEADER: &str = "X-Nomad-Index";

/// Request header carrying the ACL token
const TOKEN_HEADER: &str = "X-Nomad-Token";

/// HTTP client for the control-plane API
///
/// Region, namespace and token are fixed when the client is built. A session
/// that needs different settings builds its own client instead of mutating a
/// shared one.
#[derive(Debug, Clone)]
pub struct NomadClient {
    /// Base URL of the control plane (e.g., "http://127.0.0.1:4646")
    base_url: String,
    /// HTTP client instance
    client: Client,
    region: Option<String>,
    namespace: Option<String>,
    token: Option<String>,
}

impl NomadClient {
    /// Create a new control-plane client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the control-plane API (e.g., "http://127.0.0.1:4646")
    ///
    /// # Example
    /// ```
    /// use pilot_client::NomadClient;
    ///
    /// let client = NomadClient::new("http://127.0.0.1:4646");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new client with a custom HTTP client
    ///
    /// This allows you to configure proxies, TLS settings, etc. Any request
    /// timeout must exceed the longest blocking-query wait in use.
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the control-plane API
    /// * `client` - A configured reqwest Client
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            region: None,
            namespace: None,
            token: None,
        }
    }

    /// Scope every request to a region
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Scope every request to a namespace
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Authenticate every request with an ACL token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Get the base URL of the control plane
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    // =============================================================================
    // Request Builders
    // =============================================================================

    /// Build the URL of an API path, percent-encoding every segment
    ///
    /// IDs are passed as single segments, so a `/`, `?` or `#` inside one
    /// cannot address a different resource.
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let invalid = |reason: String| ClientError::InvalidAddress {
            address: self.base_url.clone(),
            reason,
        };

        let mut url = Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| invalid("cannot be a base URL".to_string()))?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    /// Start a request against an API path, applying region, namespace and token
    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        let url = self.url(segments)?;
        let mut builder = self.client.request(method, url);

        if let Some(region) = &self.region {
            builder = builder.query(&[("region", region)]);
        }
        if let Some(namespace) = &self.namespace {
            builder = builder.query(&[("namespace", namespace)]);
        }
        if let Some(token) = &self.token {
            builder = builder.header(TOKEN_HEADER, token);
        }

        Ok(builder)
    }

    /// Start a blocking read against an API path
    fn query(&self, segments: &[&str], options: &QueryOptions) -> Result<RequestBuilder> {
        let mut builder = self.request(Method::GET, segments)?;

        if options.wait_index > 0 {
            builder = builder.query(&[("index", options.wait_index.to_string())]);
        }
        if let Some(wait) = options.wait_time {
            builder = builder.query(&[("wait", format!("{}ms", wait.as_millis()))]);
        }

        Ok(builder)
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// This method checks the status code and returns an appropriate error if
    /// the request failed, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("invalid JSON: {}", e)))
    }

    /// Handle a response whose body carries nothing of interest
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        Ok(())
    }

    /// Handle a blocking-query response, capturing the index header
    async fn handle_query_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<QueryResponse<T>> {
        let meta = QueryMeta {
            last_index: parse_index(response.headers().get(INDEX_HEADER)),
        };
        let value = self.handle_response(response).await?;

        Ok(QueryResponse { value, meta })
    }
}

fn parse_index(header: Option<&reqwest::header::HeaderValue>) -> u64 {
    header
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse().ok())
        .unwrap_or(0)
}
