use crate::{ApiConfig, Error, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// One outbound GET against the content API, relative to its base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRequest {
    /// Path relative to the API root, e.g. `pages/5/`
    pub path: String,
    /// Query parameters in the order they are sent
    pub query: Vec<(String, String)>,
}

impl ResourceRequest {
    /// Creates a request for `path` with no query parameters
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
        }
    }

    /// Appends one query parameter
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }
}

/// The "fetch resource by descriptor" capability the client is built on.
///
/// Implementations return the decoded JSON body, [`Error::NotFound`] when the
/// remote reports absence, or any other error for a rejected call. They must
/// not retry.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs the request and returns the decoded response body
    async fn get(&self, request: &ResourceRequest) -> Result<Value>;
}

/// HTTP transport for the Wagtail API
pub struct HttpTransport {
    client: Client,
    base_url: Url,
}

impl HttpTransport {
    /// Creates a transport from validated configuration
    pub fn new(config: &ApiConfig) -> Result<Self> {
        config.validate()?;
        let base_url = config.base_url()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .gzip(true)
            .build()
            .map_err(Error::Network)?;
        Ok(Self { client, base_url })
    }

    /// Resolves a request path against the base URL
    pub fn url_for(&self, request: &ResourceRequest) -> Result<Url> {
        let mut url = self
            .base_url
            .join(request.path.trim_start_matches('/'))
            .map_err(|e| Error::InvalidRequest(format!("Cannot build URL for '{}': {e}", request.path)))?;
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.query);
        }
        Ok(url)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, request: &ResourceRequest) -> Result<Value> {
        let url = self.url_for(request)?;
        debug!("GET {}", url);

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();

        if !status.is_success() {
            if status == StatusCode::NOT_FOUND {
                return Err(Error::NotFound(format!("No resource at '{url}'")));
            }
            return Err(Error::Transport(format!(
                "Request failed with status code {}",
                status.as_u16()
            )));
        }

        let body = response.text().await?;
        info!("Fetched {} bytes from {}", body.len(), url);
        serde_json::from_str(&body)
            .map_err(|e| Error::MalformedResponse(format!("Response body is not JSON: {e}")))
    }
}
