//! HTTP implementation of [`GraphBackend`]

use crate::backend::GraphBackend;
use crate::error::BackendError;
use async_trait::async_trait;
use explorer_graph::{EngineResponse, ProjectId};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use std::time::Duration;

/// Engine API client over HTTP/JSON
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    api_root: Url,
}

impl HttpBackend {
    /// Create a client for `api_root` (e.g. `http://localhost:58236/api`)
    ///
    /// # Errors
    /// - `BackendError::InvalidUrl` if the root is not an http(s) url
    /// - `BackendError::Transport` if the client cannot be built
    pub fn new(api_root: &str, timeout: Option<Duration>) -> Result<Self, BackendError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Self::with_client(builder.build()?, api_root)
    }

    /// Wrap a preconfigured client
    ///
    /// # Errors
    /// - `BackendError::InvalidUrl` if the root is not an http(s) url
    pub fn with_client(client: Client, api_root: &str) -> Result<Self, BackendError> {
        let invalid = || BackendError::InvalidUrl(api_root.to_string());
        let root = Url::parse(api_root).map_err(|_| invalid())?;
        if !matches!(root.scheme(), "http" | "https") || root.cannot_be_a_base() {
            return Err(invalid());
        }
        Ok(Self {
            client,
            api_root: root,
        })
    }

    /// Root all engine paths hang off
    #[inline]
    #[must_use]
    pub fn api_root(&self) -> &str {
        self.api_root.as_str()
    }

    /// `{api_root}/engine/{project}/{resource}`, with the project id percent-encoded
    ///
    /// # Errors
    /// - `BackendError::InvalidUrl` if the root cannot take path segments
    pub fn engine_url(&self, project: &ProjectId, resource: &str) -> Result<Url, BackendError> {
        let mut url = self.api_root.clone();
        url.path_segments_mut()
            .map_err(|()| BackendError::InvalidUrl(self.api_root.to_string()))?
            .pop_if_empty()
            .extend(["engine", project.as_str(), resource]);
        Ok(url)
    }

    async fn get(&self, url: Url, since: Option<i64>) -> Result<EngineResponse, BackendError> {
        let mut request = self
            .client
            .get(url.clone())
            .header(CONTENT_TYPE, "application/json");
        if let Some(since) = since {
            request = request.query(&[("since", since)]);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| BackendError::Malformed {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl GraphBackend for HttpBackend {
    async fn nodes_since(
        &self,
        project: &ProjectId,
        since: i64,
    ) -> Result<EngineResponse, BackendError> {
        tracing::trace!(project = %project, since, "requesting nodes");
        self.get(self.engine_url(project, "nodes")?, Some(since)).await
    }

    async fn edges_since(
        &self,
        project: &ProjectId,
        since: i64,
    ) -> Result<EngineResponse, BackendError> {
        tracing::trace!(project = %project, since, "requesting edges");
        self.get(self.engine_url(project, "edges")?, Some(since)).await
    }

    async fn explore(&self, project: &ProjectId) -> Result<EngineResponse, BackendError> {
        tracing::trace!(project = %project, "requesting explore");
        self.get(self.engine_url(project, "explore")?, None).await
    }
}
