//! Demo calls against the remote REST API.
//!
//! Failures never escape this module as errors: they are rendered into the
//! returned [`ApiResult`] the same way a successful body is.

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Url;
use thiserror::Error;

use super::models::{ApiResult, Method, PostData};

const SAMPLE_PATH: &str = "posts/1";
const POSTS_PATH: &str = "posts";

/// Status and body text of a remote response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteResponse {
    pub status: u16,
    pub body: String,
}

impl RemoteResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Outbound HTTP capability; `path` is relative to the remote base URL.
#[async_trait]
pub trait HttpFetcher: Send + Sync {
    async fn get(&self, path: &str) -> anyhow::Result<RemoteResponse>;

    async fn post_json(&self, path: &str, json: String) -> anyhow::Result<RemoteResponse>;
}

/// [`HttpFetcher`] over a shared `reqwest::Client` with its default timeouts.
#[derive(Clone)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
    base_url: Url,
}

impl ReqwestFetcher {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        // `Url::join` drops the last segment unless the base ends with a slash
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        let base_url = Url::parse(&normalized)
            .with_context(|| format!("invalid remote API base url '{}'", normalized))?;

        let client = reqwest::Client::builder()
            .user_agent(concat!("productapp/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self { client, base_url })
    }

    fn url(&self, path: &str) -> anyhow::Result<Url> {
        self.base_url
            .join(path)
            .with_context(|| format!("invalid remote path '{}'", path))
    }

    async fn read(response: reqwest::Response) -> anyhow::Result<RemoteResponse> {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .context("failed to read response body")?;
        Ok(RemoteResponse { status, body })
    }
}

#[async_trait]
impl HttpFetcher for ReqwestFetcher {
    async fn get(&self, path: &str) -> anyhow::Result<RemoteResponse> {
        let response = self.client.get(self.url(path)?).send().await?;
        Self::read(response).await
    }

    async fn post_json(&self, path: &str, json: String) -> anyhow::Result<RemoteResponse> {
        let response = self
            .client
            .post(self.url(path)?)
            .header(CONTENT_TYPE, "application/json")
            .body(json)
            .send()
            .await?;
        Self::read(response).await
    }
}

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("request failed: {0:#}")]
    Transport(anyhow::Error),

    /// The failed response's body is deliberately not carried along
    #[error("remote API responded with HTTP status {status}")]
    Status { status: u16 },
}

#[derive(Clone)]
pub struct ExternalApiProxy {
    fetcher: Arc<dyn HttpFetcher>,
}

impl ExternalApiProxy {
    pub fn new(fetcher: Arc<dyn HttpFetcher>) -> Self {
        Self { fetcher }
    }

    /// `GET posts/1`, returning the raw body or a `GET error: ...` message.
    pub async fn fetch_sample(&self) -> ApiResult {
        tracing::info!(method = "GET", path = SAMPLE_PATH, "calling remote API");

        let outcome = self
            .fetcher
            .get(SAMPLE_PATH)
            .await
            .map_err(ProxyError::Transport)
            .and_then(accept);

        match outcome {
            Ok(body) => {
                tracing::info!(method = "GET", response = %body, "remote API response");
                ApiResult::success(Method::Get, body)
            }
            Err(err) => {
                tracing::warn!(method = "GET", error = %err, "remote API call failed");
                ApiResult::failure(Method::Get, format!("GET error: {}", err))
            }
        }
    }

    /// `POST posts` with `post` as JSON, returning the raw body or an error message.
    pub async fn submit(&self, post: &PostData) -> ApiResult {
        let json = match serde_json::to_string(post) {
            Ok(json) => json,
            Err(err) => {
                let err = ProxyError::from(err);
                tracing::warn!(method = "POST", error = %err, "could not serialize post");
                return ApiResult::failure(Method::Post, err.to_string());
            }
        };

        tracing::info!(method = "POST", path = POSTS_PATH, request = %json, "calling remote API");

        let outcome = self
            .fetcher
            .post_json(POSTS_PATH, json)
            .await
            .map_err(ProxyError::Transport)
            .and_then(accept);

        match outcome {
            Ok(body) => {
                tracing::info!(method = "POST", response = %body, "remote API response");
                ApiResult::success(Method::Post, body)
            }
            Err(err) => {
                tracing::warn!(method = "POST", error = %err, "remote API call failed");
                ApiResult::failure(Method::Post, format!("POST error: {}", err))
            }
        }
    }
}

fn accept(response: RemoteResponse) -> Result<String, ProxyError> {
    if response.is_success() {
        Ok(response.body)
    } else {
        Err(ProxyError::Status {
            status: response.status,
        })
    }
}
