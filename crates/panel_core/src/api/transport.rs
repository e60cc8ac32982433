//! HTTP transport used by the dispatcher.

use crate::error::PanelError;
use async_trait::async_trait;
use std::time::Duration;
use url::Url;

/// A completed HTTP exchange as seen by the response hooks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// Final URL of the response, after any redirects
    pub url: String,
    /// HTTP status code
    pub status: u16,
    /// Response body decoded as text
    pub body: String,
}

/// Issues GET requests for the dispatcher.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Performs a GET on `path` (which starts with the API prefix).
    async fn get(&self, path: &str) -> Result<ApiResponse, PanelError>;
}

/// [`HttpTransport`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    base_url: Url,
    http: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a transport that resolves request paths against `base_url`.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, PanelError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves an absolute request path against the base URL.
    pub fn resolve(&self, path: &str) -> Result<Url, PanelError> {
        Ok(self.base_url.join(path)?)
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, path: &str) -> Result<ApiResponse, PanelError> {
        let url = self.resolve(path)?;
        let response = self.http.get(url).send().await?;
        let final_url = response.url().to_string();
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(ApiResponse {
            url: final_url,
            status,
            body,
        })
    }
}
