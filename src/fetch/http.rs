// src/fetch/http.rs

use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::Fetcher;
use crate::config::HttpConfig;
use crate::error::PipelineError;

/// `Fetcher` over a shared `reqwest::Client`. No retries, no caching.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(cfg: &HttpConfig) -> Result<Self, PipelineError> {
        let mut builder = Client::builder().user_agent(cfg.user_agent.clone()).gzip(true);
        if let Some(secs) = cfg.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| PipelineError::transport("<client>", e))?;
        Ok(Self { client })
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, PipelineError> {
        debug!("Fetching text from {}", url);
        let text = self
            .client
            .get(url.clone())
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(|e| PipelineError::transport(url.as_str(), e))?
            .text()
            .await
            .map_err(|e| PipelineError::transport(url.as_str(), e))?;
        Ok(text)
    }
}
