//! reqwest-backed implementation of the Fetch seam.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;

use townbeat_common::{Config, FeedError, Fetch, FetchedDoc, FetchedHead, Result};

/// Real HTTP client. Two reqwest clients: one with the full fetch timeout
/// for GET, one with the short probe timeout for HEAD and root probes.
pub struct HttpFetcher {
    fetch_client: reqwest::Client,
    probe_client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            fetch_client: build_client(&config.user_agent, config.fetch_timeout)?,
            probe_client: build_client(&config.user_agent, config.probe_timeout)?,
        })
    }
}

fn build_client(user_agent: &str, timeout: Duration) -> anyhow::Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .build()?)
}

fn map_send_error(url: &str, e: reqwest::Error) -> FeedError {
    FeedError::Transport(format!("{url}: {e}"))
}

fn content_type_of(resp: &reqwest::Response) -> Option<String> {
    resp.headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}

async fn get_with(client: &reqwest::Client, url: &str) -> Result<FetchedDoc> {
    let resp = client
        .get(url)
        .send()
        .await
        .map_err(|e| map_send_error(url, e))?;

    if resp.status() == StatusCode::NOT_FOUND {
        return Err(FeedError::NotFound(url.to_string()));
    }

    let status = resp.status().as_u16();
    let content_type = content_type_of(&resp);
    let final_url = resp.url().to_string();
    let body = resp.text().await.map_err(|e| map_send_error(url, e))?;

    debug!(url, status, bytes = body.len(), "GET complete");
    Ok(FetchedDoc {
        url: final_url,
        status,
        content_type,
        body,
    })
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn get(&self, url: &str) -> Result<FetchedDoc> {
        get_with(&self.fetch_client, url).await
    }

    async fn head(&self, url: &str) -> Result<FetchedHead> {
        let resp = self
            .probe_client
            .head(url)
            .send()
            .await
            .map_err(|e| map_send_error(url, e))?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Err(FeedError::NotFound(url.to_string()));
        }

        debug!(url, status = resp.status().as_u16(), "HEAD complete");
        Ok(FetchedHead {
            url: resp.url().to_string(),
            status: resp.status().as_u16(),
            content_type: content_type_of(&resp),
        })
    }

    async fn probe(&self, url: &str) -> Result<FetchedDoc> {
        get_with(&self.probe_client, url).await
    }
}
