//! Plain HTTP retrieval of candidate image bytes
//!
//! One GET per candidate, browser-like User-Agent, bounded timeout, no
//! retries. Anything other than a 200 with a readable body is a
//! [`FetchError`] that the collector tallies and skips.

use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;
use tracing::trace;

/// Why a candidate URL produced no bytes
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// Request exceeded the configured timeout
    #[error("request timed out")]
    Timeout,

    /// Connection, DNS, TLS or request construction failure
    #[error("network error: {0}")]
    Network(String),

    /// Server answered with something other than 200
    #[error("unexpected HTTP status {0}")]
    Status(u16),

    /// Body could not be read to completion
    #[error("failed to read response body: {0}")]
    Body(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_body() || err.is_decode() {
            Self::Body(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

/// Source of raw bytes for a URL.
#[allow(async_fn_in_trait)]
pub trait Fetch {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// `reqwest`-backed fetcher shared by every product in a run.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    /// Wrap an existing client (tests point this at a mock server).
    #[must_use]
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            trace!(target: "catalog_scrape::fetcher", "{url} answered {status}");
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_body_on_200() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/a.png")
            .match_header("user-agent", "test-agent")
            .with_status(200)
            .with_body(b"PNGDATA")
            .create_async()
            .await;

        let fetcher = HttpFetcher::new("test-agent", Duration::from_secs(5)).unwrap();
        let body = fetcher.fetch(&format!("{}/a.png", server.url())).await;

        assert_eq!(body, Ok(b"PNGDATA".to_vec()));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_200_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/missing.png")
            .with_status(404)
            .create_async()
            .await;
        server
            .mock("GET", "/moved.png")
            .with_status(204)
            .create_async()
            .await;

        let fetcher = HttpFetcher::new("test-agent", Duration::from_secs(5)).unwrap();

        assert_eq!(
            fetcher.fetch(&format!("{}/missing.png", server.url())).await,
            Err(FetchError::Status(404))
        );
        assert_eq!(
            fetcher.fetch(&format!("{}/moved.png", server.url())).await,
            Err(FetchError::Status(204))
        );
    }

    #[tokio::test]
    async fn unreachable_host_is_a_network_error() {
        let fetcher = HttpFetcher::new("test-agent", Duration::from_secs(2)).unwrap();
        let result = fetcher.fetch("http://127.0.0.1:9/none.png").await;
        assert!(matches!(
            result,
            Err(FetchError::Network(_) | FetchError::Timeout)
        ));
    }
}
