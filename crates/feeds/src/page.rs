//! Address page fetching.

use crate::error::FetchError;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// The explorer serves a reduced page to clients that do not look like a browser.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_10_1) \
     AppleWebKit/537.36 (HTML, like Gecko) Chrome/39.0.2171.95 Safari/537.36";

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Source of raw page markup.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Download `url` and return the response body as text.
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Fetches pages over HTTP with a browser-like `User-Agent`.
pub struct HttpPageSource {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpPageSource {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self { client, timeout })
    }

    fn map_err(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else {
            FetchError::Request(err)
        }
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        debug!("Fetching {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_err(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(self.timeout)
            } else {
                FetchError::Body(e)
            }
        })?;

        debug!("Fetched {} bytes", body.len());
        Ok(body)
    }
}
