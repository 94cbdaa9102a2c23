//! Asset downloading with retry.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::Client;
use tokio::time::sleep;

use crate::api::SessionToken;
use crate::error::{Error, Result};

/// Raw byte transport.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch a URL, attaching the cookie header when a token is given.
    ///
    /// Any non-2xx status is an error.
    async fn get_bytes(&self, url: &str, token: Option<&SessionToken>) -> Result<Vec<u8>>;
}

/// HTTP transport sending browser-like headers.
pub struct HttpTransport {
    client: Client,
}

/// Headers a desktop browser sends when loading media.
fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::ACCEPT, HeaderValue::from_static("*/*"));
    headers.insert(
        header::ACCEPT_ENCODING,
        HeaderValue::from_static("gzip, deflate, br"),
    );
    headers.insert(header::ACCEPT_LANGUAGE, HeaderValue::from_static("ja"));
    headers
}

impl HttpTransport {
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .default_headers(browser_headers())
            .build()
            .map_err(|e| Error::Download(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get_bytes(&self, url: &str, token: Option<&SessionToken>) -> Result<Vec<u8>> {
        let mut request = self.client.get(url);

        if let Some(token) = token.filter(|t| !t.is_empty()) {
            request = request.header(header::COOKIE, token.as_str());
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Download(format!("STATUSCODE: {}", status.as_u16())));
        }

        let mut data = Vec::with_capacity(response.content_length().unwrap_or(0) as usize);
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| Error::Download(format!("Stream error: {}", e)))?;
            data.extend_from_slice(&chunk);
        }

        Ok(data)
    }
}

/// How often and how patiently to retry a failed download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts before giving up. `None` retries forever.
    pub max_attempts: Option<u32>,
    /// Pause between attempts.
    pub delay: Duration,
}

impl RetryPolicy {
    /// Retry forever, back to back.
    pub fn unbounded() -> Self {
        Self {
            max_attempts: None,
            delay: Duration::ZERO,
        }
    }

    /// Whether another attempt is allowed after `attempts` failures.
    pub fn should_retry(&self, attempts: u32) -> bool {
        self.max_attempts.map_or(true, |max| attempts < max)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// Fetches asset bytes, retrying transient failures per policy.
pub struct AssetFetcher {
    transport: Arc<dyn Transport>,
    policy: RetryPolicy,
    failures: AtomicU64,
}

impl AssetFetcher {
    pub fn new(transport: Arc<dyn Transport>, policy: RetryPolicy) -> Self {
        Self {
            transport,
            policy,
            failures: AtomicU64::new(0),
        }
    }

    /// Fetch a URL. With the default policy this only returns once it succeeds.
    pub async fn fetch(&self, url: &str, token: Option<&SessionToken>) -> Result<Vec<u8>> {
        let mut attempts = 0u32;

        loop {
            attempts = attempts.saturating_add(1);

            match self.transport.get_bytes(url, token).await {
                Ok(data) => return Ok(data),
                Err(e) => {
                    self.failures.fetch_add(1, Ordering::Relaxed);
                    tracing::warn!("{} (attempt {}, {})", e, attempts, url);

                    if !self.policy.should_retry(attempts) {
                        return Err(Error::RetriesExhausted {
                            url: url.to_string(),
                            attempts,
                        });
                    }

                    if !self.policy.delay.is_zero() {
                        sleep(self.policy.delay).await;
                    }
                }
            }
        }
    }

    /// Failed attempts across all fetches so far.
    pub fn failure_count(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }
}
