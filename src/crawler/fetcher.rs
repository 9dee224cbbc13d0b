//! HTTP fetching for pages and files
//!
//! One `reqwest::Client` serves the whole crawl. Pages are fetched as
//! decoded text (the response's Content-Type charset is honored, with a
//! UTF-8 fallback); files are fetched as raw bytes. Transient failures
//! (HTTP 5xx, timeouts, connection errors) are retried here with a bounded
//! attempt count; the crawl loop itself never retries.

use crate::{MagpieError, Result};
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Attempts per request before giving up
const MAX_ATTEMPTS: u32 = 3;

/// Delay between retry attempts
const RETRY_DELAY: Duration = Duration::from_secs(5);

/// Builds the HTTP client used for every request in a run
pub fn build_http_client(user_agent: &str) -> std::result::Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches pages and files for the crawl engine
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    /// Wraps an externally built client (the injection point for tests and
    /// library embedders)
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Fetches a page and decodes it to text
    pub async fn fetch_text(&self, url: &Url) -> Result<String> {
        let response = self.get_with_retry(url).await?;
        response.text().await.map_err(|e| MagpieError::Http {
            url: url.to_string(),
            source: e,
        })
    }

    /// Fetches a file's raw bytes
    pub async fn fetch_bytes(&self, url: &Url) -> Result<Vec<u8>> {
        let response = self.get_with_retry(url).await?;
        let bytes = response.bytes().await.map_err(|e| MagpieError::Http {
            url: url.to_string(),
            source: e,
        })?;
        Ok(bytes.to_vec())
    }

    /// Sends a GET, retrying transient failures
    ///
    /// Retried: HTTP 5xx, timeouts, connection errors. Everything else
    /// fails on the first attempt.
    async fn get_with_retry(&self, url: &Url) -> Result<reqwest::Response> {
        let mut last_error = String::new();

        for attempt in 1..=MAX_ATTEMPTS {
            if attempt > 1 {
                tokio::time::sleep(RETRY_DELAY).await;
            }

            match self.client.get(url.clone()).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response);
                    }
                    if status.is_server_error() {
                        tracing::debug!(
                            "HTTP {} from {} (attempt {}/{})",
                            status,
                            url,
                            attempt,
                            MAX_ATTEMPTS
                        );
                        last_error = format!("HTTP {}", status);
                        continue;
                    }
                    return Err(MagpieError::HttpStatus {
                        url: url.to_string(),
                        status: status.as_u16(),
                    });
                }
                Err(e) if e.is_timeout() || e.is_connect() => {
                    tracing::debug!(
                        "Transient error fetching {} (attempt {}/{}): {}",
                        url,
                        attempt,
                        MAX_ATTEMPTS,
                        e
                    );
                    last_error = e.to_string();
                }
                Err(e) => {
                    return Err(MagpieError::Http {
                        url: url.to_string(),
                        source: e,
                    })
                }
            }
        }

        Err(MagpieError::RetriesExhausted {
            url: url.to_string(),
            attempts: MAX_ATTEMPTS,
            message: last_error,
        })
    }
}
