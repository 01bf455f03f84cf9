//! Homepage fetching.
//!
//! - [`Fetcher`]: the narrow interface the runner calls
//! - [`HttpFetcher`]: `reqwest` implementation with a browser User-Agent and a
//!   fixed per-request timeout
//!
//! There is no retry: a failed fetch fails its source for this run.

use crate::error::{HarvestError, Result};
use crate::utils::truncate_for_log;
use reqwest::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, USER_AGENT};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

/// Desktop Chrome identification; some outlets reject obvious bots outright.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";

pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Retrieves the raw HTML of a page.
pub trait Fetcher {
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// [`Fetcher`] over a shared `reqwest` client.
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(user_agent)
                .map_err(|e| HarvestError::config(format!("invalid user agent: {e}")))?,
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| HarvestError::config(format!("cannot build HTTP client: {e}")))?;
        Ok(Self { client, timeout })
    }
}

impl fmt::Debug for HttpFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpFetcher")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Fetcher for HttpFetcher {
    #[instrument(level = "info", skip_all, fields(%url))]
    async fn fetch(&self, url: &str) -> Result<String> {
        let t0 = Instant::now();
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                HarvestError::fetch(url, format!("timed out after {:?}", self.timeout))
            } else {
                HarvestError::fetch(url, e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, elapsed_ms = t0.elapsed().as_millis() as u64, "Non-success status");
            return Err(HarvestError::fetch(url, format!("HTTP status {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| HarvestError::fetch(url, e))?;
        info!(
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched page"
        );
        debug!(preview = %truncate_for_log(&body, 200), "Page body");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn fetcher(timeout: Duration) -> HttpFetcher {
        HttpFetcher::new(DEFAULT_USER_AGENT, timeout).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_sends_browser_user_agent() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/")
                    .header("User-Agent", DEFAULT_USER_AGENT);
                then.status(200).body("<html><a href='/x'>X</a></html>");
            })
            .await;

        let body = fetcher(Duration::from_secs(5))
            .fetch(&server.url("/"))
            .await
            .unwrap();
        mock.assert_async().await;
        assert!(body.contains("href='/x'"));
    }

    #[tokio::test]
    async fn test_non_success_status_is_fetch_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/");
                then.status(503);
            })
            .await;

        let err = fetcher(Duration::from_secs(5))
            .fetch(&server.url("/"))
            .await
            .unwrap_err();
        assert!(matches!(err, HarvestError::Fetch { .. }));
        assert!(err.to_string().contains("503"), "{err}");
    }

    #[tokio::test]
    async fn test_slow_response_times_out() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/slow");
                then.status(200)
                    .delay(Duration::from_millis(1500))
                    .body("late");
            })
            .await;

        let err = fetcher(Duration::from_millis(200))
            .fetch(&server.url("/slow"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("timed out"), "{err}");
    }

    #[test]
    fn test_invalid_user_agent_is_config_error() {
        let err = HttpFetcher::new("bad\nagent", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, HarvestError::Config { .. }));
    }
}
