//! Page fetching with timeouts and exponential backoff.
//!
//! - [`FetchPage`]: core trait, "give me the HTML at this URL"
//! - [`HttpFetcher`]: `reqwest` implementation with a user agent and per-request timeout
//! - [`RetryFetch`]: decorator that retries any [`FetchPage`] with backoff
//!
//! # Retry Strategy
//!
//! ```text
//! delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..250ms)
//! ```

use crate::config::HttpSettings;
use crate::error::ScrapeError;
use rand::{Rng, rng};
use std::fmt;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, error, instrument, warn};

/// Something that can turn a URL into an HTML document.
pub trait FetchPage {
    async fn fetch(&self, url: &str) -> Result<String, ScrapeError>;
}

/// Plain HTTP GET over a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(settings: &HttpSettings) -> Result<Self, ScrapeError> {
        let client = reqwest::Client::builder()
            .user_agent(settings.user_agent.clone())
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self { client })
    }
}

impl FetchPage for HttpFetcher {
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, url: &str) -> Result<String, ScrapeError> {
        let t0 = Instant::now();
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let body = response.text().await?;
        debug!(
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched page"
        );
        Ok(body)
    }
}

/// Wrapper that adds exponential backoff retry logic to any [`FetchPage`].
pub struct RetryFetch<T> {
    inner: T,
    max_retries: usize,
    base_delay: Duration,
    max_delay: Duration,
}

impl<T: FetchPage> RetryFetch<T> {
    pub fn new(inner: T, max_retries: usize, base_delay: Duration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: Duration::from_secs(30),
        }
    }

    /// Delay before retry number `attempt` (1-based), without jitter.
    fn backoff(&self, attempt: usize) -> Duration {
        let shift = (attempt.saturating_sub(1)).min(16) as u32;
        self.base_delay
            .saturating_mul(1 << shift)
            .min(self.max_delay)
    }
}

impl<T> fmt::Debug for RetryFetch<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryFetch")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl<T: FetchPage> FetchPage for RetryFetch<T> {
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, url: &str) -> Result<String, ScrapeError> {
        let mut attempt = 0usize;
        loop {
            match self.inner.fetch(url).await {
                Ok(body) => return Ok(body),
                Err(e) => {
                    attempt += 1;
                    if attempt > self.max_retries || !is_retryable(&e) {
                        error!(attempt, max = self.max_retries, error = %e, "fetch() giving up");
                        return Err(e);
                    }
                    let jitter_ms: u64 = rng().random_range(0..=250);
                    let delay = self.backoff(attempt) + Duration::from_millis(jitter_ms);
                    warn!(attempt, max = self.max_retries, ?delay, error = %e, "fetch() attempt failed; backing off");
                    sleep(delay).await;
                }
            }
        }
    }
}

/// Client errors other than 408/429 will not change on retry.
fn is_retryable(e: &ScrapeError) -> bool {
    match e {
        ScrapeError::Http(_) => true,
        ScrapeError::Status { status, .. } => *status >= 500 || *status == 408 || *status == 429,
        _ => false,
    }
}

/// Build the fetcher used by every outlet from the HTTP settings.
pub fn build_fetcher(settings: &HttpSettings) -> Result<RetryFetch<HttpFetcher>, ScrapeError> {
    Ok(RetryFetch::new(
        HttpFetcher::new(settings)?,
        settings.max_retries,
        Duration::from_millis(settings.base_delay_ms),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Flaky {
        failures: usize,
        status: u16,
        calls: AtomicUsize,
    }

    impl FetchPage for Flaky {
        async fn fetch(&self, url: &str) -> Result<String, ScrapeError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                Err(ScrapeError::Status {
                    status: self.status,
                    url: url.to_string(),
                })
            } else {
                Ok("<html></html>".to_string())
            }
        }
    }

    fn flaky(failures: usize, status: u16) -> Flaky {
        Flaky {
            failures,
            status,
            calls: AtomicUsize::new(0),
        }
    }

    #[tokio::test]
    async fn test_retry_recovers_from_server_errors() {
        let fetcher = RetryFetch::new(flaky(2, 503), 3, Duration::from_millis(1));
        assert!(fetcher.fetch("https://example.com").await.is_ok());
        assert_eq!(fetcher.inner.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_budget_is_bounded() {
        let fetcher = RetryFetch::new(flaky(10, 500), 2, Duration::from_millis(1));
        assert!(fetcher.fetch("https://example.com").await.is_err());
        assert_eq!(fetcher.inner.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_not_found_is_not_retried() {
        let fetcher = RetryFetch::new(flaky(10, 404), 5, Duration::from_millis(1));
        assert!(fetcher.fetch("https://example.com").await.is_err());
        assert_eq!(fetcher.inner.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let fetcher = RetryFetch::new(flaky(0, 500), 5, Duration::from_secs(1));
        assert_eq!(fetcher.backoff(1), Duration::from_secs(1));
        assert_eq!(fetcher.backoff(2), Duration::from_secs(2));
        assert_eq!(fetcher.backoff(3), Duration::from_secs(4));
        assert_eq!(fetcher.backoff(10), Duration::from_secs(30));
    }
}
