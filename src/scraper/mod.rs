pub mod headlines;

#[cfg(test)]
mod tests;

use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep};
use tracing::{debug, error, warn};
use url::Url;

use crate::config::{ScraperConfig, resolve_zone};

// Shared by every client in the process so concurrent callers stay within
// one outbound budget.
static LAST_REQUEST_TIME: Mutex<Option<Instant>> = Mutex::const_new(None);

/// Build a Google News search URL for a keyword, sorted by latest.
#[inline]
pub fn news_search_url(topic: &str) -> String {
    let q = quote_plus(topic);
    format!("https://news.google.com/search?q={q}&tbs=sbd:1")
}

/// Build a Reddit search URL for a keyword, sorted by newest posts.
#[inline]
pub fn reddit_search_url(topic: &str) -> String {
    let q = quote_plus(topic);
    format!("https://www.reddit.com/search/?q={q}&sort=new")
}

// Search engines expect form-style encoding with '+' for spaces
fn quote_plus(input: &str) -> String {
    urlencoding::encode(input).replace("%20", "+")
}

#[derive(Debug, Serialize)]
struct UnlockerRequest<'a> {
    zone: &'a str,
    url: &'a str,
    format: &'a str,
    country: &'a str,
    render: bool,
}

/// Client for a BrightData-style web-unlocker proxy endpoint.
///
/// Applies a minimum interval between requests and retries transient
/// failures with exponential backoff.
#[derive(Debug)]
pub struct UnlockerClient {
    agent: ureq::Agent,
    endpoint: Url,
    api_key: String,
    zone: String,
    country: String,
    max_retries: u32,
    rate_limit: Duration,
}

impl UnlockerClient {
    #[inline]
    pub fn new(config: &ScraperConfig, api_key: impl Into<String>) -> Result<Self> {
        let endpoint = Url::parse(&config.endpoint)
            .with_context(|| format!("Invalid unlocker endpoint: {}", config.endpoint))?;

        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.timeout_seconds)))
            .build()
            .into();

        Ok(Self {
            agent,
            endpoint,
            api_key: api_key.into(),
            zone: resolve_zone(config),
            country: config.country.clone(),
            max_retries: config.max_retries,
            rate_limit: Duration::from_millis(config.rate_limit_ms),
        })
    }

    /// Fetch the rendered content of `url` through the unlocker proxy.
    #[inline]
    pub async fn fetch(&self, url: &str) -> Result<String> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(anyhow!("Invalid URL provided: {url}"));
        }

        self.apply_rate_limit().await;

        let mut last_error = None;

        for attempt in 1..=self.max_retries {
            if attempt > 1 {
                let delay = Duration::from_secs(2u64.pow(attempt - 1).min(10));
                debug!("Retrying fetch of {} in {:?} (attempt {})", url, delay, attempt);
                sleep(delay).await;
            }

            match self.try_fetch(url) {
                Ok(body) => {
                    debug!("Fetched {} ({} bytes, attempt {})", url, body.len(), attempt);
                    return Ok(body);
                }
                Err(e) if is_retryable_error(&e) => {
                    warn!(
                        "Retryable error fetching {} (attempt {}/{}): {}",
                        url, attempt, self.max_retries, e
                    );
                    last_error = Some(anyhow::Error::from(e));
                }
                Err(e) => {
                    error!("Non-retryable error fetching {}: {}", url, e);
                    return Err(anyhow::Error::from(e))
                        .with_context(|| format!("Failed to fetch {url} through unlocker"));
                }
            }
        }

        error!(
            "Retries exhausted after {} attempts fetching {}",
            self.max_retries, url
        );
        Err(last_error.unwrap_or_else(|| anyhow!("All retry attempts failed for {url}")))
    }

    /// Sleep until the minimum interval since the previous request has
    /// passed. The last-request timestamp is process-wide, so the interval
    /// holds across clients, not just within one.
    async fn apply_rate_limit(&self) {
        let mut last_request = LAST_REQUEST_TIME.lock().await;

        if let Some(last_time) = *last_request {
            let elapsed = last_time.elapsed();
            if elapsed < self.rate_limit {
                let sleep_duration = self.rate_limit - elapsed;
                debug!("Rate limiting: sleeping for {:?}", sleep_duration);
                sleep(sleep_duration).await;
            }
        }

        *last_request = Some(Instant::now());
    }

    fn try_fetch(&self, url: &str) -> Result<String, ureq::Error> {
        let request = UnlockerRequest {
            zone: &self.zone,
            url,
            format: "raw",
            country: &self.country,
            render: false,
        };

        self.agent
            .post(self.endpoint.as_str())
            .header("Authorization", &format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .send_json(&request)
            .and_then(|mut resp| resp.body_mut().read_to_string())
    }
}

fn is_retryable_error(error: &ureq::Error) -> bool {
    match error {
        ureq::Error::StatusCode(status) => *status >= 500 || *status == 429,
        ureq::Error::ConnectionFailed
        | ureq::Error::HostNotFound
        | ureq::Error::Timeout(_)
        | ureq::Error::Io(_) => true,
        _ => false,
    }
}
