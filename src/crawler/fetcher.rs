//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests, including:
//! - Building the HTTP client from configuration
//! - GET requests with a bounded, fixed-delay retry loop
//!
//! Non-success statuses and transport errors are treated alike: both are
//! reported and retried after the same delay until the budget runs out.

use crate::config::FetchConfig;
use crate::reporter::Reporter;
use reqwest::Client;
use std::time::Duration;

/// User agent sent with every request
const USER_AGENT: &str = concat!("course-sheet/", env!("CARGO_PKG_VERSION"));

/// How many times to retry a request and how long to wait in between
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt; total attempts are `max_retries + 1`
    pub max_retries: u32,

    /// Fixed wait before each retry
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            delay: Duration::from_secs(30),
        }
    }
}

impl From<&FetchConfig> for RetryPolicy {
    fn from(config: &FetchConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            delay: config.retry_delay(),
        }
    }
}

/// Result of a fetch operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// A response with a success status was received
    Success {
        body: String,
        /// Delayed retries performed before succeeding
        retries: u32,
        /// Total time spent waiting between attempts
        waited: Duration,
    },

    /// Every attempt failed
    Exhausted {
        /// Status of the last response, `None` if it never arrived
        last_status: Option<u16>,
        /// Body of the last failed response, empty if there was none
        last_body: String,
        retries: u32,
        waited: Duration,
    },
}

impl FetchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Success { .. })
    }

    pub fn retries(&self) -> u32 {
        match self {
            FetchOutcome::Success { retries, .. } | FetchOutcome::Exhausted { retries, .. } => {
                *retries
            }
        }
    }

    /// The successful body, or an empty string
    pub fn body_or_empty(self) -> String {
        match self {
            FetchOutcome::Success { body, .. } => body,
            FetchOutcome::Exhausted { .. } => String::new(),
        }
    }

    /// The successful body, or whatever the last failed response carried
    pub fn body_or_last(self) -> String {
        match self {
            FetchOutcome::Success { body, .. } => body,
            FetchOutcome::Exhausted { last_body, .. } => last_body,
        }
    }
}

/// A single failed attempt
enum AttemptFailure {
    Status { code: u16, body: String },
    Transport(reqwest::Error),
}

/// Builds an HTTP client with the configured timeout and TLS policy
pub fn build_http_client(config: &FetchConfig) -> Result<Client, reqwest::Error> {
    if config.accept_invalid_certs {
        tracing::warn!("TLS certificate validation is disabled by configuration");
    }

    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(config.timeout())
        .connect_timeout(Duration::from_secs(10))
        .danger_accept_invalid_certs(config.accept_invalid_certs)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL, retrying failed attempts with a fixed delay
///
/// # Retry Logic
///
/// | Condition | Action |
/// |-----------|--------|
/// | HTTP 2xx | Return body |
/// | Any other status | Warn, wait `delay`, retry while budget remains |
/// | Transport error | Warn, wait `delay`, retry while budget remains |
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
/// * `policy` - Retry budget and delay
/// * `reporter` - Receives one warning per failed attempt
///
/// # Returns
///
/// `FetchOutcome::Success` with the body, or `FetchOutcome::Exhausted`
/// once `policy.max_retries + 1` attempts have failed.
pub async fn fetch_with_retry(
    client: &Client,
    url: &str,
    policy: RetryPolicy,
    reporter: &dyn Reporter,
) -> FetchOutcome {
    let mut retries = 0;
    let mut waited = Duration::ZERO;

    loop {
        let failure = match attempt(client, url).await {
            Ok(body) => {
                return FetchOutcome::Success {
                    body,
                    retries,
                    waited,
                }
            }
            Err(failure) => failure,
        };

        match &failure {
            AttemptFailure::Status { code, .. } => {
                reporter.warn(&format!("response status code not ok {} for {}", code, url));
            }
            AttemptFailure::Transport(e) => {
                reporter.warn(&format!("request failed for {}: {}", url, e));
            }
        }

        if retries >= policy.max_retries {
            let (last_status, last_body) = match failure {
                AttemptFailure::Status { code, body } => (Some(code), body),
                AttemptFailure::Transport(_) => (None, String::new()),
            };
            return FetchOutcome::Exhausted {
                last_status,
                last_body,
                retries,
                waited,
            };
        }

        tracing::debug!(
            "Retrying {} in {:?} ({}/{})",
            url,
            policy.delay,
            retries + 1,
            policy.max_retries
        );
        tokio::time::sleep(policy.delay).await;
        waited += policy.delay;
        retries += 1;
    }
}

/// Performs one GET request
async fn attempt(client: &Client, url: &str) -> Result<String, AttemptFailure> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(AttemptFailure::Transport)?;
    let status = response.status();
    let body = response.text().await.map_err(AttemptFailure::Transport)?;

    if status.is_success() {
        Ok(body)
    } else {
        Err(AttemptFailure::Status {
            code: status.as_u16(),
            body,
        })
    }
}
