//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with proper user agent strings
//! - GET requests returning raw bodies (HTML pages and PDFs alike)
//! - Retry logic for transient failures
//! - Error classification

use crate::config::{Config, CrawlerConfig};
use reqwest::Client;
use std::time::Duration;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the resource
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Content-Type header value
        content_type: String,
        /// Raw response body
        body: Vec<u8>,
    },

    /// Non-success HTTP status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, etc.)
    NetworkError {
        /// Error description
        error: String,
        /// Whether another attempt may succeed
        retryable: bool,
    },
}

impl FetchResult {
    /// Returns true for failures worth another attempt: 5xx and timeouts
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Success { .. } => false,
            Self::HttpError { status_code } => *status_code >= 500,
            Self::NetworkError { retryable, .. } => *retryable,
        }
    }

    /// Human-readable failure description, or None on success
    pub fn failure_reason(&self) -> Option<String> {
        match self {
            Self::Success { .. } => None,
            Self::HttpError { status_code } => Some(format!("HTTP {}", status_code)),
            Self::NetworkError { error, .. } => Some(error.clone()),
        }
    }
}

/// How often and how patiently to retry transient failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub delay: Duration,
}

impl From<&CrawlerConfig> for RetryPolicy {
    fn from(config: &CrawlerConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            delay: Duration::from_millis(config.retry_delay_ms),
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use asl_harvest::config::Config;
/// use asl_harvest::crawler::build_http_client;
///
/// let client = build_http_client(&Config::default()).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent_string())
        .timeout(Duration::from_secs(config.crawler.request_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL once
///
/// | Condition | Result |
/// |-----------|--------|
/// | HTTP 2xx | Success |
/// | Other HTTP status | HttpError (retryable if 5xx) |
/// | Timeout | NetworkError, retryable |
/// | Connection refused | NetworkError, not retryable |
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    match client.get(url).send().await {
        Ok(response) => {
            let status = response.status();
            let final_url = response.url().to_string();

            if !status.is_success() {
                return FetchResult::HttpError {
                    status_code: status.as_u16(),
                };
            }

            let content_type = response
                .headers()
                .get("content-type")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("")
                .to_string();

            match response.bytes().await {
                Ok(body) => FetchResult::Success {
                    final_url,
                    status_code: status.as_u16(),
                    content_type,
                    body: body.to_vec(),
                },
                Err(e) => FetchResult::NetworkError {
                    error: e.to_string(),
                    retryable: e.is_timeout(),
                },
            }
        }
        Err(e) => {
            if e.is_timeout() {
                FetchResult::NetworkError {
                    error: "Request timeout".to_string(),
                    retryable: true,
                }
            } else if e.is_connect() {
                FetchResult::NetworkError {
                    error: "Connection refused".to_string(),
                    retryable: false,
                }
            } else {
                FetchResult::NetworkError {
                    error: e.to_string(),
                    retryable: false,
                }
            }
        }
    }
}

/// Fetches a URL, retrying timeouts and 5xx responses per `policy`
pub async fn fetch_with_retry(client: &Client, url: &str, policy: &RetryPolicy) -> FetchResult {
    let mut attempt = 0;
    loop {
        let result = fetch_url(client, url).await;
        if !result.is_retryable() || attempt >= policy.max_retries {
            return result;
        }

        attempt += 1;
        tracing::debug!(
            "Retrying {} (attempt {} of {}) after {}",
            url,
            attempt,
            policy.max_retries,
            result.failure_reason().unwrap_or_default()
        );
        tokio::time::sleep(policy.delay).await;
    }
}
