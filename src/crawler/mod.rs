//! Crawler module for fetching and processing the class tree
//!
//! This module contains the crawling logic, including:
//! - HTTP fetching with retry logic
//! - Unit request scheduling and pacing
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod scheduler;

pub use coordinator::{run_crawl, Coordinator};
pub use fetcher::{build_http_client, fetch_url, fetch_with_retry, FetchResult, RetryPolicy};
pub use scheduler::{ScheduledRequest, Scheduler, UnitRequest};
