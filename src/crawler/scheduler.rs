//! Scheduler for unit page requests
//!
//! This module handles:
//! - The frontier of unit requests, in contents-page order
//! - Global concurrency limiting via a semaphore
//! - A minimum spacing between consecutive request starts

use crate::config::CrawlerConfig;
use crate::parse::ClassEntry;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// One unit page to fetch, tagged with its place in the hierarchy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitRequest {
    pub class_name: String,
    pub unit_name: String,
    pub url: String,
}

/// A request cleared to start, holding a concurrency slot
pub struct ScheduledRequest {
    /// The unit to fetch
    pub request: UnitRequest,

    /// Released when the unit finishes processing
    pub permit: OwnedSemaphorePermit,
}

/// Hands out unit requests under the concurrency and pacing limits
pub struct Scheduler {
    /// Global semaphore for limiting units in flight
    semaphore: Arc<Semaphore>,

    /// Requests not yet started
    frontier: VecDeque<UnitRequest>,

    /// Minimum time between two request starts
    request_delay: Duration,

    /// When the previous request was handed out
    last_start: Option<Instant>,
}

impl Scheduler {
    pub fn new(config: &CrawlerConfig, requests: Vec<UnitRequest>) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(config.max_concurrent_units as usize)),
            frontier: requests.into(),
            request_delay: Duration::from_millis(config.request_delay_ms),
            last_start: None,
        }
    }

    /// Builds the frontier from parsed classes, one request per unit
    pub fn from_classes(config: &CrawlerConfig, classes: &[ClassEntry]) -> Self {
        let requests = classes
            .iter()
            .flat_map(|class| {
                class.units.iter().map(move |unit| UnitRequest {
                    class_name: class.name.clone(),
                    unit_name: unit.name.clone(),
                    url: unit.url.clone(),
                })
            })
            .collect();
        Self::new(config, requests)
    }

    pub fn frontier_size(&self) -> usize {
        self.frontier.len()
    }

    /// Waits for a free slot and the pacing delay, then returns the next request
    ///
    /// # Returns
    ///
    /// * `Some(ScheduledRequest)` - A request that may start now
    /// * `None` - The frontier is empty
    pub async fn next_request(&mut self) -> Option<ScheduledRequest> {
        if self.frontier.is_empty() {
            return None;
        }

        let permit = self.semaphore.clone().acquire_owned().await.ok()?;

        if let Some(last) = self.last_start {
            let elapsed = last.elapsed();
            if elapsed < self.request_delay {
                tokio::time::sleep(self.request_delay - elapsed).await;
            }
        }

        let request = self.frontier.pop_front()?;
        self.last_start = Some(Instant::now());
        tracing::trace!(
            "Scheduling {} - {} ({} left)",
            request.class_name,
            request.unit_name,
            self.frontier.len()
        );

        Some(ScheduledRequest { request, permit })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::UnitLink;

    fn config(max_concurrent_units: u32, request_delay_ms: u64) -> CrawlerConfig {
        CrawlerConfig {
            max_concurrent_units,
            request_delay_ms,
            ..CrawlerConfig::default()
        }
    }

    fn classes() -> Vec<ClassEntry> {
        vec![
            ClassEntry {
                name: "ASL_1".to_string(),
                units: vec![
                    UnitLink {
                        name: "Unit_1".to_string(),
                        url: "https://example.com/1-1".to_string(),
                    },
                    UnitLink {
                        name: "Unit_2".to_string(),
                        url: "https://example.com/1-2".to_string(),
                    },
                ],
            },
            ClassEntry {
                name: "ASL_2".to_string(),
                units: vec![UnitLink {
                    name: "Unit_1".to_string(),
                    url: "https://example.com/2-1".to_string(),
                }],
            },
        ]
    }

    #[tokio::test]
    async fn test_requests_follow_contents_order() {
        let mut scheduler = Scheduler::from_classes(&config(4, 0), &classes());
        assert_eq!(scheduler.frontier_size(), 3);

        let mut order = Vec::new();
        while let Some(scheduled) = scheduler.next_request().await {
            order.push(scheduled.request.url.clone());
        }

        assert_eq!(
            order,
            vec![
                "https://example.com/1-1",
                "https://example.com/1-2",
                "https://example.com/2-1"
            ]
        );
    }

    #[tokio::test]
    async fn test_requests_carry_identity() {
        let mut scheduler = Scheduler::from_classes(&config(4, 0), &classes());
        let first = scheduler.next_request().await.unwrap();
        assert_eq!(
            first.request,
            UnitRequest {
                class_name: "ASL_1".to_string(),
                unit_name: "Unit_1".to_string(),
                url: "https://example.com/1-1".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_concurrency_limit_holds_until_permit_released() {
        let mut scheduler = Scheduler::from_classes(&config(1, 0), &classes());

        let first = scheduler.next_request().await.unwrap();
        let blocked =
            tokio::time::timeout(Duration::from_millis(50), scheduler.next_request()).await;
        assert!(blocked.is_err());

        drop(first);
        let second = scheduler.next_request().await.unwrap();
        assert_eq!(second.request.unit_name, "Unit_2");
    }

    #[tokio::test]
    async fn test_request_delay_spaces_starts() {
        let mut scheduler = Scheduler::from_classes(&config(4, 40), &classes());

        let start = Instant::now();
        let _a = scheduler.next_request().await.unwrap();
        let _b = scheduler.next_request().await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(40));
    }

    #[tokio::test]
    async fn test_empty_frontier() {
        let mut scheduler = Scheduler::new(&config(1, 0), Vec::new());
        assert!(scheduler.next_request().await.is_none());
    }
}
