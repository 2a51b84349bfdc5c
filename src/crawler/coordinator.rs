//! Crawler coordinator - main crawl orchestration logic
//!
//! This module ties the crawl together:
//! - Fetching and parsing the contents page
//! - Creating the class directories
//! - Scheduling one request per unit
//! - Classifying and materializing each unit as its response arrives
//! - Folding unit outcomes into the crawl report
//!
//! Units share no mutable state; each writes only beneath its own paths.

use crate::config::{validate, Config};
use crate::crawler::fetcher::{build_http_client, fetch_with_retry, FetchResult, RetryPolicy};
use crate::crawler::scheduler::{Scheduler, UnitRequest};
use crate::download::{VideoBackend, YtDlpBackend};
use crate::output::{
    ensure_dir, generate_markdown_summary, materialize_unit, CrawlReport, PathPlanner,
    UnitOutcome, UnitReport, VideoDispatcher,
};
use crate::parse::{classify_unit, parse_contents_page, ClassEntry, RowFilter, UnitPage};
use crate::{HarvestError, Result};
use reqwest::Client;
use std::path::Path;
use std::sync::Arc;
use tokio::task::JoinSet;
use url::Url;

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Arc<Config>,
    client: Client,
    retry: RetryPolicy,
    planner: PathPlanner,
    dispatcher: VideoDispatcher,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The crawl configuration, validated here
    /// * `backend` - Where video batches are sent
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(HarvestError)` - The configuration is invalid or the HTTP
    ///   client could not be built
    pub fn new(config: Config, backend: Arc<dyn VideoBackend>) -> Result<Self> {
        validate(&config)?;
        let client = build_http_client(&config)?;
        let retry = RetryPolicy::from(&config.crawler);
        let planner = PathPlanner::new(&config.output.directory);
        let dispatcher = VideoDispatcher::new(
            planner.clone(),
            backend,
            config.downloader.video_name_template.clone(),
        );

        Ok(Self {
            config: Arc::new(config),
            client,
            retry,
            planner,
            dispatcher,
        })
    }

    pub fn planner(&self) -> &PathPlanner {
        &self.planner
    }

    /// Fetches the contents page and parses it into classes
    ///
    /// This is the only fetch whose failure ends the crawl.
    pub async fn fetch_contents(&self) -> Result<Vec<ClassEntry>> {
        let contents_url = &self.config.site.contents_url;
        tracing::info!("Fetching contents page {}", contents_url);

        match fetch_with_retry(&self.client, contents_url, &self.retry).await {
            FetchResult::Success {
                final_url, body, ..
            } => {
                let base_url = Url::parse(&final_url)?;
                let html = String::from_utf8_lossy(&body);
                let filter = RowFilter::from(&self.config.contents);
                let classes = parse_contents_page(&html, &base_url, &filter);

                tracing::info!(
                    "Found {} classes with {} units",
                    classes.len(),
                    classes.iter().map(|c| c.units.len()).sum::<usize>()
                );
                Ok(classes)
            }
            failure => Err(HarvestError::ContentsUnavailable {
                url: contents_url.clone(),
                reason: failure.failure_reason().unwrap_or_default(),
            }),
        }
    }

    /// Runs the crawl to completion
    ///
    /// Individual unit failures are recorded in the report, never returned.
    pub async fn run(&self) -> Result<CrawlReport> {
        let mut report = CrawlReport::new(self.config.site.contents_url.clone());

        let classes = self.fetch_contents().await?;
        report.classes = classes.len();

        ensure_dir(self.planner.root())?;
        for class in &classes {
            if let Err(e) = ensure_dir(&self.planner.class_dir(&class.name)) {
                tracing::warn!("Failed to create directory for class {}: {}", class.name, e);
            }
        }

        let mut scheduler = Scheduler::from_classes(&self.config.crawler, &classes);
        let mut tasks = JoinSet::new();

        while let Some(scheduled) = scheduler.next_request().await {
            let client = self.client.clone();
            let retry = self.retry;
            let planner = self.planner.clone();
            let dispatcher = self.dispatcher.clone();

            tasks.spawn(async move {
                let report =
                    process_unit(&client, &retry, scheduled.request, planner, dispatcher).await;
                drop(scheduled.permit);
                report
            });

            // Reap whatever already finished so the report fills in as we go
            while let Some(joined) = tasks.try_join_next() {
                record_joined(&mut report, joined);
            }
        }

        while let Some(joined) = tasks.join_next().await {
            record_joined(&mut report, joined);
        }

        report.finish();
        tracing::info!(
            "Crawl finished: {} units, {} PDFs, {} lessons, {} videos requested, {} failures",
            report.units.len(),
            report.pdfs_saved(),
            report.lessons_written(),
            report.videos_requested(),
            report.failures()
        );

        if let Some(summary_path) = &self.config.output.summary_path {
            match generate_markdown_summary(&report, Path::new(summary_path)) {
                Ok(()) => tracing::info!("Summary written to {}", summary_path),
                Err(e) => tracing::warn!("Failed to write summary {}: {}", summary_path, e),
            }
        }

        Ok(report)
    }
}

/// Fetches, classifies and materializes one unit
async fn process_unit(
    client: &Client,
    retry: &RetryPolicy,
    request: UnitRequest,
    planner: PathPlanner,
    dispatcher: VideoDispatcher,
) -> UnitReport {
    tracing::info!("Processing {} - {}", request.class_name, request.unit_name);

    let outcome = match fetch_with_retry(client, &request.url, retry).await {
        FetchResult::Success {
            final_url, body, ..
        } => {
            let page = UnitPage {
                class_name: request.class_name.clone(),
                unit_name: request.unit_name.clone(),
                url: final_url,
                body,
            };

            // Parsing, file writes and the downloader all block
            let handle = tokio::task::spawn_blocking(move || {
                let unit = classify_unit(page);
                tracing::debug!(
                    "{} - {} classified as {}",
                    unit.class_name,
                    unit.unit_name,
                    unit.classification
                );
                materialize_unit(&unit, &planner, &dispatcher)
            });

            match handle.await {
                Ok(outcome) => outcome,
                Err(e) => UnitOutcome::WriteFailed {
                    reason: format!("unit processing aborted: {}", e),
                },
            }
        }
        failure => {
            let reason = failure.failure_reason().unwrap_or_default();
            tracing::warn!(
                "Failed to fetch {} - {} ({}): {}",
                request.class_name,
                request.unit_name,
                request.url,
                reason
            );
            UnitOutcome::FetchFailed { reason }
        }
    };

    UnitReport {
        class_name: request.class_name,
        unit_name: request.unit_name,
        url: request.url,
        outcome,
    }
}

fn record_joined(
    report: &mut CrawlReport,
    joined: std::result::Result<UnitReport, tokio::task::JoinError>,
) {
    match joined {
        Ok(unit) => report.record(unit),
        Err(e) => tracing::error!("Unit task failed: {}", e),
    }
}

/// Runs a full crawl with the yt-dlp backend
///
/// # Example
///
/// ```no_run
/// use asl_harvest::config::Config;
/// use asl_harvest::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let report = run_crawl(Config::default()).await?;
/// println!("{} units processed", report.units.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config) -> Result<CrawlReport> {
    let backend = Arc::new(YtDlpBackend::new(&config.downloader));
    let coordinator = Coordinator::new(config, backend)?;
    coordinator.run().await
}
