//! Crawl outcome tracking
//!
//! Every unit ends in exactly one [`UnitOutcome`]. The coordinator folds them
//! into a [`CrawlReport`], which is printed at the end of a run and optionally
//! rendered as markdown.

use crate::parse::{Category, VideoListClassification};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Final state of one unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitOutcome {
    /// The unit was a PDF and was written to disk
    PdfSaved,

    /// An HTML unit was processed
    Processed {
        classification: VideoListClassification,
        lesson_written: bool,
        videos_requested: usize,
        failed_categories: Vec<Category>,
    },

    /// The unit page could not be fetched
    FetchFailed { reason: String },

    /// The unit was fetched but its output could not be written
    WriteFailed { reason: String },
}

impl UnitOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::FetchFailed { .. } | Self::WriteFailed { .. })
    }

    /// Short label used in reports
    pub fn label(&self) -> String {
        match self {
            Self::PdfSaved => VideoListClassification::PdfDocument.to_string(),
            Self::Processed { classification, .. } => classification.to_string(),
            Self::FetchFailed { .. } => "fetch failed".to_string(),
            Self::WriteFailed { .. } => "write failed".to_string(),
        }
    }
}

/// Outcome of one unit with its identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitReport {
    pub class_name: String,
    pub unit_name: String,
    pub url: String,
    pub outcome: UnitOutcome,
}

/// Summary of a whole crawl
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub contents_url: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub classes: usize,
    pub units: Vec<UnitReport>,
}

impl CrawlReport {
    pub fn new(contents_url: impl Into<String>) -> Self {
        Self {
            contents_url: contents_url.into(),
            started_at: Utc::now(),
            finished_at: None,
            classes: 0,
            units: Vec::new(),
        }
    }

    pub fn record(&mut self, report: UnitReport) {
        self.units.push(report);
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }

    pub fn pdfs_saved(&self) -> usize {
        self.count(|outcome| matches!(outcome, UnitOutcome::PdfSaved))
    }

    pub fn lessons_written(&self) -> usize {
        self.count(|outcome| {
            matches!(
                outcome,
                UnitOutcome::Processed {
                    lesson_written: true,
                    ..
                }
            )
        })
    }

    pub fn failures(&self) -> usize {
        self.count(UnitOutcome::is_failure)
    }

    pub fn videos_requested(&self) -> usize {
        self.units
            .iter()
            .map(|unit| match &unit.outcome {
                UnitOutcome::Processed {
                    videos_requested, ..
                } => *videos_requested,
                _ => 0,
            })
            .sum()
    }

    pub fn failed_categories(&self) -> usize {
        self.units
            .iter()
            .map(|unit| match &unit.outcome {
                UnitOutcome::Processed {
                    failed_categories, ..
                } => failed_categories.len(),
                _ => 0,
            })
            .sum()
    }

    /// Unit counts keyed by outcome label
    pub fn outcome_breakdown(&self) -> BTreeMap<String, usize> {
        let mut breakdown = BTreeMap::new();
        for unit in &self.units {
            *breakdown.entry(unit.outcome.label()).or_insert(0) += 1;
        }
        breakdown
    }

    /// Units that failed, in the order they finished
    pub fn failed_units(&self) -> impl Iterator<Item = &UnitReport> {
        self.units.iter().filter(|unit| unit.outcome.is_failure())
    }

    fn count(&self, predicate: impl Fn(&UnitOutcome) -> bool) -> usize {
        self.units
            .iter()
            .filter(|unit| predicate(&unit.outcome))
            .count()
    }
}

/// Prints the report to stdout in a formatted manner
pub fn print_report(report: &CrawlReport) {
    println!("=== Crawl Report ===\n");

    println!("Overview:");
    println!("  Contents page: {}", report.contents_url);
    println!("  Classes: {}", report.classes);
    println!("  Units: {}", report.units.len());
    if let Some(duration) = report.duration_seconds() {
        println!("  Duration: {}s", duration);
    }
    println!();

    println!("Units by Outcome:");
    for (label, count) in report.outcome_breakdown() {
        println!("  {}: {}", label, count);
    }
    println!();

    println!("Output:");
    println!("  PDFs saved: {}", report.pdfs_saved());
    println!("  Lessons written: {}", report.lessons_written());
    println!("  Videos requested: {}", report.videos_requested());
    println!("  Failed video batches: {}", report.failed_categories());
    println!();

    if report.failures() > 0 {
        println!("Failed Units ({}):", report.failures());
        for unit in report.failed_units() {
            let reason = match &unit.outcome {
                UnitOutcome::FetchFailed { reason } | UnitOutcome::WriteFailed { reason } => {
                    reason.as_str()
                }
                _ => "",
            };
            println!(
                "  - {} / {} ({}): {}",
                unit.class_name, unit.unit_name, unit.url, reason
            );
        }
        println!();
    }
}
