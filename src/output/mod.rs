//! Output module for the mirrored class tree
//!
//! This module handles:
//! - Planning destination paths for PDFs, lessons and video categories
//! - Writing lesson text and PDFs
//! - Dispatching video batches to the download backend
//! - Recording per-unit outcomes and rendering the crawl summary

pub mod dispatcher;
mod markdown;
pub mod paths;
pub mod stats;
pub mod writer;

pub use dispatcher::{DispatchOutcome, VideoDispatcher};
pub use markdown::{format_markdown_summary, generate_markdown_summary};
pub use paths::{ensure_dir, PathPlanner, LESSON_FILE_NAME};
pub use stats::{print_report, CrawlReport, UnitOutcome, UnitReport};
pub use writer::{materialize_unit, write_lesson, write_pdf};

pub use crate::parse::Category;
