//! ASL-Harvest: a course mirror for StartASL
//!
//! This crate crawls the StartASL class/unit hierarchy, classifies each unit
//! page, and materializes lesson text, PDFs and categorized videos into a
//! local directory tree.

pub mod config;
pub mod crawler;
pub mod download;
pub mod output;
pub mod parse;

use thiserror::Error;

/// Main error type for ASL-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to fetch contents page {url}: {reason}")]
    ContentsUnavailable { url: String, reason: String },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Download error: {0}")]
    Download(#[from] DownloadError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors reported by a video download backend
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("Failed to launch downloader '{program}': {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("Downloader exited with {status} ({failed_hint})")]
    Exit { status: String, failed_hint: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for ASL-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use download::{VideoBackend, YtDlpBackend};
pub use output::{Category, PathPlanner};
pub use parse::{ClassEntry, UnitLink, UnitPage, VideoListClassification};
