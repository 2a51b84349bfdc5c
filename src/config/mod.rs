//! Configuration module for ASL-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section has defaults, so an empty file (or no file at all) mirrors the
//! StartASL site into `./output`.
//!
//! # Example
//!
//! ```no_run
//! use asl_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Mirroring into: {}", config.output.directory);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, ContentsConfig, CrawlerConfig, DownloaderConfig, OutputConfig, SiteConfig,
    UserAgentConfig, DEFAULT_CONTENTS_URL,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
