use serde::Deserialize;

/// Default StartASL contents page listing every class and unit
pub const DEFAULT_CONTENTS_URL: &str = "https://www.startasl.com/learn-sign-language-asl.html";

/// Main configuration structure for ASL-Harvest
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub contents: ContentsConfig,
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: Option<UserAgentConfig>,
    pub output: OutputConfig,
    pub downloader: DownloaderConfig,
}

impl Config {
    /// Formats the User-Agent header sent with every request
    pub fn user_agent_string(&self) -> String {
        match &self.user_agent {
            // Format: CrawlerName/Version (+ContactURL; ContactEmail)
            Some(ua) => format!(
                "{}/{} (+{}; {})",
                ua.crawler_name, ua.crawler_version, ua.contact_url, ua.contact_email
            ),
            None => format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Target site configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// URL of the page holding the class/unit table
    #[serde(rename = "contents-url")]
    pub contents_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            contents_url: DEFAULT_CONTENTS_URL.to_string(),
        }
    }
}

/// Which rows of the contents table describe downloadable units
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ContentsConfig {
    /// Rows dropped from the top of the table (the header)
    #[serde(rename = "skip-leading-rows")]
    pub skip_leading_rows: usize,

    /// Rows dropped from the bottom of the table (the fingerspelling section)
    #[serde(rename = "skip-trailing-rows")]
    pub skip_trailing_rows: usize,

    /// Normalized class labels that never hold units
    #[serde(rename = "excluded-labels")]
    pub excluded_labels: Vec<String>,
}

impl Default for ContentsConfig {
    fn default() -> Self {
        Self {
            skip_leading_rows: 1,
            skip_trailing_rows: 1,
            excluded_labels: Vec::new(),
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of unit pages processed at once
    #[serde(rename = "max-concurrent-units")]
    pub max_concurrent_units: u32,

    /// Minimum time between starting two unit requests (milliseconds)
    #[serde(rename = "request-delay-ms")]
    pub request_delay_ms: u64,

    /// Whole-request timeout (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Retries for timeouts and 5xx responses
    #[serde(rename = "max-retries")]
    pub max_retries: u32,

    /// Delay between retries (milliseconds)
    #[serde(rename = "retry-delay-ms")]
    pub retry_delay_ms: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_units: 4,
            request_delay_ms: 250,
            request_timeout_secs: 30,
            max_retries: 2,
            retry_delay_ms: 2000,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Root of the mirrored class tree
    pub directory: String,

    /// Where to write the markdown crawl summary, if anywhere
    #[serde(rename = "summary-path")]
    pub summary_path: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: "output".to_string(),
            summary_path: None,
        }
    }
}

/// External video downloader configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DownloaderConfig {
    /// yt-dlp compatible executable
    pub program: String,

    /// Base file name template, without the ordinal prefix
    #[serde(rename = "video-name-template")]
    pub video_name_template: String,

    /// Silence the downloader's own output
    pub quiet: bool,

    /// Extra arguments passed through verbatim
    #[serde(rename = "extra-args")]
    pub extra_args: Vec<String>,
}

impl Default for DownloaderConfig {
    fn default() -> Self {
        Self {
            program: "yt-dlp".to_string(),
            video_name_template: "%(title)s.%(ext)s".to_string(),
            quiet: true,
            extra_args: Vec::new(),
        }
    }
}
