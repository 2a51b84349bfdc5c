use crate::config::types::{
    Config, CrawlerConfig, DownloaderConfig, OutputConfig, SiteConfig, UserAgentConfig,
};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_crawler_config(&config.crawler)?;
    if let Some(user_agent) = &config.user_agent {
        validate_user_agent_config(user_agent)?;
    }
    validate_output_config(&config.output)?;
    validate_downloader_config(&config.downloader)?;
    Ok(())
}

/// Validates the contents page location
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.contents_url).map_err(|e| {
        ConfigError::InvalidUrl(format!(
            "Invalid contents-url '{}': {}",
            config.contents_url, e
        ))
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "contents-url '{}' must use http or https",
            config.contents_url
        )));
    }

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_concurrent_units < 1 || config.max_concurrent_units > 32 {
        return Err(ConfigError::Validation(format!(
            "max-concurrent-units must be between 1 and 32, got {}",
            config.max_concurrent_units
        )));
    }

    if config.request_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "request-timeout-secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler-name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler-name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact-url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    if matches!(&config.summary_path, Some(path) if path.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "summary-path cannot be empty when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates the downloader invocation settings
fn validate_downloader_config(config: &DownloaderConfig) -> Result<(), ConfigError> {
    if config.program.trim().is_empty() {
        return Err(ConfigError::Validation(
            "downloader program cannot be empty".to_string(),
        ));
    }

    // Without an extension field every video would collide on the same name
    if !config.video_name_template.contains("%(ext)s") {
        return Err(ConfigError::Validation(format!(
            "video-name-template must contain '%(ext)s', got '{}'",
            config.video_name_template
        )));
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact-email cannot be empty".to_string(),
        ));
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !parts[1].contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
