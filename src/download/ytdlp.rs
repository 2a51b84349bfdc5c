use crate::config::DownloaderConfig;
use crate::download::VideoBackend;
use crate::DownloadError;
use std::path::Path;
use std::process::{Command, Stdio};

/// Runs a yt-dlp compatible executable once per batch
#[derive(Debug, Clone)]
pub struct YtDlpBackend {
    program: String,
    quiet: bool,
    extra_args: Vec<String>,
}

impl YtDlpBackend {
    pub fn new(config: &DownloaderConfig) -> Self {
        Self {
            program: config.program.clone(),
            quiet: config.quiet,
            extra_args: config.extra_args.clone(),
        }
    }

    /// Command-line arguments for one batch
    ///
    /// `--ignore-errors` keeps the batch going past individual failures.
    pub fn build_args(
        &self,
        urls: &[String],
        output_dir: &Path,
        naming_template: &str,
    ) -> Vec<String> {
        let mut args = vec![
            "--ignore-errors".to_string(),
            "--no-overwrites".to_string(),
            "-o".to_string(),
            output_dir.join(naming_template).to_string_lossy().into_owned(),
        ];
        if self.quiet {
            args.push("--quiet".to_string());
            args.push("--no-warnings".to_string());
        }
        args.extend(self.extra_args.iter().cloned());
        args.push("--".to_string());
        args.extend(urls.iter().cloned());
        args
    }
}

impl VideoBackend for YtDlpBackend {
    fn download(
        &self,
        urls: &[String],
        output_dir: &Path,
        naming_template: &str,
    ) -> Result<(), DownloadError> {
        let args = self.build_args(urls, output_dir, naming_template);

        tracing::debug!(
            program = %self.program,
            videos = urls.len(),
            dir = %output_dir.display(),
            "running downloader"
        );

        let status = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .status()
            .map_err(|source| DownloadError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(DownloadError::Exit {
                status: status.to_string(),
                failed_hint: "some videos in the batch were not saved".to_string(),
            });
        }

        Ok(())
    }
}
