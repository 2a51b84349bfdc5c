//! Video download backends
//!
//! A backend takes a batch of video URLs, a destination directory and a
//! yt-dlp style output template, and saves whatever it can. Failures of single
//! URLs are the backend's business; the batch is never aborted because of one.

mod ytdlp;

pub use ytdlp::YtDlpBackend;

use crate::parse::Category;
use crate::DownloadError;
use std::path::Path;

/// Prefix numbering each video by its position in the batch
pub const ORDINAL_PREFIX: &str = "%(autonumber)d-";

/// Fetches and saves videos
///
/// Invoked once per category batch. Calls block until the batch is done.
pub trait VideoBackend: Send + Sync {
    /// Downloads `urls` into `output_dir`, naming files by `naming_template`
    fn download(
        &self,
        urls: &[String],
        output_dir: &Path,
        naming_template: &str,
    ) -> Result<(), DownloadError>;
}

/// Output template for a category
///
/// Ordinal categories get [`ORDINAL_PREFIX`] in front of `base_template`;
/// vocabulary uses `base_template` alone.
///
/// ```
/// use asl_harvest::download::naming_template;
/// use asl_harvest::parse::Category;
///
/// let base = "%(title)s.%(ext)s";
/// assert_eq!(naming_template(Category::Phrases, base), "%(autonumber)d-%(title)s.%(ext)s");
/// assert_eq!(naming_template(Category::Vocab, base), "%(title)s.%(ext)s");
/// ```
pub fn naming_template(category: Category, base_template: &str) -> String {
    if category.uses_ordinal_names() {
        format!("{}{}", ORDINAL_PREFIX, base_template)
    } else {
        base_template.to_string()
    }
}
