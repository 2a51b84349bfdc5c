//! Per-category video dispatch
//!
//! Each non-empty [`CategoryVideoSet`] becomes exactly one backend call with
//! the category's directory and naming template. Empty sets leave no trace:
//! no directory, no backend call.

use crate::download::{naming_template, VideoBackend};
use crate::output::paths::{ensure_dir, PathPlanner};
use crate::parse::CategoryVideoSet;
use crate::HarvestError;
use std::sync::Arc;

/// What happened to one category set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Nothing to download
    Skipped,
    /// The backend was handed this many URLs
    Dispatched { videos: usize },
}

/// Hands category video sets to a download backend
#[derive(Clone)]
pub struct VideoDispatcher {
    planner: PathPlanner,
    backend: Arc<dyn VideoBackend>,
    base_template: String,
}

impl VideoDispatcher {
    pub fn new(
        planner: PathPlanner,
        backend: Arc<dyn VideoBackend>,
        base_template: impl Into<String>,
    ) -> Self {
        Self {
            planner,
            backend,
            base_template: base_template.into(),
        }
    }

    /// Downloads one category of a unit's videos
    ///
    /// # Returns
    ///
    /// * `Ok(DispatchOutcome::Skipped)` - The set was empty
    /// * `Ok(DispatchOutcome::Dispatched)` - The backend finished the batch
    /// * `Err(HarvestError)` - The directory could not be created or the
    ///   backend reported a failure
    pub fn dispatch(
        &self,
        class_name: &str,
        unit_name: &str,
        set: &CategoryVideoSet,
    ) -> Result<DispatchOutcome, HarvestError> {
        if set.urls.is_empty() {
            return Ok(DispatchOutcome::Skipped);
        }

        let dir = self.planner.category_dir(class_name, unit_name, set.category);
        ensure_dir(&dir)?;

        let template = naming_template(set.category, &self.base_template);
        tracing::info!(
            "Downloading {} {} videos for {} - {}",
            set.urls.len(),
            set.category,
            class_name,
            unit_name
        );

        self.backend.download(&set.urls, &dir, &template)?;

        Ok(DispatchOutcome::Dispatched {
            videos: set.urls.len(),
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::parse::Category;
    use crate::DownloadError;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    /// A backend call captured by [`RecordingBackend`]
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct RecordedCall {
        pub urls: Vec<String>,
        pub output_dir: PathBuf,
        pub naming_template: String,
    }

    /// Records calls instead of downloading
    #[derive(Default)]
    pub struct RecordingBackend {
        pub calls: Mutex<Vec<RecordedCall>>,
        pub fail: bool,
    }

    impl VideoBackend for RecordingBackend {
        fn download(
            &self,
            urls: &[String],
            output_dir: &Path,
            naming_template: &str,
        ) -> Result<(), DownloadError> {
            self.calls.lock().unwrap().push(RecordedCall {
                urls: urls.to_vec(),
                output_dir: output_dir.to_path_buf(),
                naming_template: naming_template.to_string(),
            });
            if self.fail {
                return Err(DownloadError::Exit {
                    status: "exit status: 1".to_string(),
                    failed_hint: "test".to_string(),
                });
            }
            Ok(())
        }
    }

    fn dispatcher(root: &Path, backend: Arc<RecordingBackend>) -> VideoDispatcher {
        VideoDispatcher::new(PathPlanner::new(root), backend, "%(title)s.%(ext)s")
    }

    fn set(category: Category, urls: &[&str]) -> CategoryVideoSet {
        CategoryVideoSet {
            category,
            urls: urls.iter().map(|u| u.to_string()).collect(),
        }
    }

    #[test]
    fn test_empty_set_does_nothing() {
        let temp = tempfile::tempdir().unwrap();
        let backend = Arc::new(RecordingBackend::default());
        let dispatcher = dispatcher(temp.path(), backend.clone());

        let outcome = dispatcher
            .dispatch("ASL_1", "Unit_1", &set(Category::Phrases, &[]))
            .unwrap();

        assert_eq!(outcome, DispatchOutcome::Skipped);
        assert!(backend.calls.lock().unwrap().is_empty());
        assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_vocab_uses_title_template() {
        let temp = tempfile::tempdir().unwrap();
        let backend = Arc::new(RecordingBackend::default());
        let dispatcher = dispatcher(temp.path(), backend.clone());

        let outcome = dispatcher
            .dispatch(
                "ASL_1",
                "Unit_1",
                &set(Category::Vocab, &["https://v.example.com/a", "https://v.example.com/b"]),
            )
            .unwrap();

        assert_eq!(outcome, DispatchOutcome::Dispatched { videos: 2 });
        let calls = backend.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].naming_template, "%(title)s.%(ext)s");
        assert_eq!(calls[0].output_dir, temp.path().join("ASL_1/Unit_1/vocab"));
        assert_eq!(calls[0].urls.len(), 2);
        assert!(temp.path().join("ASL_1/Unit_1/vocab").is_dir());
    }

    #[test]
    fn test_phrases_use_ordinal_template() {
        let temp = tempfile::tempdir().unwrap();
        let backend = Arc::new(RecordingBackend::default());
        let dispatcher = dispatcher(temp.path(), backend.clone());

        dispatcher
            .dispatch(
                "ASL_2",
                "Unit_4",
                &set(Category::Phrases, &["https://v.example.com/a"]),
            )
            .unwrap();

        let calls = backend.calls.lock().unwrap();
        assert_eq!(calls[0].naming_template, "%(autonumber)d-%(title)s.%(ext)s");
        assert_eq!(calls[0].output_dir, temp.path().join("ASL_2/Unit_4/phrases"));
    }

    #[test]
    fn test_backend_failure_is_reported() {
        let temp = tempfile::tempdir().unwrap();
        let backend = Arc::new(RecordingBackend {
            fail: true,
            ..RecordingBackend::default()
        });
        let dispatcher = dispatcher(temp.path(), backend);

        let result = dispatcher.dispatch(
            "ASL_2",
            "Unit_4",
            &set(Category::Lesson, &["https://v.example.com/a"]),
        );
        assert!(matches!(result, Err(HarvestError::Download(_))));
    }
}
