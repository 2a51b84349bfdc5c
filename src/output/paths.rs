//! Destination paths for mirrored content
//!
//! Layout under the output root:
//!
//! ```text
//! <root>/<class>/<unit>.pdf              PDF units
//! <root>/<class>/<unit>/lesson.md        lesson text
//! <root>/<class>/<unit>/<category>/      lesson, phrases and vocab videos
//! ```

use crate::parse::Category;
use std::path::{Path, PathBuf};

/// Name of the lesson text file inside each unit directory
pub const LESSON_FILE_NAME: &str = "lesson.md";

/// Maps class/unit/category identities to filesystem locations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPlanner {
    root: PathBuf,
}

impl PathPlanner {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn class_dir(&self, class_name: &str) -> PathBuf {
        self.root.join(class_name)
    }

    pub fn unit_dir(&self, class_name: &str, unit_name: &str) -> PathBuf {
        self.class_dir(class_name).join(unit_name)
    }

    /// PDF units sit beside the unit directories, named after the unit
    pub fn pdf_file(&self, class_name: &str, unit_name: &str) -> PathBuf {
        self.class_dir(class_name).join(format!("{}.pdf", unit_name))
    }

    pub fn lesson_file(&self, class_name: &str, unit_name: &str) -> PathBuf {
        self.unit_dir(class_name, unit_name).join(LESSON_FILE_NAME)
    }

    pub fn category_dir(&self, class_name: &str, unit_name: &str, category: Category) -> PathBuf {
        self.unit_dir(class_name, unit_name).join(category.dir_name())
    }
}

/// Creates a directory and its parents; an existing directory is not an error
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(path)
}
