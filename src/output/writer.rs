//! Materializes classified units on disk
//!
//! This is the effectful half of unit processing: it takes a
//! [`ClassifiedUnit`] and writes the PDF, or the lesson file plus one video
//! batch per category. A failed video batch is logged and the remaining
//! categories still run.

use crate::output::dispatcher::{DispatchOutcome, VideoDispatcher};
use crate::output::paths::{ensure_dir, PathPlanner};
use crate::output::stats::UnitOutcome;
use crate::parse::{ClassifiedUnit, UnitPayload};
use std::path::PathBuf;

/// Writes a PDF unit at the class level
pub fn write_pdf(
    planner: &PathPlanner,
    class_name: &str,
    unit_name: &str,
    bytes: &[u8],
) -> std::io::Result<PathBuf> {
    ensure_dir(&planner.class_dir(class_name))?;
    let path = planner.pdf_file(class_name, unit_name);
    std::fs::write(&path, bytes)?;
    Ok(path)
}

/// Writes the lesson text inside the unit directory
pub fn write_lesson(
    planner: &PathPlanner,
    class_name: &str,
    unit_name: &str,
    markdown: &str,
) -> std::io::Result<PathBuf> {
    ensure_dir(&planner.unit_dir(class_name, unit_name))?;
    let path = planner.lesson_file(class_name, unit_name);
    std::fs::write(&path, markdown)?;
    Ok(path)
}

/// Writes everything a classified unit produces
pub fn materialize_unit(
    unit: &ClassifiedUnit,
    planner: &PathPlanner,
    dispatcher: &VideoDispatcher,
) -> UnitOutcome {
    let class_name = unit.class_name.as_str();
    let unit_name = unit.unit_name.as_str();

    match &unit.payload {
        UnitPayload::Pdf(bytes) => match write_pdf(planner, class_name, unit_name, bytes) {
            Ok(path) => {
                tracing::info!("Saved PDF {}", path.display());
                UnitOutcome::PdfSaved
            }
            Err(e) => {
                tracing::error!("Failed to save PDF for {} - {}: {}", class_name, unit_name, e);
                UnitOutcome::WriteFailed {
                    reason: e.to_string(),
                }
            }
        },

        UnitPayload::Html {
            lesson_markdown,
            video_sets,
        } => {
            if let Err(e) = ensure_dir(&planner.unit_dir(class_name, unit_name)) {
                tracing::error!(
                    "Failed to create unit directory for {} - {}: {}",
                    class_name,
                    unit_name,
                    e
                );
                return UnitOutcome::WriteFailed {
                    reason: e.to_string(),
                };
            }

            let lesson_written = match lesson_markdown {
                Some(markdown) => match write_lesson(planner, class_name, unit_name, markdown) {
                    Ok(_) => true,
                    Err(e) => {
                        tracing::error!(
                            "Failed to write lesson for {} - {}: {}",
                            class_name,
                            unit_name,
                            e
                        );
                        return UnitOutcome::WriteFailed {
                            reason: e.to_string(),
                        };
                    }
                },
                None => {
                    tracing::warn!("No lesson content found for {} - {}", class_name, unit_name);
                    false
                }
            };

            let mut videos_requested = 0;
            let mut failed_categories = Vec::new();
            for set in video_sets {
                match dispatcher.dispatch(class_name, unit_name, set) {
                    Ok(DispatchOutcome::Dispatched { videos }) => videos_requested += videos,
                    Ok(DispatchOutcome::Skipped) => {}
                    Err(e) => {
                        tracing::warn!(
                            "{} videos for {} - {} incomplete: {}",
                            set.category,
                            class_name,
                            unit_name,
                            e
                        );
                        videos_requested += set.urls.len();
                        failed_categories.push(set.category);
                    }
                }
            }

            UnitOutcome::Processed {
                classification: unit.classification,
                lesson_written,
                videos_requested,
                failed_categories,
            }
        }
    }
}
