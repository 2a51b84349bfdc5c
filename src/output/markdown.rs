//! Markdown crawl summary
//!
//! Renders a [`CrawlReport`] as a human-readable markdown document.

use crate::output::stats::{CrawlReport, UnitOutcome};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes the markdown summary of a crawl to `output_path`
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote markdown summary
/// * `Err(std::io::Error)` - Failed to write summary
pub fn generate_markdown_summary(report: &CrawlReport, output_path: &Path) -> std::io::Result<()> {
    let markdown = format_markdown_summary(report);

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a crawl report as markdown
pub fn format_markdown_summary(report: &CrawlReport) -> String {
    let mut md = String::new();

    md.push_str("# ASL-Harvest Crawl Summary\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Contents Page**: {}\n", report.contents_url));
    md.push_str(&format!("- **Started**: {}\n", report.started_at.to_rfc3339()));
    if let Some(finished) = &report.finished_at {
        md.push_str(&format!("- **Finished**: {}\n", finished.to_rfc3339()));
    }
    if let Some(duration) = report.duration_seconds() {
        md.push_str(&format!(
            "- **Duration**: {} seconds ({:.2} minutes)\n",
            duration,
            duration as f64 / 60.0
        ));
    }
    md.push('\n');

    // Totals
    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Classes**: {}\n", report.classes));
    md.push_str(&format!("- **Units**: {}\n", report.units.len()));
    md.push_str(&format!("- **PDFs Saved**: {}\n", report.pdfs_saved()));
    md.push_str(&format!(
        "- **Lessons Written**: {}\n",
        report.lessons_written()
    ));
    md.push_str(&format!(
        "- **Videos Requested**: {}\n",
        report.videos_requested()
    ));
    md.push_str(&format!(
        "- **Failed Video Batches**: {}\n",
        report.failed_categories()
    ));
    md.push_str(&format!("- **Failed Units**: {}\n\n", report.failures()));

    // Outcome breakdown
    md.push_str("## Units by Outcome\n\n");
    md.push_str("| Outcome | Count |\n");
    md.push_str("|---------|-------|\n");
    for (label, count) in report.outcome_breakdown() {
        md.push_str(&format!("| {} | {} |\n", label, count));
    }
    md.push('\n');

    // Per-unit table
    if !report.units.is_empty() {
        md.push_str("## Units\n\n");
        md.push_str("| Class | Unit | Outcome | Videos |\n");
        md.push_str("|-------|------|---------|--------|\n");

        let mut units: Vec<_> = report.units.iter().collect();
        units.sort_by(|a, b| {
            a.class_name
                .cmp(&b.class_name)
                .then_with(|| a.unit_name.cmp(&b.unit_name))
        });

        for unit in units {
            let videos = match &unit.outcome {
                UnitOutcome::Processed {
                    videos_requested, ..
                } => videos_requested.to_string(),
                _ => "-".to_string(),
            };
            md.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                unit.class_name,
                unit.unit_name,
                unit.outcome.label(),
                videos
            ));
        }
        md.push('\n');
    }

    // Failures
    if report.failures() > 0 {
        md.push_str("## Failures\n\n");
        for unit in report.failed_units() {
            if let UnitOutcome::FetchFailed { reason } | UnitOutcome::WriteFailed { reason } =
                &unit.outcome
            {
                md.push_str(&format!(
                    "- `{}` / `{}` ({}): {}\n",
                    unit.class_name, unit.unit_name, unit.url, reason
                ));
            }
        }
        md.push('\n');
    }

    md
}
