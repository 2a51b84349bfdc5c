//! Contents page parsing
//!
//! The contents page holds a single table inside `.entry-content`. Each body
//! row names a class in its first cell and links every unit of that class in
//! its second cell. The first row is a header and the last row is the
//! fingerspelling section, which has no downloadable units; which rows to
//! drop is described by a [`RowFilter`].

use crate::config::ContentsConfig;
use crate::parse::names::normalize_name;
use crate::parse::{ClassEntry, UnitLink};
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Decides which contents table rows describe classes with units
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFilter {
    /// Rows dropped from the top of the table
    pub skip_leading: usize,

    /// Rows dropped from the bottom of the table
    pub skip_trailing: usize,

    /// Normalized class labels that are never admitted (case-insensitive)
    pub excluded_labels: Vec<String>,
}

impl Default for RowFilter {
    fn default() -> Self {
        Self {
            skip_leading: 1,
            skip_trailing: 1,
            excluded_labels: Vec::new(),
        }
    }
}

impl From<&ContentsConfig> for RowFilter {
    fn from(config: &ContentsConfig) -> Self {
        Self {
            skip_leading: config.skip_leading_rows,
            skip_trailing: config.skip_trailing_rows,
            excluded_labels: config
                .excluded_labels
                .iter()
                .map(|label| normalize_name(label))
                .collect(),
        }
    }
}

impl RowFilter {
    /// Returns true if the row at `index` of a `total`-row table is a body row
    pub fn admits_position(&self, index: usize, total: usize) -> bool {
        index >= self.skip_leading && index + self.skip_trailing < total
    }

    /// Returns true if the normalized class label is on the exclusion list
    pub fn excludes_label(&self, label: &str) -> bool {
        self.excluded_labels
            .iter()
            .any(|excluded| excluded.eq_ignore_ascii_case(label))
    }
}

/// Parses the contents page into classes and their unit links
///
/// Rows that the filter rejects are dropped silently. Malformed rows (no
/// cells, an empty class label, no unit cell) are skipped with a warning so a
/// single bad row never costs the other classes. A page without a contents
/// table yields no classes.
///
/// # Arguments
///
/// * `html` - The contents page HTML
/// * `base_url` - URL of the contents page, used to resolve relative unit links
/// * `filter` - Which table rows describe classes
///
/// # Example
///
/// ```
/// use asl_harvest::parse::{parse_contents_page, RowFilter};
/// use url::Url;
///
/// let html = r#"<div class="entry-content"><table>
///     <tr><th>Class</th><th>Units</th></tr>
///     <tr><td>ASL 1</td><td><a href="/unit-a">Unit A</a></td></tr>
///     <tr><td>Fingerspelling</td><td></td></tr>
/// </table></div>"#;
/// let base = Url::parse("https://example.com/contents.html").unwrap();
/// let classes = parse_contents_page(html, &base, &RowFilter::default());
/// assert_eq!(classes.len(), 1);
/// assert_eq!(classes[0].name, "ASL_1");
/// assert_eq!(classes[0].units[0].url, "https://example.com/unit-a");
/// ```
pub fn parse_contents_page(html: &str, base_url: &Url, filter: &RowFilter) -> Vec<ClassEntry> {
    let document = Html::parse_document(html);

    let (Ok(table_selector), Ok(row_selector), Ok(cell_selector), Ok(anchor_selector)) = (
        Selector::parse(".entry-content table"),
        Selector::parse("tr"),
        Selector::parse("td"),
        Selector::parse("a"),
    ) else {
        return Vec::new();
    };

    let Some(table) = document.select(&table_selector).next() else {
        tracing::warn!("No contents table found on {}", base_url);
        return Vec::new();
    };

    let rows: Vec<ElementRef> = table.select(&row_selector).collect();
    let total = rows.len();
    let mut classes = Vec::new();

    for (index, row) in rows.into_iter().enumerate() {
        if !filter.admits_position(index, total) {
            continue;
        }

        let cells: Vec<ElementRef> = row.select(&cell_selector).collect();
        let Some(label_cell) = cells.first() else {
            tracing::warn!("Skipping contents row {}: no cells", index);
            continue;
        };

        let class_name = normalize_name(&element_text(label_cell));
        if class_name.is_empty() {
            tracing::warn!("Skipping contents row {}: empty class name", index);
            continue;
        }

        if filter.excludes_label(&class_name) {
            tracing::debug!("Skipping excluded class {}", class_name);
            continue;
        }

        let Some(units_cell) = cells.get(1) else {
            tracing::warn!("Skipping class {}: no unit cell", class_name);
            continue;
        };

        let units = units_cell
            .select(&anchor_selector)
            .filter_map(|anchor| unit_link(&anchor, base_url, &class_name))
            .collect();

        classes.push(ClassEntry {
            name: class_name,
            units,
        });
    }

    classes
}

/// Builds a unit link from an anchor, or None if the anchor is unusable
fn unit_link(anchor: &ElementRef, base_url: &Url, class_name: &str) -> Option<UnitLink> {
    let name = normalize_name(&element_text(anchor));
    if name.is_empty() {
        tracing::warn!("Skipping unnamed unit link in class {}", class_name);
        return None;
    }

    let Some(href) = anchor.value().attr("href") else {
        tracing::warn!("Skipping unit {} in class {}: no href", name, class_name);
        return None;
    };

    match base_url.join(href.trim()) {
        Ok(url) => Some(UnitLink {
            name,
            url: url.to_string(),
        }),
        Err(e) => {
            tracing::warn!(
                "Skipping unit {} in class {}: bad href '{}': {}",
                name,
                class_name,
                href,
                e
            );
            None
        }
    }
}

/// Concatenated text content of an element
fn element_text(element: &ElementRef) -> String {
    element.text().collect::<String>()
}
