//! Page parsing for the StartASL site structure
//!
//! This module turns fetched pages into structured data:
//! - The contents page becomes an ordered list of classes and their unit links
//! - Each unit page is classified by shape and yields its lesson text and
//!   per-category video URL lists
//!
//! Nothing here touches the network or the filesystem.

mod contents;
mod names;
mod unit;

pub use contents::{parse_contents_page, RowFilter};
pub use names::normalize_name;
pub use unit::{
    classify_unit, classify_video_lists, is_pdf_url, Category, CategoryVideoSet, ClassifiedUnit,
    ListKind, UnitPayload, VideoListClassification,
};

/// A class (course level) from the contents table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassEntry {
    /// Normalized class name, used as a directory name
    pub name: String,

    /// Units in the order they appear on the contents page
    pub units: Vec<UnitLink>,
}

/// A link to one unit page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitLink {
    /// Normalized unit name
    pub name: String,

    /// Absolute URL of the unit page or PDF
    pub url: String,
}

/// A fetched unit page, tagged with its position in the hierarchy
#[derive(Debug, Clone)]
pub struct UnitPage {
    pub class_name: String,
    pub unit_name: String,

    /// Final URL of the response (after redirects)
    pub url: String,

    /// Raw response body
    pub body: Vec<u8>,
}

impl UnitPage {
    /// Returns true if the unit is a PDF document rather than an HTML page
    pub fn is_pdf(&self) -> bool {
        is_pdf_url(&self.url)
    }
}
