//! Unit page classification
//!
//! A unit is either a PDF document or an HTML lesson page. Lesson pages carry
//! the lesson text in `.entry-content`, optional inline lesson videos, and
//! zero, one or two video lists (elements with both the `dictionary` and
//! `phrase-list` classes). When only one list is present, whether it holds
//! phrases or vocabulary is inferred from the class name.

use crate::parse::UnitPage;
use scraper::{ElementRef, Html, Selector};
use std::fmt;
use url::Url;

/// Which kind of videos a single list holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    Phrase,
    Vocab,
}

/// The shape of a unit page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VideoListClassification {
    /// The unit is a PDF; the response body is the document
    PdfDocument,
    /// An HTML page with no video lists
    NoVideoLists,
    /// An HTML page with exactly one video list
    SingleList(ListKind),
    /// An HTML page with two or more video lists: phrases, then vocabulary
    DualList,
}

impl fmt::Display for VideoListClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PdfDocument => write!(f, "pdf document"),
            Self::NoVideoLists => write!(f, "no video lists"),
            Self::SingleList(ListKind::Phrase) => write!(f, "single list (phrases)"),
            Self::SingleList(ListKind::Vocab) => write!(f, "single list (vocab)"),
            Self::DualList => write!(f, "dual list"),
        }
    }
}

/// Output bucket for a group of videos
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Lesson,
    Phrases,
    Vocab,
}

impl Category {
    /// Directory name under the unit directory
    pub fn dir_name(&self) -> &'static str {
        match self {
            Self::Lesson => "lesson",
            Self::Phrases => "phrases",
            Self::Vocab => "vocab",
        }
    }

    /// Whether saved videos are prefixed with their position in the batch
    ///
    /// Phrase and lesson videos often share titles; vocabulary titles are the
    /// sign itself and are unique within a unit.
    pub fn uses_ordinal_names(&self) -> bool {
        !matches!(self, Self::Vocab)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Video URLs bound for one category directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryVideoSet {
    pub category: Category,
    pub urls: Vec<String>,
}

/// What a unit produces
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitPayload {
    /// Raw PDF bytes, saved as-is
    Pdf(Vec<u8>),
    /// Lesson text and the non-empty video sets, in dispatch order
    Html {
        lesson_markdown: Option<String>,
        video_sets: Vec<CategoryVideoSet>,
    },
}

/// A classified unit page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedUnit {
    pub class_name: String,
    pub unit_name: String,
    pub classification: VideoListClassification,
    pub payload: UnitPayload,
}

/// Returns true if the last dot-delimited segment of `url` is `pdf`
pub fn is_pdf_url(url: &str) -> bool {
    url.rsplit('.')
        .next()
        .is_some_and(|extension| extension.eq_ignore_ascii_case("pdf"))
}

/// Decides the shape of an HTML unit page from its video list count
///
/// A lone list is vocabulary when the class name contains the digit `1`
/// (entry-level units may lack phrases) and phrases otherwise (later units
/// lack vocabulary). This is plain substring containment, so `ASL_21` counts
/// as entry level too.
pub fn classify_video_lists(list_count: usize, class_name: &str) -> VideoListClassification {
    match list_count {
        0 => VideoListClassification::NoVideoLists,
        1 if class_name.contains('1') => VideoListClassification::SingleList(ListKind::Vocab),
        1 => VideoListClassification::SingleList(ListKind::Phrase),
        _ => VideoListClassification::DualList,
    }
}

/// Classifies a fetched unit page and extracts everything it produces
///
/// PDFs short-circuit: the body is returned untouched. For HTML pages the
/// lesson text is the markdown rendering of `.entry-content` with every
/// `phrase-list` element removed, and one video set is built for each
/// non-empty category: inline lesson videos, then phrases, then vocabulary.
pub fn classify_unit(page: UnitPage) -> ClassifiedUnit {
    if page.is_pdf() {
        return ClassifiedUnit {
            class_name: page.class_name,
            unit_name: page.unit_name,
            classification: VideoListClassification::PdfDocument,
            payload: UnitPayload::Pdf(page.body),
        };
    }

    let html = String::from_utf8_lossy(&page.body);
    let document = Html::parse_document(&html);
    let base_url = Url::parse(&page.url).ok();

    let lists = select_all(&document, ".dictionary.phrase-list");
    let classification = classify_video_lists(lists.len(), &page.class_name);

    let (phrase_list, vocab_list) = match classification {
        VideoListClassification::SingleList(ListKind::Phrase) => (lists.first(), None),
        VideoListClassification::SingleList(ListKind::Vocab) => (None, lists.first()),
        VideoListClassification::DualList => (lists.first(), lists.get(1)),
        VideoListClassification::NoVideoLists | VideoListClassification::PdfDocument => {
            (None, None)
        }
    };

    let lesson_urls = lesson_video_urls(&document, base_url.as_ref());
    let phrase_urls = phrase_list
        .map(|list| list_video_urls(list, base_url.as_ref()))
        .unwrap_or_default();
    let vocab_urls = vocab_list
        .map(|list| list_video_urls(list, base_url.as_ref()))
        .unwrap_or_default();

    let video_sets = [
        (Category::Lesson, lesson_urls),
        (Category::Phrases, phrase_urls),
        (Category::Vocab, vocab_urls),
    ]
    .into_iter()
    .filter(|(_, urls)| !urls.is_empty())
    .map(|(category, urls)| CategoryVideoSet { category, urls })
    .collect();

    ClassifiedUnit {
        class_name: page.class_name,
        unit_name: page.unit_name,
        classification,
        payload: UnitPayload::Html {
            lesson_markdown: extract_lesson_markdown(&document),
            video_sets,
        },
    }
}

/// Renders `.entry-content` as markdown with the video lists stripped out
fn extract_lesson_markdown(document: &Html) -> Option<String> {
    let content_selector = Selector::parse(".entry-content").ok()?;
    let list_selector = Selector::parse(r#"[class*="phrase-list"]"#).ok()?;

    let content_html = document.select(&content_selector).next()?.html();

    let mut fragment = Html::parse_fragment(&content_html);
    let list_ids: Vec<_> = fragment.select(&list_selector).map(|el| el.id()).collect();
    for id in list_ids {
        if let Some(mut node) = fragment.tree.get_mut(id) {
            node.detach();
        }
    }

    Some(html2md::parse_html(&fragment.root_element().inner_html()))
}

/// Sources of inline `<video>` elements
fn lesson_video_urls(document: &Html, base_url: Option<&Url>) -> Vec<String> {
    let Ok(selector) = Selector::parse("video source[src]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|source| source.value().attr("src"))
        .map(|src| resolve_video_url(src, base_url))
        .collect()
}

/// Video URLs of one list, read from each phrase anchor's `current-url`
fn list_video_urls(list: &ElementRef, base_url: Option<&Url>) -> Vec<String> {
    let Ok(selector) = Selector::parse(".phrase a[current-url]") else {
        return Vec::new();
    };

    list.select(&selector)
        .filter_map(|anchor| anchor.value().attr("current-url"))
        .map(|src| resolve_video_url(src, base_url))
        .collect()
}

fn select_all<'a>(document: &'a Html, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => document.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

/// Makes a video URL absolute against the unit page when possible
fn resolve_video_url(src: &str, base_url: Option<&Url>) -> String {
    let src = src.trim();
    base_url
        .and_then(|base| base.join(src).ok())
        .map(|url| url.to_string())
        .unwrap_or_else(|| src.to_string())
}
