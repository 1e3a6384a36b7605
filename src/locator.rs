//! Entity location and layout classification
//!
//! Finds the post wrapping a starting point, then decides which of the two
//! layouts it is rendered in.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::dom::{self, POST_MARKER};
use crate::error::ExtractError;

static DETAIL_PAGE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|[/.])(?:twitter|x)\.com/[^/]+/status/\d+").unwrap());

static QUOTE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"div[role="link"]"#).unwrap());

/// Which rendering of a post an entity uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Compact layout used in timelines, search results and replies.
    Timeline,
    /// Expanded layout of the post a status page is opened on.
    Detail,
}

/// Where extraction starts from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anchor {
    /// The element holding the first text leaf that contains this needle,
    /// preferring leaves inside a post over page chrome such as `<title>`.
    Text(String),
    /// The first element matching a CSS selector.
    Selector(String),
    /// The first post in the document.
    FirstPost,
}

/// Resolve an [`Anchor`] to a starting element.
pub fn locate_anchor<'a>(
    document: &'a Html,
    anchor: &Anchor,
) -> Result<ElementRef<'a>, ExtractError> {
    let root = document.root_element();
    let found = match anchor {
        Anchor::Text(needle) => locate_text(root, needle),
        Anchor::Selector(css) => {
            let selector = Selector::parse(css)
                .map_err(|e| ExtractError::InvalidSelector(format!("{css}: {e:?}")))?;
            document.select(&selector).next()
        }
        Anchor::FirstPost => dom::nearest_ancestor_by_attribute(root, POST_MARKER.0, POST_MARKER.1)
            .or_else(|| dom::find_descendant_by_attribute(root, POST_MARKER.0, POST_MARKER.1)),
    };

    found.ok_or_else(|| {
        debug!(?anchor, "anchor matched nothing");
        ExtractError::NotFound
    })
}

/// Parent of the first text leaf containing `needle` that sits inside a post.
/// Falls back to the first match anywhere, which then fails entity location.
fn locate_text<'a>(root: ElementRef<'a>, needle: &str) -> Option<ElementRef<'a>> {
    let matches: Vec<_> = root
        .descendants()
        .filter_map(|node| match node.value() {
            Node::Text(text) if text.contains(needle) => node.parent().and_then(ElementRef::wrap),
            _ => None,
        })
        .collect();

    let in_post = matches.iter().copied().find(|el| {
        dom::nearest_ancestor_by_attribute(*el, POST_MARKER.0, POST_MARKER.1).is_some()
    });
    if in_post.is_none() && !matches.is_empty() {
        trace!(needle, "text anchor only matched outside any post");
    }
    in_post.or_else(|| matches.first().copied())
}

/// The post entity enclosing `start` (or `start` itself).
pub fn locate_entity(start: ElementRef<'_>) -> Result<ElementRef<'_>, ExtractError> {
    dom::nearest_ancestor_by_attribute(start, POST_MARKER.0, POST_MARKER.1).ok_or_else(|| {
        debug!(tag = start.value().name(), "no post encloses the starting point");
        ExtractError::NotFound
    })
}

/// The enclosing conversation region, used only to estimate replies.
pub fn locate_region(entity: ElementRef<'_>) -> Option<ElementRef<'_>> {
    let region = dom::nearest_ancestor_by_attribute(entity, "role", "region");
    if region.is_none() {
        trace!("post has no enclosing region");
    }
    region
}

/// Whether `url` is a single-post status page.
pub fn is_detail_page(url: &str) -> bool {
    DETAIL_PAGE_PATTERN.is_match(url)
}

/// The embedded quote container inside `scope`, if one is rendered.
pub(crate) fn quote_container(scope: ElementRef<'_>) -> Option<ElementRef<'_>> {
    scope.select(&QUOTE_SELECTOR).next()
}

/// Whether a `time` element sits on the post itself rather than in its quote.
pub fn has_own_timestamp(entity: ElementRef<'_>) -> bool {
    let quote = quote_container(entity);
    dom::find_all_descendants_by_tag(entity, "time")
        .into_iter()
        .any(|time| quote.map_or(true, |q| !dom::contains(q, time)))
}

/// Classify an entity given the URL of the page it is rendered on.
///
/// Only the post a status page is opened on lacks a `time` element of its
/// own; everything else, including replies on that page, is a timeline post.
pub fn classify_variant(entity: ElementRef<'_>, current_url: &str) -> Variant {
    let detail_page = is_detail_page(current_url);
    let own_timestamp = has_own_timestamp(entity);
    let variant = if detail_page && !own_timestamp {
        Variant::Detail
    } else {
        Variant::Timeline
    };
    debug!(detail_page, own_timestamp, ?variant, "classified post");
    variant
}
