//! Tree navigation primitives
//!
//! Small read-only helpers over a parsed `scraper` tree. Every lookup returns
//! an `Option` (or an empty `Vec`); none of them can fail.

use scraper::ElementRef;

/// Attribute marking the element that wraps one full post.
pub const POST_MARKER: (&str, &str) = ("data-testid", "tweet");
/// Attribute marking a post's text body.
pub const BODY_MARKER: (&str, &str) = ("data-testid", "tweetText");

/// Whether `el` carries `name="value"`.
pub fn has_attribute(el: ElementRef<'_>, name: &str, value: &str) -> bool {
    el.value().attr(name) == Some(value)
}

/// First descendant (excluding `root`) with `name="value"`, in document order.
pub fn find_descendant_by_attribute<'a>(
    root: ElementRef<'a>,
    name: &str,
    value: &str,
) -> Option<ElementRef<'a>> {
    root.descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .find(|el| has_attribute(*el, name, value))
}

/// All descendants (excluding `root`) with `name="value"`, in document order.
pub fn find_all_descendants_by_attribute<'a>(
    root: ElementRef<'a>,
    name: &str,
    value: &str,
) -> Vec<ElementRef<'a>> {
    root.descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .filter(|el| has_attribute(*el, name, value))
        .collect()
}

/// First descendant element with the given tag name.
pub fn find_descendant_by_tag<'a>(root: ElementRef<'a>, tag: &str) -> Option<ElementRef<'a>> {
    root.descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == tag)
}

/// All descendant elements with the given tag name.
pub fn find_all_descendants_by_tag<'a>(root: ElementRef<'a>, tag: &str) -> Vec<ElementRef<'a>> {
    root.descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == tag)
        .collect()
}

/// `node` itself if it matches, otherwise the closest matching ancestor.
pub fn nearest_ancestor_by_attribute<'a>(
    node: ElementRef<'a>,
    name: &str,
    value: &str,
) -> Option<ElementRef<'a>> {
    if has_attribute(node, name, value) {
        return Some(node);
    }
    node.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| has_attribute(*el, name, value))
}

/// Inclusive containment: an element contains itself.
pub fn contains(ancestor: ElementRef<'_>, node: ElementRef<'_>) -> bool {
    node.id() == ancestor.id() || node.ancestors().any(|a| a.id() == ancestor.id())
}

pub fn first_element_child<'a>(el: ElementRef<'a>) -> Option<ElementRef<'a>> {
    el.children().find_map(ElementRef::wrap)
}

pub fn last_element_child<'a>(el: ElementRef<'a>) -> Option<ElementRef<'a>> {
    el.children().filter_map(ElementRef::wrap).last()
}

/// Zero-based index over element children only; text leaves are skipped.
pub fn nth_element_child<'a>(el: ElementRef<'a>, n: usize) -> Option<ElementRef<'a>> {
    el.children().filter_map(ElementRef::wrap).nth(n)
}

pub fn previous_element_sibling<'a>(el: ElementRef<'a>) -> Option<ElementRef<'a>> {
    el.prev_siblings().find_map(ElementRef::wrap)
}

pub fn next_element_sibling<'a>(el: ElementRef<'a>) -> Option<ElementRef<'a>> {
    el.next_siblings().find_map(ElementRef::wrap)
}

pub fn parent_element<'a>(el: ElementRef<'a>) -> Option<ElementRef<'a>> {
    el.parent().and_then(ElementRef::wrap)
}

/// The `n`th element ancestor (`n = 1` is the parent).
pub fn nth_ancestor<'a>(el: ElementRef<'a>, n: usize) -> Option<ElementRef<'a>> {
    if n == 0 {
        return Some(el);
    }
    el.ancestors().filter_map(ElementRef::wrap).nth(n - 1)
}

/// Follow `first_element_child` `depth` times.
pub fn descend_first<'a>(el: ElementRef<'a>, depth: usize) -> Option<ElementRef<'a>> {
    (0..depth).try_fold(el, |current, _| first_element_child(current))
}

/// Follow `last_element_child` `depth` times.
pub fn descend_last<'a>(el: ElementRef<'a>, depth: usize) -> Option<ElementRef<'a>> {
    (0..depth).try_fold(el, |current, _| last_element_child(current))
}
