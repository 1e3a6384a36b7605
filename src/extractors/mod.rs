//! Post extraction pipelines
//!
//! Each layout has its own [`PostExtractor`]; steps that do not depend on the
//! layout (links, social context, reply-to, card, quote, media and the
//! best-effort flags) live here and are shared by both.

mod detail;
mod timeline;

#[cfg(test)]
pub(crate) mod fixtures;

pub use detail::DetailExtractor;
pub use timeline::TimelineExtractor;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use url::Url;

use crate::config::ExtractConfig;
use crate::dom::{self, BODY_MARKER};
use crate::error::{settle, ExtractError, HeuristicMismatch};
use crate::locator::{self, Anchor, Variant};
use crate::post::{normalize_handle, Card, Link, Post, QuotedPost, ReplyingTo, SocialContext};
use crate::text::{extract_text, text_content};

static DEFAULT_BASE: Lazy<Url> = Lazy::new(|| Url::parse("https://twitter.com/").unwrap());

pub(crate) static ROLE_LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"a[role="link"]"#).unwrap());
static SPAN_TIME_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("span time").unwrap());

const VERIFIED_LABEL: &str = "Verified account";
const VIDEO_LABEL: &str = "Embedded video";
const IMAGE_LABEL: &str = "Image";
const QUOTE_AVATAR_TESTID: &str = "UserAvatar-Container-unknown";
const QUOTE_THREAD_LABEL: &str = "Show this thread";
const PROMOTED_LABEL: &str = "Promoted";
/// Distance from the avatar link to the element whose next sibling is the
/// thread connector line.
const THREAD_LINE_DEPTH: usize = 8;
/// Depth of the trailing element chain holding the promoted label.
const PROMOTED_CHAIN_DEPTH: usize = 3;

/// One way of turning a post entity into a [`Post`].
pub trait PostExtractor {
    fn extract(&self, entity: ElementRef<'_>, ctx: &ExtractContext<'_>) -> Post;
}

impl Variant {
    pub fn extractor(self) -> &'static dyn PostExtractor {
        match self {
            Variant::Timeline => &TimelineExtractor,
            Variant::Detail => &DetailExtractor,
        }
    }
}

/// Per-call state: options plus the page URL relative links resolve against.
#[derive(Debug, Clone)]
pub struct ExtractContext<'c> {
    pub config: &'c ExtractConfig,
    base: Url,
}

impl<'c> ExtractContext<'c> {
    pub fn new(page_url: &str, config: &'c ExtractConfig) -> Self {
        let base = Url::parse(page_url).unwrap_or_else(|_| DEFAULT_BASE.clone());
        Self { config, base }
    }

    /// Absolute form of an href as rendered in the page.
    pub fn resolve(&self, href: &str) -> String {
        self.base
            .join(href)
            .map(String::from)
            .unwrap_or_else(|_| href.to_string())
    }

    /// Whether `href` points at a single post on the site.
    pub fn is_status_url(&self, href: &str) -> bool {
        let Ok(url) = self.base.join(href) else {
            return false;
        };
        let on_site = url.host_str().map_or(false, |host| {
            matches!(
                host.trim_start_matches("www.").trim_start_matches("mobile."),
                "twitter.com" | "x.com"
            )
        });
        on_site && url.path().contains("/status/")
    }

    fn text(&self, el: ElementRef<'_>) -> String {
        extract_text(el, self.config.emoji_style)
    }

    fn href(&self, el: ElementRef<'_>) -> String {
        el.value().attr("href").map(|h| self.resolve(h)).unwrap_or_default()
    }
}

/// Request accepted by [`extract_from_html`] and the C interface.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionRequest {
    /// URL of the page the HTML was captured from.
    #[serde(default)]
    pub page_url: String,
    /// Text the user selected inside the post.
    #[serde(default)]
    pub anchor_text: Option<String>,
    /// CSS selector for the starting element, used when no text is given.
    #[serde(default)]
    pub anchor_selector: Option<String>,
    #[serde(default)]
    pub config: ExtractConfig,
}

impl ExtractionRequest {
    pub fn from_json(json: &str) -> Result<Self, ExtractError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn anchor(&self) -> Anchor {
        match (&self.anchor_text, &self.anchor_selector) {
            (Some(text), _) => Anchor::Text(text.clone()),
            (None, Some(css)) => Anchor::Selector(css.clone()),
            (None, None) => Anchor::FirstPost,
        }
    }
}

/// Extract the post enclosing `start`, rendered on the page at `page_url`.
pub fn extract_post(
    start: ElementRef<'_>,
    page_url: &str,
    config: &ExtractConfig,
) -> Result<Post, ExtractError> {
    let entity = locator::locate_entity(start)?;
    let variant = locator::classify_variant(entity, page_url);
    let ctx = ExtractContext::new(page_url, config);
    Ok(variant.extractor().extract(entity, &ctx))
}

/// Parse `html` and extract the post the request's anchor points into.
pub fn extract_from_html(html: &str, request: &ExtractionRequest) -> Result<Post, ExtractError> {
    let document = Html::parse_document(html);
    let start = locator::locate_anchor(&document, &request.anchor())?;
    extract_post(start, &request.page_url, &request.config)
}

/// The avatar, display-name and handle links at the top of a post.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct AuthorLinks<'a> {
    pub avatar: Option<ElementRef<'a>>,
    pub display_name: Option<ElementRef<'a>>,
    pub handle: Option<ElementRef<'a>>,
}

impl<'a> AuthorLinks<'a> {
    pub fn from_links(links: &[ElementRef<'a>]) -> Self {
        Self {
            avatar: links.first().copied(),
            display_name: links.get(1).copied(),
            handle: links.get(2).copied(),
        }
    }

    pub fn fill(&self, post: &mut Post, ctx: &ExtractContext<'_>) {
        if let Some(name) = self.display_name {
            post.author_display_name = ctx.text(name);
            post.author_verified =
                dom::find_descendant_by_attribute(name, "aria-label", VERIFIED_LABEL).is_some();
        } else {
            debug!("display name link missing");
        }

        if let Some(handle) = self.handle {
            post.author_handle = normalize_handle(&text_content(handle));
            post.author_profile_link = ctx.href(handle);
        } else {
            debug!("handle link missing");
        }

        post.author_avatar_url = self
            .avatar
            .and_then(|avatar| image_src(avatar, ctx))
            .unwrap_or_default();
    }
}

/// The elements the shared steps navigate from.
pub(crate) struct Layout<'a> {
    /// Searched for card, quote, media and the promoted label.
    pub scope: ElementRef<'a>,
    /// Its previous sibling holds the social context.
    pub author_block: ElementRef<'a>,
    pub avatar: Option<ElementRef<'a>>,
    pub body: Option<ElementRef<'a>>,
}

/// Run every layout-independent step, each one skippable on its own.
pub(crate) fn apply_shared_steps(post: &mut Post, layout: &Layout<'_>, ctx: &ExtractContext<'_>) {
    let quote_el = locator::quote_container(layout.scope);

    if let Some(body) = layout.body {
        post.body = Some(ctx.text(body));
        post.links = collect_links(body, ctx);
        post.replying_to = replying_to(body, ctx);
    } else {
        trace!("post has no body text");
    }

    post.social_context = social_context(layout.author_block, ctx);
    post.card = card(layout.scope, quote_el, ctx);
    post.quote = quote_el.and_then(|q| quoted_post(q, ctx));

    post.has_video = has_own_media(layout.scope, quote_el, VIDEO_LABEL);
    post.has_image = has_own_media(layout.scope, quote_el, IMAGE_LABEL);

    post.is_thread = settle(is_thread(layout.avatar));
    post.is_promoted = settle(is_promoted(layout.scope));
}

/// First body marker in `scope` that does not belong to the quote.
pub(crate) fn own_body(scope: ElementRef<'_>) -> Option<ElementRef<'_>> {
    let quote_el = locator::quote_container(scope);
    dom::find_all_descendants_by_attribute(scope, BODY_MARKER.0, BODY_MARKER.1)
        .into_iter()
        .find(|el| quote_el.map_or(true, |q| !dom::contains(q, *el)))
}

pub(crate) fn parse_datetime_attr(time: ElementRef<'_>) -> Option<DateTime<Utc>> {
    let raw = time.value().attr("datetime")?;
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => Some(dt.with_timezone(&Utc)),
        Err(e) => {
            debug!(raw, error = %e, "unparsable datetime attribute");
            None
        }
    }
}

fn image_src(el: ElementRef<'_>, ctx: &ExtractContext<'_>) -> Option<String> {
    let img = if el.value().name() == "img" {
        el
    } else {
        dom::find_descendant_by_tag(el, "img")?
    };
    img.value().attr("src").map(|src| ctx.resolve(src))
}

fn collect_links(body: ElementRef<'_>, ctx: &ExtractContext<'_>) -> Vec<Link> {
    dom::find_all_descendants_by_tag(body, "a")
        .into_iter()
        .filter_map(|a| {
            let Some(href) = a.value().attr("href") else {
                trace!(text = %text_content(a), "body anchor without href");
                return None;
            };
            Some(Link {
                text: ctx.text(a),
                url: ctx.resolve(href),
            })
        })
        .collect()
}

fn social_context(author_block: ElementRef<'_>, ctx: &ExtractContext<'_>) -> Option<SocialContext> {
    let block = dom::previous_element_sibling(author_block)?;
    let el = dom::find_descendant_by_attribute(block, "data-testid", "socialContext")?;
    let actor_display_name = dom::find_descendant_by_tag(el, "span")
        .map(|span| ctx.text(span))
        .unwrap_or_default();
    Some(SocialContext {
        text: ctx.text(el),
        actor_display_name,
    })
}

/// The "Replying to @x" line sits right before the body's wrapper.
fn replying_to(body: ElementRef<'_>, ctx: &ExtractContext<'_>) -> Option<ReplyingTo> {
    let line = dom::parent_element(body).and_then(dom::previous_element_sibling)?;
    let Some(user) = dom::find_descendant_by_tag(line, "a") else {
        debug!("reply line without a user link");
        return None;
    };
    Some(ReplyingTo {
        text: ctx.text(line),
        handle: normalize_handle(&text_content(user)),
        user_link: ctx.href(user),
    })
}

fn card(
    scope: ElementRef<'_>,
    quote_el: Option<ElementRef<'_>>,
    ctx: &ExtractContext<'_>,
) -> Option<Card> {
    let wrapper = dom::find_all_descendants_by_attribute(scope, "data-testid", "card.wrapper")
        .into_iter()
        .find(|el| quote_el.map_or(true, |q| !dom::contains(q, *el)))?;

    // domain, separator, title, separator, description
    let spans = dom::find_all_descendants_by_tag(wrapper, "span");
    let url = dom::find_descendant_by_attribute(wrapper, "role", "link")
        .and_then(|link| link.value().attr("href"))
        .map(|href| ctx.resolve(href));
    if url.is_none() {
        trace!("card has no link");
    }

    Some(Card {
        url,
        domain: spans.first().map(|s| text_content(*s)).unwrap_or_default(),
        title: spans.get(2).map(|s| ctx.text(*s)).unwrap_or_default(),
        text: spans.get(4).map(|s| ctx.text(*s)),
        preview_image: image_src(wrapper, ctx),
    })
}

/// Reduced extraction for an embedded quote. It only counts as a quote when
/// it renders its own timestamp and avatar.
fn quoted_post(container: ElementRef<'_>, ctx: &ExtractContext<'_>) -> Option<QuotedPost> {
    let Some(time) = container.select(&SPAN_TIME_SELECTOR).next() else {
        trace!("link container without a timestamp is not a quote");
        return None;
    };
    let Some(avatar) =
        dom::find_descendant_by_attribute(container, "data-testid", QUOTE_AVATAR_TESTID)
    else {
        trace!("link container without an avatar is not a quote");
        return None;
    };

    // display name, separator, handle, ...
    let spans = dom::find_all_descendants_by_tag(container, "span");

    Some(QuotedPost {
        timestamp: parse_datetime_attr(time),
        display_time: Some(text_content(time)),
        author_display_name: spans.first().map(|s| ctx.text(*s)).unwrap_or_default(),
        author_handle: spans
            .get(2)
            .map(|s| normalize_handle(&text_content(*s)))
            .unwrap_or_default(),
        author_verified: dom::find_descendant_by_attribute(container, "aria-label", VERIFIED_LABEL)
            .is_some(),
        body: dom::find_descendant_by_attribute(container, BODY_MARKER.0, BODY_MARKER.1)
            .map(|el| ctx.text(el)),
        author_avatar_url: image_src(avatar, ctx).unwrap_or_default(),
        is_thread: spans
            .iter()
            .any(|s| text_content(*s).trim() == QUOTE_THREAD_LABEL),
        has_video: dom::find_descendant_by_attribute(container, "aria-label", VIDEO_LABEL)
            .is_some(),
        has_image: dom::find_descendant_by_attribute(container, "aria-label", IMAGE_LABEL)
            .is_some(),
    })
}

fn has_own_media(scope: ElementRef<'_>, quote_el: Option<ElementRef<'_>>, label: &str) -> bool {
    dom::find_all_descendants_by_attribute(scope, "aria-label", label)
        .into_iter()
        .any(|el| quote_el.map_or(true, |q| !dom::contains(q, el)))
}

/// A thread shows a connector line next to the avatar column.
fn is_thread(avatar: Option<ElementRef<'_>>) -> Result<bool, HeuristicMismatch> {
    let avatar = avatar.ok_or(HeuristicMismatch::new("thread", "an avatar link"))?;
    let column = dom::nth_ancestor(avatar, THREAD_LINE_DEPTH)
        .ok_or(HeuristicMismatch::new("thread", "avatar nested in the avatar column"))?;
    Ok(dom::next_element_sibling(column).is_some())
}

fn is_promoted(scope: ElementRef<'_>) -> Result<bool, HeuristicMismatch> {
    let trailing = dom::descend_last(scope, PROMOTED_CHAIN_DEPTH)
        .ok_or(HeuristicMismatch::new("promoted", "a trailing element chain"))?;
    Ok(text_content(trailing).trim() == PROMOTED_LABEL)
}
