//! Detail layout
//!
//! The post a status page is opened on. Its header splits author and body
//! into separate rows, the timestamp is display text rather than a `time`
//! element, and engagement totals are links whose text names the metric.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Selector};
use tracing::{debug, trace};

use super::{
    apply_shared_steps, own_body, AuthorLinks, ExtractContext, Layout, PostExtractor,
    ROLE_LINK_SELECTOR,
};
use crate::count::parse_count;
use crate::dom::{self, POST_MARKER};
use crate::locator::locate_region;
use crate::post::Post;
use crate::text::text_content;

const HEADER_DEPTH: usize = 3;
const AUTHOR_ROW_INDEX: usize = 1;
const BODY_ROW_INDEX: usize = 2;

static ENGAGEMENT_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"[role="group"] [role="link"]"#).unwrap());

static DISPLAY_TIME_NOISE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\dA-Za-z :,]").unwrap());

const DISPLAY_TIME_FORMATS: &[&str] = &[
    "%I:%M %p %b %d, %Y",
    "%H:%M %b %d, %Y",
    "%I:%M %p %d %b %Y",
    "%H:%M %d %b %Y",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Metric {
    Retweets,
    Quotes,
    Likes,
}

impl Metric {
    /// Keyword match on the link's visible text.
    fn from_label(label: &str) -> Option<Self> {
        if label.contains("Retweet") || label.contains("Repost") {
            Some(Self::Retweets)
        } else if label.contains("Quote") {
            Some(Self::Quotes)
        } else if label.contains("Like") {
            Some(Self::Likes)
        } else {
            None
        }
    }
}

pub struct DetailExtractor;

impl PostExtractor for DetailExtractor {
    fn extract(&self, entity: ElementRef<'_>, ctx: &ExtractContext<'_>) -> Post {
        let header = dom::descend_first(entity, HEADER_DEPTH);
        let author_row = header
            .and_then(|h| dom::nth_element_child(h, AUTHOR_ROW_INDEX))
            .unwrap_or_else(|| {
                debug!("detail author row not at the expected offset");
                entity
            });
        let body_row = header
            .and_then(|h| dom::nth_element_child(h, BODY_ROW_INDEX))
            .unwrap_or(entity);

        let author_links: Vec<_> = author_row.select(&ROLE_LINK_SELECTOR).collect();
        let author = AuthorLinks::from_links(&author_links);

        let mut post = Post::default();
        author.fill(&mut post, ctx);

        let offset = ctx.config.display_utc_offset_minutes;
        match find_timestamp(body_row, ctx, offset) {
            Some((link, display, timestamp)) => {
                post.timestamp = Some(timestamp);
                post.display_time = Some(display);
                post.permalink = link.value().attr("href").map(|href| ctx.resolve(href));
            }
            None => debug!("detail post without a timestamp link"),
        }

        if ctx.config.estimate_display_replies {
            if let Some(count) = estimate_replies(entity) {
                post.reply_count = Some(count);
                post.reply_count_is_estimate = true;
            }
        }

        for link in entity.select(&ENGAGEMENT_SELECTOR) {
            let label = text_content(link);
            if label.trim().is_empty() {
                trace!("engagement link without text");
                continue;
            }
            let count = parse_count(&label);
            match Metric::from_label(&label) {
                Some(Metric::Retweets) => post.retweet_count = count,
                Some(Metric::Quotes) => post.quote_count = count,
                Some(Metric::Likes) => post.like_count = count,
                None => trace!(label = %label, "unrecognized engagement link"),
            }
        }

        let layout = Layout {
            scope: entity,
            author_block: author_row,
            avatar: author.avatar,
            body: own_body(entity),
        };
        apply_shared_steps(&mut post, &layout, ctx);

        post
    }
}

/// The first body link whose leading span reads as a date and which points
/// at a status on the site.
fn find_timestamp<'a>(
    body_row: ElementRef<'a>,
    ctx: &ExtractContext<'_>,
    offset_minutes: i32,
) -> Option<(ElementRef<'a>, String, DateTime<Utc>)> {
    body_row.select(&ROLE_LINK_SELECTOR).find_map(|link| {
        let span = dom::find_descendant_by_tag(link, "span")?;
        let display = text_content(span);
        let timestamp = parse_display_time(&display, offset_minutes)?;
        let href = link.value().attr("href")?;
        if !ctx.is_status_url(href) {
            trace!(href, "dated link is not a status link");
            return None;
        }
        Some((link, display, timestamp))
    })
}

/// Parse display text such as `3:45 PM · Jul 27, 2022`, rendered in the
/// viewer's local time at `offset_minutes` from UTC.
pub(crate) fn parse_display_time(display: &str, offset_minutes: i32) -> Option<DateTime<Utc>> {
    let cleaned = DISPLAY_TIME_NOISE.replace_all(display, "");
    let cleaned = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    if cleaned.is_empty() {
        return None;
    }

    let naive = DISPLAY_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(&cleaned, format).ok())?;
    let offset = FixedOffset::east_opt(offset_minutes.checked_mul(60)?)?;
    offset
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Posts rendered in the conversation region, minus the post itself.
fn estimate_replies(entity: ElementRef<'_>) -> Option<u64> {
    let region = locate_region(entity)?;
    let posts = dom::find_all_descendants_by_attribute(region, POST_MARKER.0, POST_MARKER.1).len();
    Some(posts.saturating_sub(1) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExtractConfig;
    use crate::extractors::fixtures::{PostFixture, QuoteFixture, DETAIL_URL};
    use crate::locator::{classify_variant, locate_entity, Variant};
    use rstest::rstest;
    use scraper::Html;

    fn extract_html_with(html: &str, config: &ExtractConfig) -> Post {
        let doc = Html::parse_document(html);
        let start = doc
            .select(&Selector::parse(r#"[data-testid="tweet"] span"#).unwrap())
            .next()
            .unwrap();
        let entity = locate_entity(start).unwrap();
        assert_eq!(classify_variant(entity, DETAIL_URL), Variant::Detail);
        DetailExtractor.extract(entity, &ExtractContext::new(DETAIL_URL, config))
    }

    fn extract(fixture: &PostFixture) -> Post {
        extract_html_with(&fixture.detail_html(), &ExtractConfig::default())
    }

    #[rstest]
    #[case("3:45 PM · Jul 27, 2022", 0, "2022-07-27T15:45:00Z")]
    #[case("12:05 AM · Jan 1, 2023", 0, "2023-01-01T00:05:00Z")]
    #[case("3:45 PM · Jul 27, 2022", 120, "2022-07-27T13:45:00Z")]
    #[case("15:45 · 27 Jul 2022", 0, "2022-07-27T15:45:00Z")]
    fn test_parse_display_time(#[case] display: &str, #[case] offset: i32, #[case] expected: &str) {
        let expected = DateTime::parse_from_rfc3339(expected).unwrap().with_timezone(&Utc);
        assert_eq!(parse_display_time(display, offset), Some(expected));
    }

    #[rstest]
    #[case("5")]
    #[case("#rust")]
    #[case("example.com")]
    #[case("")]
    fn test_parse_display_time_rejects(#[case] display: &str) {
        assert_eq!(parse_display_time(display, 0), None);
    }

    #[test]
    fn test_metric_keywords() {
        assert_eq!(Metric::from_label("5 Retweets"), Some(Metric::Retweets));
        assert_eq!(Metric::from_label("5 Reposts"), Some(Metric::Retweets));
        assert_eq!(Metric::from_label("2 Quote Tweets"), Some(Metric::Quotes));
        assert_eq!(Metric::from_label("2 Quotes"), Some(Metric::Quotes));
        assert_eq!(Metric::from_label("1 Like"), Some(Metric::Likes));
        assert_eq!(Metric::from_label("3 Bookmarks"), None);
    }

    #[test]
    fn test_detail_fields() {
        let fixture = PostFixture {
            verified: true,
            ..PostFixture::default()
        };
        let post = extract(&fixture);

        assert_eq!(post.author_display_name, "Alice");
        assert_eq!(post.author_handle, "alice");
        assert!(post.author_verified);
        assert_eq!(post.author_profile_link, "https://twitter.com/alice");
        assert_eq!(
            post.author_avatar_url,
            "https://pbs.twimg.com/profile_images/alice.jpg"
        );
        assert_eq!(post.body.as_deref(), Some("Shipping the parser today"));
        assert_eq!(post.display_time.as_deref(), Some("3:45 PM · Jul 27, 2022"));
        assert_eq!(post.permalink.as_deref(), Some("https://twitter.com/alice/status/1552"));
        assert_eq!(
            post.timestamp,
            DateTime::parse_from_rfc3339("2022-07-27T15:45:00Z")
                .ok()
                .map(|dt| dt.with_timezone(&Utc))
        );
        assert_eq!(post.retweet_count, Some(5));
        assert_eq!(post.quote_count, Some(2));
        assert_eq!(post.like_count, Some(1024));
        assert_eq!(post.reply_count, None);
        assert!(!post.reply_count_is_estimate);
    }

    #[test]
    fn test_missing_engagement_stays_unknown() {
        let fixture = PostFixture {
            engagement: vec!["9 Likes"],
            ..PostFixture::default()
        };
        let post = extract(&fixture);
        assert_eq!(post.like_count, Some(9));
        assert_eq!(post.retweet_count, None);
        assert_eq!(post.quote_count, None);
    }

    #[test]
    fn test_reply_estimate_from_region() {
        let fixture = PostFixture::default();
        let config = ExtractConfig {
            estimate_display_replies: true,
            ..ExtractConfig::default()
        };
        let post = extract_html_with(&fixture.detail_page_html(3), &config);
        assert_eq!(post.reply_count, Some(3));
        assert!(post.reply_count_is_estimate);

        // disabled: unknown, even with replies on the page
        let post = extract_html_with(&fixture.detail_page_html(3), &ExtractConfig::default());
        assert_eq!(post.reply_count, None);
        assert!(!post.reply_count_is_estimate);

        // enabled but no region: unknown
        let post = extract_html_with(&fixture.detail_html(), &config);
        assert_eq!(post.reply_count, None);
        assert!(!post.reply_count_is_estimate);
    }

    #[test]
    fn test_shared_steps_on_detail_layout() {
        let fixture = PostFixture {
            thread: true,
            card: true,
            social_context: Some("Bob"),
            replying_to: Some("dave"),
            quote: Some(QuoteFixture::default()),
            ..PostFixture::default()
        };
        let post = extract(&fixture);
        assert!(post.is_thread);
        assert_eq!(post.social_context.unwrap().actor_display_name, "Bob");
        assert_eq!(post.replying_to.unwrap().handle, "dave");
        assert_eq!(post.card.unwrap().title, "Example title");
        assert_eq!(post.quote.unwrap().author_handle, "carol");
        assert!(post.timestamp.is_some());
    }

    #[test]
    fn test_body_less_detail_post() {
        let fixture = PostFixture {
            body: None,
            image: true,
            ..PostFixture::default()
        };
        let post = extract(&fixture);
        assert_eq!(post.body, None);
        assert!(post.has_image);
        assert!(post.timestamp.is_some());
    }
}
