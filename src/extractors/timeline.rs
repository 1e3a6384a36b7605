//! Timeline layout
//!
//! Used for every post except the one a status page is opened on. The
//! author row is the second child of the header; the first four role links
//! in it are avatar, display name, handle and timestamp.

use scraper::ElementRef;
use tracing::{debug, trace};

use super::{
    apply_shared_steps, own_body, parse_datetime_attr, AuthorLinks, ExtractContext, Layout,
    PostExtractor, ROLE_LINK_SELECTOR,
};
use crate::count::parse_count;
use crate::dom;
use crate::post::Post;
use crate::text::text_content;

/// Depth of the header below the entity root.
const HEADER_DEPTH: usize = 3;
/// Index of the post row within the header; the row before it carries the
/// social context.
const POST_ROW_INDEX: usize = 1;

pub struct TimelineExtractor;

impl PostExtractor for TimelineExtractor {
    fn extract(&self, entity: ElementRef<'_>, ctx: &ExtractContext<'_>) -> Post {
        let row = post_row(entity);
        let links: Vec<_> = row.select(&ROLE_LINK_SELECTOR).collect();
        let author = AuthorLinks::from_links(&links);

        let mut post = Post::default();
        author.fill(&mut post, ctx);

        // A promoted post has no timestamp, so the fourth link may be a
        // hashtag or card link instead.
        let timestamp = links.get(3).copied().and_then(|link| qualify_timestamp(link, ctx));
        if let Some((link, time)) = timestamp {
            post.timestamp = parse_datetime_attr(time);
            post.permalink = link.value().attr("href").map(|href| ctx.resolve(href));
            post.display_time = Some(text_content(link));
        } else {
            debug!("timeline post without a timestamp link");
        }

        post.reply_count = action_count(row, "reply");
        post.retweet_count = action_count(row, "retweet");
        post.like_count = action_count(row, "like");

        let layout = Layout {
            scope: row,
            author_block: row,
            avatar: author.avatar,
            body: own_body(row),
        };
        apply_shared_steps(&mut post, &layout, ctx);

        post
    }
}

fn post_row(entity: ElementRef<'_>) -> ElementRef<'_> {
    dom::descend_first(entity, HEADER_DEPTH)
        .and_then(|header| dom::nth_element_child(header, POST_ROW_INDEX))
        .unwrap_or_else(|| {
            debug!("timeline header not at the expected offset, searching the whole post");
            entity
        })
}

/// A timestamp link points at a status on the site and wraps a `time`.
fn qualify_timestamp<'a>(
    link: ElementRef<'a>,
    ctx: &ExtractContext<'_>,
) -> Option<(ElementRef<'a>, ElementRef<'a>)> {
    let href = link.value().attr("href")?;
    if !ctx.is_status_url(href) {
        trace!(href, "fourth link is not a status link");
        return None;
    }
    let time = dom::find_descendant_by_tag(link, "time")?;
    Some((link, time))
}

/// An action that is rendered without a number has zero; one that is not
/// rendered at all is unknown.
fn action_count(row: ElementRef<'_>, testid: &str) -> Option<u64> {
    dom::find_descendant_by_attribute(row, "data-testid", testid)
        .map(|action| parse_count(&text_content(action)).unwrap_or(0))
}
