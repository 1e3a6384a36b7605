//! Normalized post record
//!
//! One shape for both layouts. Counts are `None` when the render does not
//! expose the metric; that is "unknown", not zero.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub timestamp: Option<DateTime<Utc>>,
    pub permalink: Option<String>,
    pub display_time: Option<String>,
    pub author_display_name: String,
    /// Without the leading `@`.
    pub author_handle: String,
    pub author_verified: bool,
    /// `None` for card-only or media-only posts.
    pub body: Option<String>,
    pub author_profile_link: String,
    pub author_avatar_url: String,
    pub reply_count: Option<u64>,
    /// The reply count was approximated from the replies rendered on the page.
    pub reply_count_is_estimate: bool,
    pub retweet_count: Option<u64>,
    pub like_count: Option<u64>,
    pub quote_count: Option<u64>,
    pub links: Vec<Link>,
    pub social_context: Option<SocialContext>,
    pub is_thread: bool,
    pub is_promoted: bool,
    pub replying_to: Option<ReplyingTo>,
    pub card: Option<Card>,
    pub quote: Option<QuotedPost>,
    /// Media attached to this post itself, never to its quote.
    pub has_video: bool,
    pub has_image: bool,
}

/// An embedded quoted post. It has no quote slot of its own, which keeps
/// nesting to one level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotedPost {
    pub timestamp: Option<DateTime<Utc>>,
    pub display_time: Option<String>,
    pub author_display_name: String,
    pub author_handle: String,
    pub author_verified: bool,
    pub body: Option<String>,
    pub author_avatar_url: String,
    pub is_thread: bool,
    pub has_video: bool,
    pub has_image: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub text: String,
    pub url: String,
}

/// Why the post is in the timeline, e.g. "Alice Retweeted".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialContext {
    pub text: String,
    pub actor_display_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyingTo {
    pub text: String,
    pub handle: String,
    pub user_link: String,
}

/// Link preview attachment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub url: Option<String>,
    pub domain: String,
    pub title: String,
    pub text: Option<String>,
    pub preview_image: Option<String>,
}

/// Strip the handle sigil and surrounding whitespace.
pub(crate) fn normalize_handle(raw: &str) -> String {
    raw.trim().trim_start_matches('@').to_string()
}
