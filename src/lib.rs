//! Post extraction from rendered social-media HTML
//!
//! Turns one rendered post, located from any element inside it, into a
//! normalized [`Post`] record:
//! - Timeline layout (timelines, search, replies)
//! - Detail layout (the post a status page is opened on)
//! - One level of embedded quote
//!
//! Also exposes a C interface that exchanges JSON.

pub mod config;
pub mod count;
pub mod dom;
pub mod error;
pub mod extractors;
pub mod ffi;
pub mod locator;
pub mod post;
pub mod text;

pub use config::{EmojiStyle, ExtractConfig};
pub use count::parse_count;
pub use error::ExtractError;
pub use extractors::{
    extract_from_html, extract_post, DetailExtractor, ExtractContext, ExtractionRequest,
    PostExtractor, TimelineExtractor,
};
pub use ffi::*;
pub use locator::{classify_variant, locate_anchor, locate_entity, locate_region, Anchor, Variant};
pub use post::{Card, Link, Post, QuotedPost, ReplyingTo, SocialContext};
pub use text::extract_text;
