//! Text extraction with emoji substitution
//!
//! The site renders emoji as `<img>` elements, so a plain text walk loses
//! them. [`extract_text`] reproduces the visible run of text the way a user
//! would select it: text leaves verbatim, emoji images per [`EmojiStyle`],
//! and no whitespace injected at element boundaries.

use scraper::{ElementRef, Node};

use crate::config::EmojiStyle;

pub fn extract_text(el: ElementRef<'_>, style: EmojiStyle) -> String {
    let mut out = String::new();

    for node in el.descendants() {
        match node.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(img) if img.name() == "img" => match style {
                EmojiStyle::None => {}
                EmojiStyle::Emoji => out.push_str(img.attr("alt").unwrap_or("")),
                EmojiStyle::Label => {
                    out.push('(');
                    out.push_str(img.attr("title").unwrap_or(""));
                    out.push(')');
                }
            },
            _ => {}
        }
    }

    out
}

/// Concatenated text leaves only, images ignored.
pub fn text_content(el: ElementRef<'_>) -> String {
    el.text().collect()
}
