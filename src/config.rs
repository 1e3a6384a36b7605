//! Extraction options
//!
//! Passed by reference into every extraction call.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How inline emoji images contribute to extracted text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmojiStyle {
    /// Emoji images are dropped.
    None,
    /// The image's alt text, i.e. the glyph itself.
    #[default]
    Emoji,
    /// The image's title wrapped in parentheses, e.g. `(Red heart)`.
    Label,
}

impl FromStr for EmojiStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "0" | "none" => Ok(Self::None),
            "1" | "emoji" => Ok(Self::Emoji),
            "2" | "label" => Ok(Self::Label),
            other => Err(format!("unknown emoji style '{other}' (expected none, emoji or label)")),
        }
    }
}

impl fmt::Display for EmojiStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "none",
            Self::Emoji => "emoji",
            Self::Label => "label",
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    pub emoji_style: EmojiStyle,
    /// Approximate the reply count on a detail page by counting the posts
    /// rendered below it.
    pub estimate_display_replies: bool,
    /// Offset of the viewer's clock, used for detail-page timestamps which
    /// are only rendered as local display text.
    pub display_utc_offset_minutes: i32,
}
