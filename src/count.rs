//! Engagement count parsing
//!
//! Counts are displayed abbreviated ("12.3K", "1,024", "3M"). The scaling is
//! done on the digit string rather than with floating point so large
//! magnitudes come out exact.

use once_cell::sync::Lazy;
use regex::Regex;

static COUNT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d[\d,]*)(?:\.(\d*))?([KM])?").unwrap());

/// Parse the first count in `text`, or `None` when it holds no digits.
///
/// The fractional part is shifted into the suffix's zeros digit by digit:
/// `1.25K` is 1250. Fraction digits beyond the suffix's precision are
/// truncated. Without a suffix the point is only a separator, so `1.234`
/// is 1234.
pub fn parse_count(text: &str) -> Option<u64> {
    let caps = COUNT_PATTERN.captures(text)?;

    let integer: String = caps[1].chars().filter(char::is_ascii_digit).collect();
    let fraction = caps.get(2).map_or("", |m| m.as_str());
    let zeros = match caps.get(3).map(|m| m.as_str()) {
        Some("K") => 3,
        Some("M") => 6,
        _ => 0,
    };

    let mut digits = integer;
    if zeros == 0 {
        digits.push_str(fraction);
    } else {
        digits.extend(fraction.chars().chain(std::iter::repeat('0')).take(zeros));
    }

    digits.parse().ok()
}
