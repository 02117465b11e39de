//! Counting helpers used by validation.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

/// Markup spans: comments, and tags starting with a letter, `/`, `!`, or `?`.
/// An unterminated tag runs to the end of the input.
#[allow(clippy::expect_used)]
static MARKUP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<!--.*?(?:-->|$)|<[A-Za-z/!?][^>]*(?:>|$)").expect("valid regex literal")
});

/// Closing anchor tag counted as one link.
const LINK_CLOSE: &str = "</a>";

/// Remove all markup, keeping text content.
pub fn strip_tags(input: &str) -> Cow<'_, str> {
    MARKUP.replace_all(input, "")
}

/// Count words.
///
/// A word is a maximal run of alphabetic characters, apostrophes, and
/// hyphens. A leading apostrophe or hyphen of the whole text, and a trailing
/// hyphen of the whole text, are ignored. Digits and other punctuation are
/// separators.
pub fn word_count(text: &str) -> usize {
    let mut chars: &str = text;
    if chars.starts_with(['\'', '-']) {
        chars = &chars[1..];
    }
    if let Some(rest) = chars.strip_suffix('-') {
        chars = rest;
    }

    let mut count = 0;
    let mut in_word = false;
    for c in chars.chars() {
        if c.is_alphabetic() || c == '\'' || c == '-' {
            if !in_word {
                count += 1;
                in_word = true;
            }
        } else {
            in_word = false;
        }
    }
    count
}

/// Count links as the number of closing anchor tags.
pub fn link_count(html: &str) -> usize {
    html.matches(LINK_CLOSE).count()
}

/// Count tags as comma separations plus one.
///
/// An empty list still counts as one tag.
pub fn tag_count(tags: &str) -> usize {
    tags.split(',').count()
}
