//! Text filter pipeline.
//!
//! Submitted text is cleaned before it is stored:
//! - plain fields (title, tags): all markup removed, whitespace collapsed
//! - rich fields (body, bio): reduced to the post-safe HTML subset, with
//!   links optionally marked `rel="nofollow"`

use std::sync::LazyLock;

use regex::Regex;

use super::text::strip_tags;

/// Script and style elements, removed together with their content.
#[allow(clippy::expect_used)]
static SCRIPT_OR_STYLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(script|style)\b[^>]*>.*?</(script|style)\s*>").expect("valid regex literal")
});

/// Runs of whitespace, including line breaks and tabs.
#[allow(clippy::expect_used)]
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex literal"));

/// Trait for text filters in the pipeline.
pub trait TextFilter: Send + Sync {
    /// Process the input text and return filtered output.
    fn process(&self, input: &str) -> String;
}

/// Pipeline of text filters applied in sequence.
pub struct FilterPipeline {
    filters: Vec<Box<dyn TextFilter>>,
}

impl FilterPipeline {
    /// Create a new empty pipeline.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Add a filter to the pipeline.
    pub fn add<F: TextFilter + 'static>(mut self, filter: F) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Pipeline for single-line plain text fields.
    pub fn plain_text() -> Self {
        Self::new().add(PlainTextFilter)
    }

    /// Pipeline for rich text fields.
    pub fn rich_text(nofollow: bool) -> Self {
        Self::new().add(PostHtmlFilter { nofollow })
    }

    /// Process text through all filters in the pipeline.
    pub fn process(&self, input: &str) -> String {
        self.filters
            .iter()
            .fold(input.to_string(), |acc, filter| filter.process(&acc))
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::plain_text()
    }
}

/// Strips all markup and collapses whitespace to single spaces.
pub struct PlainTextFilter;

impl TextFilter for PlainTextFilter {
    fn process(&self, input: &str) -> String {
        let without_code = SCRIPT_OR_STYLE.replace_all(input, "");
        let stripped = strip_tags(&without_code);
        WHITESPACE.replace_all(&stripped, " ").trim().to_string()
    }
}

/// Reduces markup to the post-safe subset using ammonia.
///
/// With `nofollow`, every link gets `rel="nofollow"`; otherwise links carry
/// no `rel` attribute.
pub struct PostHtmlFilter {
    pub nofollow: bool,
}

impl TextFilter for PostHtmlFilter {
    fn process(&self, input: &str) -> String {
        let mut builder = ammonia::Builder::default();
        builder.link_rel(self.nofollow.then_some("nofollow"));
        builder.clean(input).to_string()
    }
}
