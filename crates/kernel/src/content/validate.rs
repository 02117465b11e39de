//! Submission validation against the configured restrictions.
//!
//! Every rule is evaluated independently; all violations are collected and
//! rendered as one HTML fragment, one message per line.

use crate::models::Submission;
use crate::models::ids::NO_SELECTION;
use crate::settings::{Messages, PostRestrictions};

use super::text::{link_count, strip_tags, tag_count, word_count};

/// Line format for a rendered violation.
const LINE_BREAK: &str = "<br/>";

/// A rendered error list with fewer words than this counts as no errors.
const MIN_ERROR_WORDS: usize = 2;

/// A single broken rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    RequiredField,
    TitleShort,
    TitleLong,
    ArticleShort,
    ArticleLong,
    BioShort,
    BioLong,
    TooManyArticleLinks,
    TooManyBioLinks,
    TooFewTags,
    TooManyTags,
    FeaturedImageMissing,
}

impl Violation {
    /// Message for this violation from the catalogue.
    pub fn message(self, messages: &Messages) -> &str {
        match self {
            Violation::RequiredField => &messages.required_field_error,
            Violation::TitleShort => &messages.title_short_error,
            Violation::TitleLong => &messages.title_long_error,
            Violation::ArticleShort => &messages.article_short_error,
            Violation::ArticleLong => &messages.article_long_error,
            Violation::BioShort => &messages.bio_short_error,
            Violation::BioLong => &messages.bio_long_error,
            Violation::TooManyArticleLinks => &messages.too_many_article_links_error,
            Violation::TooManyBioLinks => &messages.too_many_bio_links_error,
            Violation::TooFewTags => &messages.too_few_tags_error,
            Violation::TooManyTags => &messages.too_many_tags_error,
            Violation::FeaturedImageMissing => &messages.featured_image_error,
        }
    }
}

/// Applies [`PostRestrictions`] to a [`Submission`].
#[derive(Debug, Clone, Copy)]
pub struct Validator<'a> {
    restrictions: &'a PostRestrictions,
    messages: &'a Messages,
}

impl<'a> Validator<'a> {
    pub fn new(restrictions: &'a PostRestrictions, messages: &'a Messages) -> Self {
        Self {
            restrictions,
            messages,
        }
    }

    /// Collect every broken rule, in rule order.
    pub fn violations(&self, submission: &Submission) -> Vec<Violation> {
        let r = self.restrictions;
        let mut found = Vec::new();

        let title = submission.title.as_str();
        let body = submission.body.as_str();
        let bio = submission.bio.as_str();
        let tags = submission.tags.as_str();

        let missing_required = (r.min_words_title > 0 && title.is_empty())
            || (r.min_words_content > 0 && body.is_empty())
            || (r.min_words_bio > 0 && bio.is_empty())
            || (r.min_tags > 0 && tags.is_empty());
        if missing_required {
            found.push(Violation::RequiredField);
        }

        let title_words = word_count(title);
        let body_words = word_count(&strip_tags(body));
        let stripped_bio = strip_tags(bio);
        let bio_words = word_count(&stripped_bio);
        let no_bio = stripped_bio.trim() == NO_SELECTION;
        let tags_counted = tag_count(tags);

        if !title.is_empty() && title_words < r.min_words_title as usize {
            found.push(Violation::TitleShort);
        }
        if !title.is_empty() && title_words > r.max_words_title as usize {
            found.push(Violation::TitleLong);
        }
        if !body.is_empty() && body_words < r.min_words_content as usize {
            found.push(Violation::ArticleShort);
        }
        if body_words > r.max_words_content as usize {
            found.push(Violation::ArticleLong);
        }
        if !bio.is_empty() && !no_bio && bio_words < r.min_words_bio as usize {
            found.push(Violation::BioShort);
        }
        if !no_bio && bio_words > r.max_words_bio as usize {
            found.push(Violation::BioLong);
        }
        if link_count(body) > r.max_links as usize {
            found.push(Violation::TooManyArticleLinks);
        }
        if link_count(bio) > r.max_links_bio as usize {
            found.push(Violation::TooManyBioLinks);
        }
        if !tags.is_empty() && tags_counted < r.min_tags as usize {
            found.push(Violation::TooFewTags);
        }
        if tags_counted > r.max_tags as usize {
            found.push(Violation::TooManyTags);
        }
        if r.thumbnail_required && submission.featured_image.is_none() {
            found.push(Violation::FeaturedImageMissing);
        }

        found
    }

    /// Validate a submission, returning the rendered error list on failure.
    pub fn validate(&self, submission: &Submission) -> Result<(), String> {
        let rendered = render_violations(&self.violations(submission), self.messages);
        if word_count(&rendered) < MIN_ERROR_WORDS {
            return Ok(());
        }
        Err(rendered)
    }
}

/// Render violations as `message<br/>` lines.
pub fn render_violations(violations: &[Violation], messages: &Messages) -> String {
    violations
        .iter()
        .map(|v| format!("{}{LINE_BREAK}", v.message(messages)))
        .collect()
}
