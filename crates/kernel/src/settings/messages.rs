//! User-facing message catalogue.

use serde::{Deserialize, Serialize};

/// Messages shown to the submitter. Every entry can be overridden in the
/// settings file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub title_short_error: String,
    pub title_long_error: String,
    pub article_short_error: String,
    pub article_long_error: String,
    pub bio_short_error: String,
    pub bio_long_error: String,
    pub too_many_article_links_error: String,
    pub too_many_bio_links_error: String,
    pub too_few_tags_error: String,
    pub too_many_tags_error: String,
    pub featured_image_error: String,
    pub required_field_error: String,
    /// Heading placed above every submission failure.
    pub general_form_error: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            title_short_error: "The title is too short".to_string(),
            title_long_error: "The title is too long".to_string(),
            article_short_error: "The article is too short".to_string(),
            article_long_error: "The article is too long".to_string(),
            bio_short_error: "The bio is too short".to_string(),
            bio_long_error: "The bio is too long".to_string(),
            too_many_article_links_error: "There are too many links in the article body"
                .to_string(),
            too_many_bio_links_error: "There are too many links in the bio".to_string(),
            too_few_tags_error: "You haven't added the required number of tags".to_string(),
            too_many_tags_error: "There are too many tags".to_string(),
            featured_image_error: "You need to choose a featured image".to_string(),
            required_field_error: "You missed one or more required fields".to_string(),
            general_form_error: "Your submission has errors. Please try again!".to_string(),
        }
    }
}
