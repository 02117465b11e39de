//! Publishing settings.
//!
//! The settings are persisted as a single YAML document and loaded once at
//! start-up. Every section falls back to the stock defaults when missing, so
//! an empty file (or no file at all) yields a usable configuration.
//!
//! ```yaml
//! restrictions:
//!   min_words_title: 2
//!   max_words_title: 12
//!   thumbnail_required: true
//! roles:
//!   no_check: edit_others_posts
//!   instantly_publish: publish_posts
//! misc:
//!   nofollow_body_links: true
//! ```

mod messages;

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::models::CommentStatus;

pub use messages::Messages;

/// All settings consumed by the publishing services.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishingSettings {
    /// Validation thresholds.
    pub restrictions: PostRestrictions,

    /// Capabilities that unlock special treatment.
    pub roles: RoleSettings,

    /// Miscellaneous behaviour toggles.
    pub misc: MiscSettings,

    /// User-facing message catalogue.
    pub messages: Messages,
}

impl PublishingSettings {
    /// Parse settings from a YAML document.
    pub fn from_yaml(source: &str) -> Result<Self> {
        if source.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yml::from_str(source).context("failed to parse publishing settings")
    }

    /// Load settings from a YAML file, falling back to defaults if it does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!(path = %path.display(), "publishing settings not found, using defaults");
            return Ok(Self::default());
        }

        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let settings = Self::from_yaml(&source)?;
        debug!(path = %path.display(), ?settings, "publishing settings loaded");
        Ok(settings)
    }
}

/// Thresholds applied by the validator.
///
/// A zero minimum means the field is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostRestrictions {
    pub min_words_title: u32,
    pub max_words_title: u32,
    pub min_words_content: u32,
    pub max_words_content: u32,
    pub min_words_bio: u32,
    pub max_words_bio: u32,
    /// Maximum links in the article body.
    pub max_links: u32,
    /// Maximum links in the author bio.
    pub max_links_bio: u32,
    pub min_tags: u32,
    pub max_tags: u32,
    pub thumbnail_required: bool,
}

impl Default for PostRestrictions {
    fn default() -> Self {
        Self {
            min_words_title: 2,
            max_words_title: 12,
            min_words_content: 250,
            max_words_content: 2000,
            min_words_bio: 50,
            max_words_bio: 100,
            max_links: 2,
            max_links_bio: 2,
            min_tags: 1,
            max_tags: 5,
            thumbnail_required: false,
        }
    }
}

impl PostRestrictions {
    /// Restrictions that accept any well-formed submission.
    pub fn permissive() -> Self {
        Self {
            min_words_title: 0,
            max_words_title: u32::MAX,
            min_words_content: 0,
            max_words_content: u32::MAX,
            min_words_bio: 0,
            max_words_bio: u32::MAX,
            max_links: u32::MAX,
            max_links_bio: u32::MAX,
            min_tags: 0,
            max_tags: u32::MAX,
            thumbnail_required: false,
        }
    }
}

/// Capabilities checked against the acting user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleSettings {
    /// Users holding this capability skip validation.
    pub no_check: Option<String>,

    /// Users holding this capability publish without review.
    pub instantly_publish: Option<String>,
}

/// Miscellaneous behaviour toggles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MiscSettings {
    /// Add `rel="nofollow"` to links in the article body.
    pub nofollow_body_links: bool,

    /// Add `rel="nofollow"` to links in the author bio.
    pub nofollow_bio_links: bool,

    /// Do not store the author bio at all.
    pub disable_author_bio: bool,

    /// Adopt unparented images embedded in the body.
    pub assign_images: bool,

    /// Comment policy for new and updated records.
    pub default_comment_status: CommentStatus,
}

impl Default for MiscSettings {
    fn default() -> Self {
        Self {
            nofollow_body_links: false,
            nofollow_bio_links: false,
            disable_author_bio: false,
            assign_images: true,
            default_comment_status: CommentStatus::Open,
        }
    }
}
