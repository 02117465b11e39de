//! Content records and the payload used to create or update them.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CategoryId, MediaId, PostId, UserId};

/// Publication status of a content record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    /// Visible to readers.
    Publish,
    /// Awaiting editorial review.
    Pending,
}

impl PostStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PostStatus::Publish => "publish",
            PostStatus::Pending => "pending",
        }
    }

    /// Parse the stored representation.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "publish" => Some(PostStatus::Publish),
            "pending" => Some(PostStatus::Pending),
            _ => None,
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether readers may comment on a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentStatus {
    #[default]
    Open,
    Closed,
}

impl CommentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CommentStatus::Open => "open",
            CommentStatus::Closed => "closed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "open" => Some(CommentStatus::Open),
            "closed" => Some(CommentStatus::Closed),
            _ => None,
        }
    }
}

/// A content record as held by the host store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRecord {
    pub id: PostId,
    pub title: String,
    pub body: String,
    pub status: PostStatus,
    /// Author (None when submitted anonymously).
    pub author_id: Option<UserId>,
    pub category_id: Option<CategoryId>,
    pub tags: Vec<String>,
    pub comment_status: CommentStatus,
    /// Original publish date, preserved across updates.
    pub published_at: DateTime<Utc>,
    /// Featured image.
    pub thumbnail_id: Option<MediaId>,
    /// Free-form metadata (for example the author bio).
    pub meta: BTreeMap<String, String>,
}

/// Payload for creating (`id == None`) or updating a content record.
#[derive(Debug, Clone, PartialEq)]
pub struct PostDraft {
    pub id: Option<PostId>,
    pub title: String,
    pub body: String,
    /// Comma-separated tag list.
    pub tags: String,
    pub category_id: Option<CategoryId>,
    pub status: PostStatus,
    pub comment_status: CommentStatus,
    /// Publish date to keep; None lets the store stamp the current time.
    pub published_at: Option<DateTime<Utc>>,
    pub author_id: Option<UserId>,
}

impl PostDraft {
    /// Tags as stored: trimmed, blanks dropped, order kept.
    pub fn tag_list(&self) -> Vec<String> {
        split_tags(&self.tags)
    }
}

/// Split a comma-separated tag list into individual tags.
pub fn split_tags(tags: &str) -> Vec<String> {
    tags.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}
