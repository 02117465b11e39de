//! Submitted article form.

use serde::Deserialize;

use super::{CategoryId, InvalidId, MediaId, PostId};

/// Raw submission as posted by the front-end form.
///
/// Every field is optional on the wire and defaults to the empty string, so
/// missing fields are reported by validation rather than by deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SubmissionForm {
    pub post_title: String,
    pub post_content: String,
    pub post_tags: String,
    pub about_the_author: String,
    pub featured_img: String,
    pub post_category: String,
    pub post_id: String,
    pub post_nonce: String,
}

/// Raw deletion request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DeleteForm {
    pub post_id: String,
    pub delete_nonce: String,
}

/// A submission with its references parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submission {
    pub title: String,
    /// Rich text body.
    pub body: String,
    /// Comma-separated tag list.
    pub tags: String,
    /// Rich text bio; `"-1"` means the form carried no bio.
    pub bio: String,
    pub featured_image: Option<MediaId>,
    pub category: Option<CategoryId>,
    /// Record being edited; None for a new record.
    pub post_id: Option<PostId>,
}

impl Submission {
    /// Parse the identifier fields of a raw form.
    pub fn from_form(form: SubmissionForm) -> Result<Self, InvalidId> {
        Ok(Self {
            featured_image: MediaId::parse_selection("featured_img", &form.featured_img)?,
            category: CategoryId::parse_selection("post_category", &form.post_category)?,
            post_id: PostId::parse_selection("post_id", &form.post_id)?,
            title: form.post_title,
            body: form.post_content,
            tags: form.post_tags,
            bio: form.about_the_author,
        })
    }

    /// Whether the submission edits an existing record.
    pub fn is_update(&self) -> bool {
        self.post_id.is_some()
    }
}
