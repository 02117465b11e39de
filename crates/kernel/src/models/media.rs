//! Media records.

use serde::{Deserialize, Serialize};

use super::{MediaId, PostId};

/// Status of a media record attached through the normal upload flow.
pub const INHERIT_STATUS: &str = "inherit";

/// An uploaded file known to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRecord {
    pub id: MediaId,
    /// Public URL of the original file.
    pub url: String,
    /// Path of the original file relative to the upload base URL.
    pub attached_file: String,
    pub mime_type: String,
    pub status: String,
    /// Owning content record (None while unparented).
    pub parent_id: Option<PostId>,
    pub width: u32,
    pub height: u32,
    pub alt: String,
}

impl MediaRecord {
    /// Whether the file is an image.
    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    /// Whether the record may be adopted by a content record: an unparented
    /// image in the `inherit` status.
    pub fn is_adoptable(&self) -> bool {
        self.parent_id.is_none() && self.status == INHERIT_STATUS && self.is_image()
    }
}
