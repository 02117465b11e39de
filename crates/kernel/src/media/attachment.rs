//! Upload URL to media record resolution.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::MediaId;
use crate::store::{MediaStore, StoreResult};

/// Generated thumbnail suffix, `-WIDTHxHEIGHT`, right before an image extension.
#[allow(clippy::expect_used)]
static SIZE_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)-\d+x\d+(\.(?:jpg|jpeg|png|gif))$").expect("valid regex literal")
});

/// Resolves URLs under the upload base URL to media record IDs.
#[derive(Debug, Clone)]
pub struct AttachmentResolver {
    uploads_url: String,
}

impl AttachmentResolver {
    pub fn new(uploads_url: impl Into<String>) -> Self {
        let uploads_url: String = uploads_url.into();
        Self {
            uploads_url: uploads_url.trim_end_matches('/').to_string(),
        }
    }

    /// Relative path of the original file behind `url`.
    ///
    /// Returns None when `url` is empty or not under the upload base URL.
    /// Thumbnail URLs map to their original file.
    pub fn attached_file_path(&self, url: &str) -> Option<String> {
        let url = url.trim();
        if url.is_empty() || self.uploads_url.is_empty() {
            return None;
        }

        let relative = url
            .strip_prefix(self.uploads_url.as_str())?
            .strip_prefix('/')?;
        let original = SIZE_SUFFIX.replace(relative, "${1}");
        if original.is_empty() {
            return None;
        }
        Some(original.into_owned())
    }

    /// Find the media record behind `url`.
    pub async fn resolve(&self, media: &dyn MediaStore, url: &str) -> StoreResult<Option<MediaId>> {
        let Some(path) = self.attached_file_path(url) else {
            return Ok(None);
        };
        media.find_by_attached_file(&path).await
    }
}
