//! JSON payloads returned by the publishing endpoints.

use serde::{Deserialize, Serialize};

use crate::models::PostId;

use super::PublishError;

/// How a successful submission changed the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishAction {
    Published,
    Submitted,
    Updated,
}

impl PublishAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Published => "published",
            Self::Submitted => "submitted",
            Self::Updated => "updated",
        }
    }
}

impl std::fmt::Display for PublishAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A saved submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub post_id: PostId,
    pub action: PublishAction,
}

/// Response body of the submit and delete endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_id: Option<PostId>,
}

impl PublishResponse {
    /// Successful submission, with a link back into the editor.
    pub fn submitted(outcome: SubmitOutcome) -> Self {
        Self {
            success: true,
            message: format!(
                "Your article has been {} successfully!<br/><a href=\"#\" id=\"fep-continue-editing\">Continue Editing</a>",
                outcome.action
            ),
            post_id: Some(outcome.post_id),
        }
    }

    /// Failed submission; the reason follows the general form error.
    pub fn submit_failed(err: &PublishError, general_form_error: &str) -> Self {
        Self {
            success: false,
            message: format!("<strong>{general_form_error}</strong><br/>{err}"),
            post_id: None,
        }
    }

    pub fn deleted() -> Self {
        Self {
            success: true,
            message: "The article has been deleted successfully!".to_string(),
            post_id: None,
        }
    }

    /// Failed deletion; the reason is shown as is.
    pub fn delete_failed(err: &PublishError) -> Self {
        Self {
            success: false,
            message: err.to_string(),
            post_id: None,
        }
    }
}
