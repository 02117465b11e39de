//! Publishing failures.

use thiserror::Error;
use tracing::warn;

use crate::models::InvalidId;
use crate::store::StoreError;

/// Why a submission or deletion was refused.
///
/// The display text is the user-facing message.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Sorry! You failed the security check")]
    Authenticity,

    #[error("You don't have permission to edit this post.")]
    EditPermission,

    #[error("You don't have permission to delete this post")]
    DeletePermission,

    /// Rendered error list from the validator.
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    InvalidSelection(#[from] InvalidId),

    /// The content store refused the write; carries the store's message.
    #[error("{0}")]
    Store(String),

    #[error("An error occurred while associating images to article")]
    ImageAssociation,

    #[error("The article could not be deleted")]
    DeleteFailed,
}

/// Shown in place of infrastructure failure details.
const STORE_FAILURE_MESSAGE: &str = "The article could not be saved";

impl PublishError {
    /// Convert a store failure, keeping refusals and hiding backend faults.
    pub fn store(err: StoreError) -> Self {
        match err {
            StoreError::Rejected(message) => Self::Store(message),
            other => {
                warn!(error = ?other, "content store failure");
                Self::Store(STORE_FAILURE_MESSAGE.to_string())
            }
        }
    }

    /// Short label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Authenticity => "authenticity",
            Self::EditPermission | Self::DeletePermission => "permission",
            Self::Validation(_) | Self::InvalidSelection(_) => "validation",
            Self::Store(_) => "store",
            Self::ImageAssociation => "association",
            Self::DeleteFailed => "failed",
        }
    }
}
