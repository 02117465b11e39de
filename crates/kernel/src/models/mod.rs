//! Domain models.
//!
//! Content and media records are owned by the host platform; Scrivener only
//! reads them and writes the few fields the publishing flow touches.

pub mod ids;
pub mod media;
pub mod record;
pub mod submission;
pub mod user;

pub use ids::{CategoryId, InvalidId, MediaId, PostId, UserId};
pub use media::MediaRecord;
pub use record::{CommentStatus, ContentRecord, PostDraft, PostStatus};
pub use submission::{DeleteForm, Submission, SubmissionForm};
pub use user::UserContext;
