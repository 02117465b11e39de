//! Media helpers for the publishing flow.
//!
//! - AttachmentResolver: maps an upload URL back to its media record
//! - Featured image rendering for the submission form preview

pub mod attachment;
pub mod render;

pub use attachment::AttachmentResolver;
pub use render::{FEATURED_IMAGE_BOX, featured_image_html};
