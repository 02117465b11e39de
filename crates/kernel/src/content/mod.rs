//! Submitted content handling.
//!
//! This module provides:
//! - Validator: configured restrictions applied to a submission
//! - FilterPipeline: cleaning of plain and rich text before storage
//! - Image discovery for embedded site images

pub mod filter;
pub mod images;
pub mod text;
pub mod validate;

pub use filter::{FilterPipeline, TextFilter};
pub use images::site_image_sources;
pub use validate::{Validator, Violation};
