//! Form authenticity.
//!
//! Every state-changing publishing request carries a single-use token issued
//! for that action and stored in the caller's session.

pub mod csrf;

pub use csrf::{TokenAction, generate_csrf_token, verify_csrf_token};
