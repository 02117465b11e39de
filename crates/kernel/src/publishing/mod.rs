//! Article publishing.
//!
//! [`PublishingService`] runs the submit and delete flows against the host
//! stores. Route handlers verify authenticity tokens, call the service, and
//! turn the result into a [`PublishResponse`].

mod error;
mod response;
mod service;

pub use error::PublishError;
pub use response::{PublishAction, PublishResponse, SubmitOutcome};
pub use service::{ABOUT_THE_AUTHOR, PublishingService};
