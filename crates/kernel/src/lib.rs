//! Scrivener Kernel Library
//!
//! Front-end article publishing: validation, submission, deletion, and
//! media association against host-provided content and media stores.
//! The main entry point for running the server is the `scrivener` binary.

pub mod config;
pub mod content;
pub mod db;
pub mod error;
pub mod form;
pub mod media;
pub mod metrics;
pub mod models;
pub mod permissions;
pub mod publishing;
pub mod routes;
pub mod session;
pub mod settings;
pub mod state;
pub mod store;

pub use config::Config;
pub use routes::build_router;
pub use state::AppState;
