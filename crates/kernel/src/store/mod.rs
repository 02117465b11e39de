//! Host content and media stores.
//!
//! The publishing services never touch persistence directly. They go through
//! two capability traits implemented by the host integration:
//!
//! - [`ContentStore`]: content records and their metadata
//! - [`MediaStore`]: uploaded media lookups and parent association
//!
//! Implementations:
//!
//! - [`postgres::PgStore`]: PostgreSQL-backed store (production)
//! - [`memory::MemoryStore`]: in-memory store (tests and local development)

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{ContentRecord, MediaId, MediaRecord, PostDraft, PostId};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Store failures.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store refused the operation; the message is safe to show users.
    #[error("{0}")]
    Rejected(String),

    /// Database failure; details are logged, never shown.
    #[error("database error")]
    Database(#[from] sqlx::Error),

    /// Any other backend failure.
    #[error("store backend error")]
    Backend(#[from] anyhow::Error),
}

/// Result type alias using StoreError.
pub type StoreResult<T> = Result<T, StoreError>;

/// Content record persistence.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Load a record by ID.
    async fn find_post(&self, id: PostId) -> StoreResult<Option<ContentRecord>>;

    /// Create (`draft.id == None`) or update a record, returning its ID.
    ///
    /// Updating a record that does not exist is rejected.
    async fn upsert_post(&self, draft: PostDraft) -> StoreResult<PostId>;

    /// Permanently delete a record. Returns false if it did not exist.
    async fn delete_post(&self, id: PostId) -> StoreResult<bool>;

    /// Set a metadata value on a record, replacing any previous value.
    async fn set_meta(&self, id: PostId, key: &str, value: &str) -> StoreResult<()>;

    /// Set the featured image of a record.
    async fn set_thumbnail(&self, id: PostId, media: MediaId) -> StoreResult<()>;

    /// Whether the store is reachable.
    async fn healthy(&self) -> bool;
}

/// Media lookups and parent association.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Load a media record by ID.
    async fn find_media(&self, id: MediaId) -> StoreResult<Option<MediaRecord>>;

    /// Find the media record whose attached file path equals `path`.
    async fn find_by_attached_file(&self, path: &str) -> StoreResult<Option<MediaId>>;

    /// Make `parent` the parent of every listed record that is an
    /// unparented image in the `inherit` status, in one batch.
    ///
    /// Returns the number of records updated. The batch is not transactional
    /// across stores; a failure may leave some records updated.
    async fn adopt_media(&self, ids: &[MediaId], parent: PostId) -> StoreResult<u64>;
}
