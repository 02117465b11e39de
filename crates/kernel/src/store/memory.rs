//! In-memory store.
//!
//! Holds content and media records behind a single lock. Nothing is
//! persisted; used for tests and local development without PostgreSQL.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use tracing::debug;

use crate::models::{ContentRecord, MediaId, MediaRecord, PostDraft, PostId};

use super::{ContentStore, MediaStore, StoreError, StoreResult};

/// In-memory content and media store. Clones share the same data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<MemoryState>>,
}

#[derive(Default)]
struct MemoryState {
    posts: BTreeMap<PostId, ContentRecord>,
    media: BTreeMap<MediaId, MediaRecord>,
    last_post_id: u64,
    /// When set, upserts are rejected with this message.
    reject_upserts: Option<String>,
    /// When set, media adoption fails.
    fail_adoption: bool,
    /// When set, record lookups fail.
    fail_lookups: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a media record.
    pub fn insert_media(&self, media: MediaRecord) {
        self.inner.write().media.insert(media.id, media);
    }

    /// Add or replace a content record.
    pub fn insert_post(&self, post: ContentRecord) {
        let mut state = self.inner.write();
        state.last_post_id = state.last_post_id.max(post.id.0);
        state.posts.insert(post.id, post);
    }

    /// Snapshot of a content record.
    pub fn post(&self, id: PostId) -> Option<ContentRecord> {
        self.inner.read().posts.get(&id).cloned()
    }

    /// Snapshot of a media record.
    pub fn media(&self, id: MediaId) -> Option<MediaRecord> {
        self.inner.read().media.get(&id).cloned()
    }

    /// Number of content records.
    pub fn post_count(&self) -> usize {
        self.inner.read().posts.len()
    }

    /// Reject every subsequent upsert with `message` (None restores normal behaviour).
    pub fn reject_upserts(&self, message: Option<&str>) {
        self.inner.write().reject_upserts = message.map(String::from);
    }

    /// Make every subsequent media adoption fail.
    pub fn fail_adoption(&self, fail: bool) {
        self.inner.write().fail_adoption = fail;
    }

    /// Make every subsequent record lookup fail.
    pub fn fail_lookups(&self, fail: bool) {
        self.inner.write().fail_lookups = fail;
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.read();
        f.debug_struct("MemoryStore")
            .field("posts", &state.posts.len())
            .field("media", &state.media.len())
            .finish()
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn find_post(&self, id: PostId) -> StoreResult<Option<ContentRecord>> {
        if self.inner.read().fail_lookups {
            return Err(StoreError::Backend(anyhow::anyhow!("record lookups disabled")));
        }
        Ok(self.post(id))
    }

    async fn upsert_post(&self, draft: PostDraft) -> StoreResult<PostId> {
        let mut state = self.inner.write();
        if let Some(message) = &state.reject_upserts {
            return Err(StoreError::Rejected(message.clone()));
        }

        let tags = draft.tag_list();
        match draft.id {
            Some(id) => {
                let post = state
                    .posts
                    .get_mut(&id)
                    .ok_or_else(|| StoreError::Rejected("Invalid post ID.".to_string()))?;
                post.title = draft.title;
                post.body = draft.body;
                post.status = draft.status;
                post.category_id = draft.category_id;
                post.tags = tags;
                post.comment_status = draft.comment_status;
                if let Some(date) = draft.published_at {
                    post.published_at = date;
                }
                debug!(post_id = %id, "memory store updated post");
                Ok(id)
            }
            None => {
                state.last_post_id += 1;
                let id = PostId(state.last_post_id);
                let post = ContentRecord {
                    id,
                    title: draft.title,
                    body: draft.body,
                    status: draft.status,
                    author_id: draft.author_id,
                    category_id: draft.category_id,
                    tags,
                    comment_status: draft.comment_status,
                    published_at: draft.published_at.unwrap_or_else(Utc::now),
                    thumbnail_id: None,
                    meta: BTreeMap::new(),
                };
                state.posts.insert(id, post);
                debug!(post_id = %id, "memory store created post");
                Ok(id)
            }
        }
    }

    async fn delete_post(&self, id: PostId) -> StoreResult<bool> {
        let mut state = self.inner.write();
        let removed = state.posts.remove(&id).is_some();
        if removed {
            for media in state.media.values_mut() {
                if media.parent_id == Some(id) {
                    media.parent_id = None;
                }
            }
        }
        Ok(removed)
    }

    async fn set_meta(&self, id: PostId, key: &str, value: &str) -> StoreResult<()> {
        let mut state = self.inner.write();
        let post = state
            .posts
            .get_mut(&id)
            .ok_or_else(|| StoreError::Rejected("Invalid post ID.".to_string()))?;
        post.meta.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn set_thumbnail(&self, id: PostId, media: MediaId) -> StoreResult<()> {
        let mut state = self.inner.write();
        if !state.media.contains_key(&media) {
            return Err(StoreError::Rejected("Invalid media ID.".to_string()));
        }
        let post = state
            .posts
            .get_mut(&id)
            .ok_or_else(|| StoreError::Rejected("Invalid post ID.".to_string()))?;
        post.thumbnail_id = Some(media);
        Ok(())
    }

    async fn healthy(&self) -> bool {
        true
    }
}

#[async_trait]
impl MediaStore for MemoryStore {
    async fn find_media(&self, id: MediaId) -> StoreResult<Option<MediaRecord>> {
        Ok(self.media(id))
    }

    async fn find_by_attached_file(&self, path: &str) -> StoreResult<Option<MediaId>> {
        Ok(self
            .inner
            .read()
            .media
            .values()
            .find(|m| m.attached_file == path)
            .map(|m| m.id))
    }

    async fn adopt_media(&self, ids: &[MediaId], parent: PostId) -> StoreResult<u64> {
        let mut state = self.inner.write();
        if state.fail_adoption {
            return Err(StoreError::Backend(anyhow::anyhow!(
                "media adoption disabled"
            )));
        }

        let wanted: HashSet<&MediaId> = ids.iter().collect();
        let mut updated = 0;
        for media in state.media.values_mut() {
            if wanted.contains(&media.id) && media.is_adoptable() {
                media.parent_id = Some(parent);
                updated += 1;
            }
        }
        Ok(updated)
    }
}
