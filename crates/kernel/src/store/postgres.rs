//! PostgreSQL-backed store.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{debug, warn};

use crate::db;
use crate::models::media::INHERIT_STATUS;
use crate::models::{
    CategoryId, CommentStatus, ContentRecord, MediaId, MediaRecord, PostDraft, PostId, PostStatus,
    UserId,
};

use super::{ContentStore, MediaStore, StoreError, StoreResult};

/// Content and media store over a PostgreSQL pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

#[derive(sqlx::FromRow)]
struct PostRow {
    id: i64,
    title: String,
    body: String,
    status: String,
    author_id: Option<i64>,
    category_id: Option<i64>,
    tags: Vec<String>,
    comment_status: String,
    published_at: DateTime<Utc>,
    thumbnail_id: Option<i64>,
}

#[derive(sqlx::FromRow)]
struct MediaRow {
    id: i64,
    url: String,
    attached_file: String,
    mime_type: String,
    status: String,
    parent_id: i64,
    width: i32,
    height: i32,
    alt: String,
}

/// Convert an identifier to its column representation.
fn to_db(id: u64) -> StoreResult<i64> {
    i64::try_from(id).map_err(|_| StoreError::Rejected(format!("Invalid ID {id}.")))
}

/// Convert a column value to an identifier; non-positive values mean "none".
fn from_db(value: i64) -> Option<u64> {
    u64::try_from(value).ok().filter(|v| *v > 0)
}

impl PostRow {
    fn into_record(self, meta: BTreeMap<String, String>) -> StoreResult<ContentRecord> {
        let id = from_db(self.id)
            .map(PostId)
            .ok_or_else(|| StoreError::Backend(anyhow::anyhow!("invalid post id {}", self.id)))?;
        let status = PostStatus::parse(&self.status).unwrap_or_else(|| {
            warn!(post_id = %id, status = %self.status, "unknown post status, treating as pending");
            PostStatus::Pending
        });

        Ok(ContentRecord {
            id,
            title: self.title,
            body: self.body,
            status,
            author_id: self.author_id.and_then(from_db).map(UserId),
            category_id: self.category_id.and_then(from_db).map(CategoryId),
            tags: self.tags,
            comment_status: CommentStatus::parse(&self.comment_status).unwrap_or_default(),
            published_at: self.published_at,
            thumbnail_id: self.thumbnail_id.and_then(from_db).map(MediaId),
            meta,
        })
    }
}

impl MediaRow {
    fn into_record(self) -> Option<MediaRecord> {
        Some(MediaRecord {
            id: MediaId(from_db(self.id)?),
            url: self.url,
            attached_file: self.attached_file,
            mime_type: self.mime_type,
            status: self.status,
            parent_id: from_db(self.parent_id).map(PostId),
            width: u32::try_from(self.width).unwrap_or(0),
            height: u32::try_from(self.height).unwrap_or(0),
            alt: self.alt,
        })
    }
}

impl PgStore {
    /// Create a store over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect and apply migrations.
    pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = db::create_pool(database_url, max_connections).await?;
        db::run_migrations(&pool).await?;
        Ok(Self::new(pool))
    }
}

impl std::fmt::Debug for PgStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgStore").finish()
    }
}

#[async_trait]
impl ContentStore for PgStore {
    async fn find_post(&self, id: PostId) -> StoreResult<Option<ContentRecord>> {
        let row = sqlx::query_as::<_, PostRow>(
            "SELECT id, title, body, status, author_id, category_id, tags, comment_status, published_at, thumbnail_id FROM content_record WHERE id = $1",
        )
        .bind(to_db(id.0)?)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let meta: Vec<(String, String)> = sqlx::query_as(
            "SELECT meta_key, meta_value FROM content_meta WHERE record_id = $1",
        )
        .bind(row.id)
        .fetch_all(&self.pool)
        .await?;

        row.into_record(meta.into_iter().collect()).map(Some)
    }

    async fn upsert_post(&self, draft: PostDraft) -> StoreResult<PostId> {
        let tags = draft.tag_list();
        let category_id = draft.category_id.map(|c| to_db(c.0)).transpose()?;

        let id: Option<i64> = match draft.id {
            Some(id) => {
                sqlx::query_scalar::<_, i64>(
                    r#"
                    UPDATE content_record
                    SET title = $2, body = $3, status = $4, category_id = $5, tags = $6,
                        comment_status = $7, published_at = COALESCE($8, published_at),
                        changed = NOW()
                    WHERE id = $1
                    RETURNING id
                    "#,
                )
                .bind(to_db(id.0)?)
                .bind(&draft.title)
                .bind(&draft.body)
                .bind(draft.status.as_str())
                .bind(category_id)
                .bind(&tags)
                .bind(draft.comment_status.as_str())
                .bind(draft.published_at)
                .fetch_optional(&self.pool)
                .await?
            }
            None => {
                let author_id = draft.author_id.map(|a| to_db(a.0)).transpose()?;
                let id = sqlx::query_scalar::<_, i64>(
                    r#"
                    INSERT INTO content_record
                        (title, body, status, author_id, category_id, tags, comment_status, published_at)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, COALESCE($8, NOW()))
                    RETURNING id
                    "#,
                )
                .bind(&draft.title)
                .bind(&draft.body)
                .bind(draft.status.as_str())
                .bind(author_id)
                .bind(category_id)
                .bind(&tags)
                .bind(draft.comment_status.as_str())
                .bind(draft.published_at)
                .fetch_one(&self.pool)
                .await?;
                Some(id)
            }
        };

        let id = id
            .and_then(from_db)
            .map(PostId)
            .ok_or_else(|| StoreError::Rejected("Invalid post ID.".to_string()))?;
        debug!(post_id = %id, status = %draft.status, "content record saved");
        Ok(id)
    }

    async fn delete_post(&self, id: PostId) -> StoreResult<bool> {
        let db_id = to_db(id.0)?;
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE media SET parent_id = 0 WHERE parent_id = $1")
            .bind(db_id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM content_record WHERE id = $1")
            .bind(db_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_meta(&self, id: PostId, key: &str, value: &str) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO content_meta (record_id, meta_key, meta_value)
            VALUES ($1, $2, $3)
            ON CONFLICT (record_id, meta_key) DO UPDATE SET meta_value = $3
            "#,
        )
        .bind(to_db(id.0)?)
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn set_thumbnail(&self, id: PostId, media: MediaId) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE content_record SET thumbnail_id = $2 WHERE id = $1 AND EXISTS (SELECT 1 FROM media WHERE id = $2)",
        )
        .bind(to_db(id.0)?)
        .bind(to_db(media.0)?)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Rejected("Invalid media ID.".to_string()));
        }
        Ok(())
    }

    async fn healthy(&self) -> bool {
        db::check_health(&self.pool).await
    }
}

#[async_trait]
impl MediaStore for PgStore {
    async fn find_media(&self, id: MediaId) -> StoreResult<Option<MediaRecord>> {
        let row = sqlx::query_as::<_, MediaRow>(
            "SELECT id, url, attached_file, mime_type, status, parent_id, width, height, alt FROM media WHERE id = $1",
        )
        .bind(to_db(id.0)?)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.and_then(MediaRow::into_record))
    }

    async fn find_by_attached_file(&self, path: &str) -> StoreResult<Option<MediaId>> {
        let id: Option<i64> = sqlx::query_scalar::<_, i64>(
            "SELECT id FROM media WHERE attached_file = $1 ORDER BY id LIMIT 1",
        )
        .bind(path)
        .fetch_optional(&self.pool)
        .await?;

        Ok(id.and_then(from_db).map(MediaId))
    }

    async fn adopt_media(&self, ids: &[MediaId], parent: PostId) -> StoreResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let ids = ids
            .iter()
            .map(|id| to_db(id.0))
            .collect::<StoreResult<Vec<i64>>>()?;

        let result = sqlx::query(
            r#"
            UPDATE media SET parent_id = $1
            WHERE parent_id = 0 AND id = ANY($2) AND status = $3 AND mime_type LIKE 'image/%'
            "#,
        )
        .bind(to_db(parent.0)?)
        .bind(&ids)
        .bind(INHERIT_STATUS)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
