//! Submission and deletion orchestration.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::content::{FilterPipeline, Validator, site_image_sources};
use crate::media::{AttachmentResolver, featured_image_html};
use crate::models::{
    ContentRecord, DeleteForm, InvalidId, MediaId, PostDraft, PostId, PostStatus, Submission,
    SubmissionForm, UserContext,
};
use crate::permissions::{can_delete_post, can_edit_post};
use crate::settings::PublishingSettings;
use crate::store::{ContentStore, MediaStore, StoreResult};

use super::{PublishAction, PublishError, SubmitOutcome};

/// Metadata key holding the sanitized author bio.
pub const ABOUT_THE_AUTHOR: &str = "about_the_author";

/// Publishing service: validates, saves, and deletes articles.
///
/// Cheap to clone; clones share settings and stores.
#[derive(Clone)]
pub struct PublishingService {
    inner: Arc<PublishingServiceInner>,
}

struct PublishingServiceInner {
    settings: PublishingSettings,
    content: Arc<dyn ContentStore>,
    media: Arc<dyn MediaStore>,
    resolver: AttachmentResolver,
    site_url: String,
    plain_text: FilterPipeline,
    body_html: FilterPipeline,
    bio_html: FilterPipeline,
}

impl PublishingService {
    pub fn new(
        settings: PublishingSettings,
        content: Arc<dyn ContentStore>,
        media: Arc<dyn MediaStore>,
        site_url: impl Into<String>,
        uploads_url: impl Into<String>,
    ) -> Self {
        let body_html = FilterPipeline::rich_text(settings.misc.nofollow_body_links);
        let bio_html = FilterPipeline::rich_text(settings.misc.nofollow_bio_links);

        Self {
            inner: Arc::new(PublishingServiceInner {
                settings,
                content,
                media,
                resolver: AttachmentResolver::new(uploads_url),
                site_url: site_url.into(),
                plain_text: FilterPipeline::plain_text(),
                body_html,
                bio_html,
            }),
        }
    }

    pub fn settings(&self) -> &PublishingSettings {
        &self.inner.settings
    }

    /// Whether the content store is reachable.
    pub async fn store_healthy(&self) -> bool {
        self.inner.content.healthy().await
    }

    /// Validate and save a submission on behalf of `user`.
    ///
    /// The caller has already verified the form's authenticity token. Every
    /// reference is checked before the first write; writes made before a
    /// later failing step are not rolled back.
    pub async fn submit(
        &self,
        user: &UserContext,
        form: SubmissionForm,
    ) -> Result<SubmitOutcome, PublishError> {
        let existing = match PostId::parse_selection("post_id", &form.post_id)? {
            Some(id) => Some(self.editable_record(user, id).await?),
            None => None,
        };
        let submission = Submission::from_form(form)?;
        if let Some(media) = submission.featured_image {
            self.require_media("featured_img", media).await?;
        }

        let settings = &self.inner.settings;
        if user.can_configured(settings.roles.no_check.as_deref()) {
            debug!(user_id = ?user.id, "validation skipped");
        } else {
            Validator::new(&settings.restrictions, &settings.messages)
                .validate(&submission)
                .map_err(|errors| {
                    debug!(user_id = ?user.id, "submission failed validation");
                    PublishError::Validation(errors)
                })?;
        }

        let publish = user.can_configured(settings.roles.instantly_publish.as_deref());
        let (status, mut action) = if publish {
            (PostStatus::Publish, PublishAction::Published)
        } else {
            (PostStatus::Pending, PublishAction::Submitted)
        };
        if submission.is_update() {
            action = PublishAction::Updated;
        }

        let body = self.inner.body_html.process(&submission.body);
        let draft = PostDraft {
            id: submission.post_id,
            title: self.inner.plain_text.process(&submission.title),
            body: body.clone(),
            tags: self.inner.plain_text.process(&submission.tags),
            category_id: submission.category,
            status,
            comment_status: settings.misc.default_comment_status,
            published_at: existing.as_ref().map(|record| record.published_at),
            author_id: user.id,
        };

        let post_id = self
            .inner
            .content
            .upsert_post(draft)
            .await
            .map_err(PublishError::store)?;

        if settings.misc.assign_images {
            self.adopt_embedded_images(&body, post_id).await?;
        }

        if !settings.misc.disable_author_bio {
            let bio = self.inner.bio_html.process(&submission.bio);
            self.inner
                .content
                .set_meta(post_id, ABOUT_THE_AUTHOR, &bio)
                .await
                .map_err(PublishError::store)?;
        }

        if let Some(media) = submission.featured_image
            && let Err(e) = self.inner.content.set_thumbnail(post_id, media).await
        {
            warn!(
                post_id = %post_id,
                media_id = %media,
                error = ?e,
                "featured image not set"
            );
        }

        info!(
            post_id = %post_id,
            user_id = ?user.id,
            status = %status,
            action = %action,
            "article saved"
        );
        Ok(SubmitOutcome { post_id, action })
    }

    /// Permanently delete a record on behalf of `user`.
    ///
    /// The caller has already verified the form's authenticity token.
    pub async fn delete(
        &self,
        user: &UserContext,
        form: DeleteForm,
    ) -> Result<PostId, PublishError> {
        let Ok(Some(post_id)) = PostId::parse_selection("post_id", &form.post_id) else {
            debug!(post_id = %form.post_id, "delete refused: no such record");
            return Err(PublishError::DeletePermission);
        };

        let record = self.inner.content.find_post(post_id).await.map_err(|e| {
            warn!(post_id = %post_id, error = ?e, "article lookup before deletion failed");
            PublishError::DeleteFailed
        })?;
        let allowed = record
            .as_ref()
            .is_some_and(|record| can_delete_post(user, record));
        if !allowed {
            debug!(post_id = %post_id, user_id = ?user.id, "delete refused: permission");
            return Err(PublishError::DeletePermission);
        }

        match self.inner.content.delete_post(post_id).await {
            Ok(true) => {
                info!(post_id = %post_id, user_id = ?user.id, "article deleted");
                Ok(post_id)
            }
            Ok(false) => {
                warn!(post_id = %post_id, "article vanished before deletion");
                Err(PublishError::DeleteFailed)
            }
            Err(e) => {
                warn!(post_id = %post_id, error = ?e, "article deletion failed");
                Err(PublishError::DeleteFailed)
            }
        }
    }

    /// Preview markup for a featured image selection.
    ///
    /// Unknown media, non-images, and unparseable IDs render as empty.
    pub async fn featured_image(&self, raw_id: &str) -> StoreResult<String> {
        let Ok(Some(id)) = MediaId::parse_selection("img", raw_id) else {
            return Ok(String::new());
        };
        let media = self.inner.media.find_media(id).await?;
        Ok(media.map(|m| featured_image_html(&m)).unwrap_or_default())
    }

    /// Load a record `user` may edit. Missing records fail the permission check.
    async fn editable_record(
        &self,
        user: &UserContext,
        id: PostId,
    ) -> Result<ContentRecord, PublishError> {
        let record = self
            .inner
            .content
            .find_post(id)
            .await
            .map_err(PublishError::store)?;

        match record {
            Some(record) if can_edit_post(user, &record) => Ok(record),
            _ => {
                debug!(post_id = %id, user_id = ?user.id, "edit refused: permission");
                Err(PublishError::EditPermission)
            }
        }
    }

    /// Refuse a media selection that names no existing media record.
    async fn require_media(&self, field: &'static str, id: MediaId) -> Result<(), PublishError> {
        let media = self
            .inner
            .media
            .find_media(id)
            .await
            .map_err(PublishError::store)?;
        if media.is_none() {
            debug!(media_id = %id, "unknown media selected");
            return Err(InvalidId {
                field,
                value: id.to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Make `post_id` the parent of every unparented site image in `body`.
    async fn adopt_embedded_images(&self, body: &str, post_id: PostId) -> Result<(), PublishError> {
        let mut images: Vec<MediaId> = Vec::new();
        for src in site_image_sources(body, &self.inner.site_url) {
            match self.inner.resolver.resolve(self.inner.media.as_ref(), &src).await {
                Ok(Some(id)) if !images.contains(&id) => images.push(id),
                Ok(_) => {}
                Err(e) => warn!(src = %src, error = ?e, "image lookup failed"),
            }
        }

        if images.is_empty() {
            return Ok(());
        }

        match self.inner.media.adopt_media(&images, post_id).await {
            Ok(adopted) => {
                debug!(
                    post_id = %post_id,
                    found = images.len(),
                    adopted,
                    "embedded images adopted"
                );
                Ok(())
            }
            Err(e) => {
                warn!(post_id = %post_id, error = ?e, "image association failed");
                Err(PublishError::ImageAssociation)
            }
        }
    }
}

impl std::fmt::Debug for PublishingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublishingService")
            .field("site_url", &self.inner.site_url)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::models::media::INHERIT_STATUS;
    use crate::models::{CategoryId, CommentStatus, MediaRecord, UserId};
    use crate::permissions::{DELETE_POSTS, EDIT_OTHERS_POSTS, EDIT_POSTS};
    use crate::settings::{PostRestrictions, RoleSettings};
    use crate::store::MemoryStore;

    const SITE: &str = "http://example.test";
    const UPLOADS: &str = "http://example.test/uploads";

    fn permissive() -> PublishingSettings {
        PublishingSettings {
            restrictions: PostRestrictions::permissive(),
            roles: RoleSettings {
                no_check: None,
                instantly_publish: Some("publish_posts".to_string()),
            },
            ..PublishingSettings::default()
        }
    }

    fn service(settings: PublishingSettings) -> (PublishingService, MemoryStore) {
        let store = MemoryStore::new();
        let service = PublishingService::new(
            settings,
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            SITE,
            UPLOADS,
        );
        (service, store)
    }

    fn author(caps: &[&str]) -> UserContext {
        UserContext::authenticated(UserId(7), caps.iter().map(|c| c.to_string()).collect())
    }

    fn form(title: &str, body: &str) -> SubmissionForm {
        SubmissionForm {
            post_title: title.to_string(),
            post_content: body.to_string(),
            post_tags: "rust, cms".to_string(),
            about_the_author: "Writes about things.".to_string(),
            featured_img: "-1".to_string(),
            post_category: "-1".to_string(),
            post_id: "-1".to_string(),
            post_nonce: String::new(),
        }
    }

    fn image(id: u64, file: &str) -> MediaRecord {
        MediaRecord {
            id: MediaId(id),
            url: format!("{UPLOADS}/{file}"),
            attached_file: file.to_string(),
            mime_type: "image/jpeg".to_string(),
            status: INHERIT_STATUS.to_string(),
            parent_id: None,
            width: 1200,
            height: 800,
            alt: "Alt".to_string(),
        }
    }

    fn existing(id: u64, author_id: u64, status: PostStatus) -> ContentRecord {
        ContentRecord {
            id: PostId(id),
            title: "Old".to_string(),
            body: "<p>Old</p>".to_string(),
            status,
            author_id: Some(UserId(author_id)),
            category_id: None,
            tags: Vec::new(),
            comment_status: CommentStatus::Open,
            published_at: chrono::DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            thumbnail_id: None,
            meta: BTreeMap::new(),
        }
    }

    #[tokio::test]
    async fn new_submission_is_pending_without_publish_capability() {
        let (service, store) = service(permissive());
        let outcome = service
            .submit(&author(&[EDIT_POSTS]), form("Hello world", "<p>Body</p>"))
            .await
            .unwrap();

        assert_eq!(outcome.action, PublishAction::Submitted);
        let post = store.post(outcome.post_id).unwrap();
        assert_eq!(post.status, PostStatus::Pending);
        assert_eq!(post.author_id, Some(UserId(7)));
        assert_eq!(post.tags, vec!["rust", "cms"]);
    }

    #[tokio::test]
    async fn publish_capability_publishes_immediately() {
        let (service, store) = service(permissive());
        let outcome = service
            .submit(&author(&["publish_posts"]), form("Hello world", "<p>Body</p>"))
            .await
            .unwrap();

        assert_eq!(outcome.action, PublishAction::Published);
        assert_eq!(store.post(outcome.post_id).unwrap().status, PostStatus::Publish);
    }

    #[tokio::test]
    async fn unset_publish_capability_is_never_held() {
        let mut settings = permissive();
        settings.roles.instantly_publish = None;
        let (service, store) = service(settings);
        let outcome = service
            .submit(&author(&["publish_posts"]), form("Hello world", "<p>Body</p>"))
            .await
            .unwrap();
        assert_eq!(store.post(outcome.post_id).unwrap().status, PostStatus::Pending);
    }

    #[tokio::test]
    async fn validation_failure_persists_nothing() {
        let (service, store) = service(PublishingSettings::default());
        let err = service
            .submit(&author(&[EDIT_POSTS]), form("Hi", "<p>Too short</p>"))
            .await
            .unwrap_err();

        assert!(matches!(err, PublishError::Validation(_)));
        assert!(err.to_string().contains("<br/>"));
        assert_eq!(store.post_count(), 0);
    }

    #[tokio::test]
    async fn no_check_capability_skips_validation() {
        let mut settings = PublishingSettings::default();
        settings.roles.no_check = Some("moderate".to_string());
        let (service, store) = service(settings);
        service
            .submit(&author(&["moderate"]), form("Hi", "<p>Too short</p>"))
            .await
            .unwrap();
        assert_eq!(store.post_count(), 1);
    }

    #[tokio::test]
    async fn fields_are_sanitized() {
        let (service, store) = service(permissive());
        let outcome = service
            .submit(
                &author(&[EDIT_POSTS]),
                form(
                    "<b>Bold</b> title",
                    r#"<p onclick="x()">Body</p><script>alert(1)</script>"#,
                ),
            )
            .await
            .unwrap();

        let post = store.post(outcome.post_id).unwrap();
        assert_eq!(post.title, "Bold title");
        assert!(!post.body.contains("script"));
        assert!(!post.body.contains("onclick"));
    }

    #[tokio::test]
    async fn nofollow_applies_to_configured_fields() {
        let mut settings = permissive();
        settings.misc.nofollow_body_links = true;
        let (service, store) = service(settings);
        let mut submission = form("Links", r#"<a href="https://a.test">a</a>"#);
        submission.about_the_author = r#"<a href="https://b.test">b</a>"#.to_string();

        let outcome = service.submit(&author(&[EDIT_POSTS]), submission).await.unwrap();
        let post = store.post(outcome.post_id).unwrap();
        assert!(post.body.contains(r#"rel="nofollow""#));
        assert!(!post.meta[ABOUT_THE_AUTHOR].contains("nofollow"));
    }

    #[tokio::test]
    async fn bio_is_stored_unless_disabled() {
        let (service, store) = service(permissive());
        let outcome = service
            .submit(&author(&[EDIT_POSTS]), form("Title", "<p>Body</p>"))
            .await
            .unwrap();
        assert_eq!(
            store.post(outcome.post_id).unwrap().meta[ABOUT_THE_AUTHOR],
            "Writes about things."
        );

        let mut settings = permissive();
        settings.misc.disable_author_bio = true;
        let (quiet, store) = self::service(settings);
        let outcome = quiet
            .submit(&author(&[EDIT_POSTS]), form("Title", "<p>Body</p>"))
            .await
            .unwrap();
        assert!(store.post(outcome.post_id).unwrap().meta.is_empty());
    }

    #[tokio::test]
    async fn embedded_site_images_are_adopted() {
        let (service, store) = service(permissive());
        store.insert_media(image(1, "2026/10/cat.jpg"));
        store.insert_media(image(2, "2026/10/dog.png"));
        let body = format!(
            r#"<p><img src="{UPLOADS}/2026/10/cat-300x200.jpg"><img src="https://cdn.test/uploads/2026/10/dog.png"></p>"#
        );

        let outcome = service
            .submit(&author(&[EDIT_POSTS]), form("Pets", &body))
            .await
            .unwrap();

        assert_eq!(store.media(MediaId(1)).unwrap().parent_id, Some(outcome.post_id));
        assert_eq!(store.media(MediaId(2)).unwrap().parent_id, None);
    }

    #[tokio::test]
    async fn image_adoption_can_be_disabled() {
        let mut settings = permissive();
        settings.misc.assign_images = false;
        let (service, store) = service(settings);
        store.insert_media(image(1, "cat.jpg"));

        service
            .submit(
                &author(&[EDIT_POSTS]),
                form("Cat", &format!(r#"<img src="{UPLOADS}/cat.jpg">"#)),
            )
            .await
            .unwrap();
        assert_eq!(store.media(MediaId(1)).unwrap().parent_id, None);
    }

    #[tokio::test]
    async fn failed_adoption_reports_association_error_after_saving() {
        let (service, store) = service(permissive());
        store.insert_media(image(1, "cat.jpg"));
        store.fail_adoption(true);

        let err = service
            .submit(
                &author(&[EDIT_POSTS]),
                form("Cat", &format!(r#"<img src="{UPLOADS}/cat.jpg">"#)),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, PublishError::ImageAssociation));
        // The record write is not rolled back.
        assert_eq!(store.post_count(), 1);
    }

    #[tokio::test]
    async fn featured_image_becomes_thumbnail() {
        let (service, store) = service(permissive());
        store.insert_media(image(5, "hero.jpg"));
        let mut submission = form("Hero", "<p>Body</p>");
        submission.featured_img = "5".to_string();
        submission.post_category = "3".to_string();

        let outcome = service.submit(&author(&[EDIT_POSTS]), submission).await.unwrap();
        let post = store.post(outcome.post_id).unwrap();
        assert_eq!(post.thumbnail_id, Some(MediaId(5)));
        assert_eq!(post.category_id, Some(CategoryId(3)));
    }

    #[tokio::test]
    async fn unknown_featured_image_is_refused_before_saving() {
        let (service, store) = service(permissive());
        let mut submission = form("Hero", "<p>Body</p>");
        submission.featured_img = "999".to_string();

        for _ in 0..2 {
            let err = service
                .submit(&author(&[EDIT_POSTS]), submission.clone())
                .await
                .unwrap_err();
            match err {
                PublishError::InvalidSelection(invalid) => {
                    assert_eq!(invalid.field, "featured_img");
                    assert_eq!(invalid.value, "999");
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }
        assert_eq!(store.post_count(), 0);
    }

    #[tokio::test]
    async fn store_refusal_carries_its_message() {
        let (service, store) = service(permissive());
        store.reject_upserts(Some("Content, title, and excerpt are empty."));

        let err = service
            .submit(&author(&[EDIT_POSTS]), form("Title", "<p>Body</p>"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Content, title, and excerpt are empty.");
    }

    #[tokio::test]
    async fn update_keeps_publish_date() {
        let (service, store) = service(permissive());
        let original = existing(10, 7, PostStatus::Pending);
        let published_at = original.published_at;
        store.insert_post(original);

        let mut submission = form("New title", "<p>New body</p>");
        submission.post_id = "10".to_string();
        let outcome = service.submit(&author(&[EDIT_POSTS]), submission).await.unwrap();

        assert_eq!(outcome.post_id, PostId(10));
        assert_eq!(outcome.action, PublishAction::Updated);
        let post = store.post(PostId(10)).unwrap();
        assert_eq!(post.title, "New title");
        assert_eq!(post.published_at, published_at);
    }

    #[tokio::test]
    async fn editing_someone_elses_record_requires_permission() {
        let (service, store) = service(permissive());
        store.insert_post(existing(10, 99, PostStatus::Pending));

        let mut submission = form("Hijack", "<p>Body</p>");
        submission.post_id = "10".to_string();
        let err = service
            .submit(&author(&[EDIT_POSTS]), submission.clone())
            .await
            .unwrap_err();
        assert!(matches!(err, PublishError::EditPermission));
        assert_eq!(store.post(PostId(10)).unwrap().title, "Old");

        service
            .submit(&author(&[EDIT_POSTS, EDIT_OTHERS_POSTS]), submission)
            .await
            .unwrap();
        assert_eq!(store.post(PostId(10)).unwrap().title, "Hijack");
    }

    #[tokio::test]
    async fn permission_is_checked_before_other_references() {
        let (service, store) = service(permissive());
        store.insert_post(existing(10, 99, PostStatus::Pending));

        let mut submission = form("Hijack", "<p>Body</p>");
        submission.post_id = "10".to_string();
        submission.post_category = "news".to_string();
        submission.featured_img = "999".to_string();
        let err = service
            .submit(&author(&[EDIT_POSTS]), submission)
            .await
            .unwrap_err();
        assert!(matches!(err, PublishError::EditPermission));
    }

    #[tokio::test]
    async fn editing_a_missing_record_is_refused() {
        let (service, _store) = service(permissive());
        let mut submission = form("Ghost", "<p>Body</p>");
        submission.post_id = "404".to_string();
        let err = service
            .submit(&author(&[EDIT_POSTS]), submission)
            .await
            .unwrap_err();
        assert!(matches!(err, PublishError::EditPermission));
    }

    #[tokio::test]
    async fn malformed_ids_are_rejected() {
        let (service, store) = service(permissive());
        let mut submission = form("Title", "<p>Body</p>");
        submission.post_category = "news".to_string();
        let err = service
            .submit(&author(&[EDIT_POSTS]), submission)
            .await
            .unwrap_err();
        assert!(matches!(err, PublishError::InvalidSelection(_)));
        assert_eq!(store.post_count(), 0);
    }

    #[tokio::test]
    async fn delete_requires_permission() {
        let (service, store) = service(permissive());
        store.insert_post(existing(10, 7, PostStatus::Pending));
        let delete_form = DeleteForm {
            post_id: "10".to_string(),
            delete_nonce: String::new(),
        };

        let err = service
            .delete(&author(&[EDIT_POSTS]), delete_form.clone())
            .await
            .unwrap_err();
        assert!(matches!(err, PublishError::DeletePermission));
        assert!(store.post(PostId(10)).is_some());

        let deleted = service
            .delete(&author(&[DELETE_POSTS]), delete_form)
            .await
            .unwrap();
        assert_eq!(deleted, PostId(10));
        assert!(store.post(PostId(10)).is_none());
    }

    #[tokio::test]
    async fn delete_of_unknown_record_is_refused() {
        let (service, _store) = service(permissive());
        for raw in ["404", "-1", "abc"] {
            let err = service
                .delete(
                    &author(&[DELETE_POSTS]),
                    DeleteForm {
                        post_id: raw.to_string(),
                        delete_nonce: String::new(),
                    },
                )
                .await
                .unwrap_err();
            assert!(matches!(err, PublishError::DeletePermission), "{raw}");
        }
    }

    #[tokio::test]
    async fn failed_lookup_before_delete_reports_delete_failure() {
        let (service, store) = service(permissive());
        store.insert_post(existing(10, 7, PostStatus::Pending));
        store.fail_lookups(true);

        let err = service
            .delete(
                &author(&[DELETE_POSTS]),
                DeleteForm {
                    post_id: "10".to_string(),
                    delete_nonce: String::new(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, PublishError::DeleteFailed));
        assert_eq!(err.to_string(), "The article could not be deleted");
        assert!(store.post(PostId(10)).is_some());
    }

    #[tokio::test]
    async fn featured_image_preview() {
        let (service, store) = service(permissive());
        store.insert_media(image(5, "hero.jpg"));

        let html = service.featured_image("5").await.unwrap();
        assert!(html.contains(r#"width="200" height="133""#));
        assert!(service.featured_image("6").await.unwrap().is_empty());
        assert!(service.featured_image("nope").await.unwrap().is_empty());
    }
}
