//! Scrivener test utilities.
//!
//! Helpers for integration testing: submission and deletion form builders,
//! test users, and assertion utilities for publishing responses.

/// Wire value meaning "no selection".
pub const NO_SELECTION: &str = "-1";

/// `n` space-separated words.
pub fn words(n: usize) -> String {
    vec!["word"; n].join(" ")
}

/// Encode `(name, value)` pairs as an `application/x-www-form-urlencoded` body.
pub fn form_body(fields: &[(&str, &str)]) -> String {
    fields
        .iter()
        .map(|(name, value)| {
            format!(
                "{}={}",
                urlencoding::encode(name),
                urlencoding::encode(value)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Create a test submission for a new article.
pub fn test_submission(title: &str, body: &str) -> TestSubmission {
    TestSubmission {
        title: title.to_string(),
        body: body.to_string(),
        tags: "rust, publishing".to_string(),
        bio: "Writes about software.".to_string(),
        featured_image: NO_SELECTION.to_string(),
        category: NO_SELECTION.to_string(),
        post_id: NO_SELECTION.to_string(),
        nonce: String::new(),
    }
}

/// A submission form builder.
#[derive(Debug, Clone)]
pub struct TestSubmission {
    pub title: String,
    pub body: String,
    pub tags: String,
    pub bio: String,
    pub featured_image: String,
    pub category: String,
    pub post_id: String,
    pub nonce: String,
}

impl TestSubmission {
    /// Edit an existing article.
    pub fn editing(mut self, post_id: u64) -> Self {
        self.post_id = post_id.to_string();
        self
    }

    /// Set the tag list.
    pub fn with_tags(mut self, tags: &str) -> Self {
        self.tags = tags.to_string();
        self
    }

    /// Set the author bio.
    pub fn with_bio(mut self, bio: &str) -> Self {
        self.bio = bio.to_string();
        self
    }

    /// Select a featured image.
    pub fn with_featured_image(mut self, media_id: u64) -> Self {
        self.featured_image = media_id.to_string();
        self
    }

    /// Select a category.
    pub fn with_category(mut self, category_id: u64) -> Self {
        self.category = category_id.to_string();
        self
    }

    /// Set the authenticity token.
    pub fn with_nonce(mut self, nonce: &str) -> Self {
        self.nonce = nonce.to_string();
        self
    }

    /// Encode as a form body.
    pub fn form_body(&self) -> String {
        form_body(&[
            ("post_title", &self.title),
            ("post_content", &self.body),
            ("post_tags", &self.tags),
            ("about_the_author", &self.bio),
            ("featured_img", &self.featured_image),
            ("post_category", &self.category),
            ("post_id", &self.post_id),
            ("post_nonce", &self.nonce),
        ])
    }
}

/// Encode a deletion request body.
pub fn delete_form_body(post_id: &str, nonce: &str) -> String {
    form_body(&[("post_id", post_id), ("delete_nonce", nonce)])
}

/// Create a test user.
pub fn test_user(id: u64, permissions: &[&str]) -> TestUser {
    TestUser {
        id,
        authenticated: true,
        permissions: permissions.iter().map(|s| s.to_string()).collect(),
    }
}

/// Create an anonymous test user.
pub fn anonymous_user() -> TestUser {
    TestUser {
        id: 0,
        authenticated: false,
        permissions: vec![],
    }
}

/// Create an admin test user.
pub fn admin_user() -> TestUser {
    TestUser {
        id: 1,
        authenticated: true,
        permissions: vec!["administer_site".to_string()],
    }
}

/// A test user builder.
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: u64,
    pub authenticated: bool,
    pub permissions: Vec<String>,
}

impl TestUser {
    /// Add a permission.
    pub fn with_permission(mut self, perm: &str) -> Self {
        self.permissions.push(perm.to_string());
        self
    }

    /// Check if user has permission.
    pub fn has_permission(&self, perm: &str) -> bool {
        self.permissions.iter().any(|p| p == perm)
    }
}

/// Assertion helpers for publishing responses.
pub mod assert {
    use serde_json::Value;

    /// Assert that a response reports success.
    pub fn succeeded(response: &Value) {
        assert_eq!(
            response["success"],
            Value::Bool(true),
            "Expected success, got: {response}"
        );
    }

    /// Assert that a response reports failure with a message containing `reason`.
    pub fn failed_with(response: &Value, reason: &str) {
        assert_eq!(
            response["success"],
            Value::Bool(false),
            "Expected failure, got: {response}"
        );
        let message = response["message"].as_str().unwrap_or_default();
        assert!(
            message.contains(reason),
            "Expected message to contain '{reason}'\nActual: {message}"
        );
    }

    /// Assert that a string contains a substring.
    pub fn contains(haystack: &str, needle: &str) {
        assert!(
            haystack.contains(needle),
            "Expected string to contain '{needle}'\nActual: {haystack}"
        );
    }
}
