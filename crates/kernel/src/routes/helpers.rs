//! Shared route helpers.

use tower_sessions::Session;
use tracing::warn;

use crate::models::{UserContext, UserId};

/// Session key for the acting user's ID.
pub const SESSION_USER_ID: &str = "user_id";

/// Session key for the acting user's capabilities.
pub const SESSION_USER_PERMISSIONS: &str = "user_permissions";

/// Build the acting user from the session written by the host's login flow.
///
/// A missing or unreadable user ID yields an anonymous user.
pub async fn current_user(session: &Session) -> UserContext {
    let id: Option<UserId> = match session.get(SESSION_USER_ID).await {
        Ok(id) => id,
        Err(e) => {
            warn!(error = %e, "failed to read user from session");
            None
        }
    };

    let Some(id) = id else {
        return UserContext::anonymous();
    };

    let permissions: Vec<String> = session
        .get(SESSION_USER_PERMISSIONS)
        .await
        .ok()
        .flatten()
        .unwrap_or_default();

    UserContext::authenticated(id, permissions)
}

/// Escape HTML special characters for safe interpolation into markup.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
