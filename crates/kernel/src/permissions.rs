//! Record-level permission checks.
//!
//! Record capabilities resolve to primitive capabilities held by the user:
//!
//! | Action | Own record | Someone else's record |
//! |---|---|---|
//! | edit | `edit_posts` | `edit_others_posts` |
//! | delete | `delete_posts` | `delete_others_posts` |
//!
//! Published records additionally require `edit_published_posts` or
//! `delete_published_posts`.

use crate::models::{ContentRecord, PostStatus, UserContext};

pub const EDIT_POSTS: &str = "edit_posts";
pub const EDIT_OTHERS_POSTS: &str = "edit_others_posts";
pub const EDIT_PUBLISHED_POSTS: &str = "edit_published_posts";
pub const DELETE_POSTS: &str = "delete_posts";
pub const DELETE_OTHERS_POSTS: &str = "delete_others_posts";
pub const DELETE_PUBLISHED_POSTS: &str = "delete_published_posts";

/// Primitive capabilities for one record action.
struct ActionCapabilities {
    own: &'static str,
    others: &'static str,
    published: &'static str,
}

const EDIT: ActionCapabilities = ActionCapabilities {
    own: EDIT_POSTS,
    others: EDIT_OTHERS_POSTS,
    published: EDIT_PUBLISHED_POSTS,
};

const DELETE: ActionCapabilities = ActionCapabilities {
    own: DELETE_POSTS,
    others: DELETE_OTHERS_POSTS,
    published: DELETE_PUBLISHED_POSTS,
};

fn allowed(user: &UserContext, record: &ContentRecord, caps: &ActionCapabilities) -> bool {
    if !user.is_authenticated() {
        return false;
    }

    let owns = record.author_id.is_some() && record.author_id == user.id;
    let base = if owns { caps.own } else { caps.others };
    if !user.can(base) {
        return false;
    }

    record.status != PostStatus::Publish || user.can(caps.published)
}

/// Whether `user` may edit `record`.
pub fn can_edit_post(user: &UserContext, record: &ContentRecord) -> bool {
    allowed(user, record, &EDIT)
}

/// Whether `user` may delete `record`.
pub fn can_delete_post(user: &UserContext, record: &ContentRecord) -> bool {
    allowed(user, record, &DELETE)
}
