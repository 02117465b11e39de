//! Acting user context.

use serde::{Deserialize, Serialize};

use super::UserId;

/// Capability that grants every other capability.
pub const ADMINISTER_SITE: &str = "administer_site";

/// The user on whose behalf a request runs.
///
/// Populated from the session written by the host's login flow. Scrivener
/// never authenticates users itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserContext {
    /// Host user ID (None for anonymous).
    pub id: Option<UserId>,
    /// Capabilities held by the user.
    pub permissions: Vec<String>,
}

impl UserContext {
    /// Create context for an anonymous user.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Create context for an authenticated user.
    pub fn authenticated(id: UserId, permissions: Vec<String>) -> Self {
        Self {
            id: Some(id),
            permissions,
        }
    }

    /// Whether the user is logged in.
    pub fn is_authenticated(&self) -> bool {
        self.id.is_some()
    }

    /// Check if the user holds a capability.
    pub fn can(&self, capability: &str) -> bool {
        self.permissions
            .iter()
            .any(|p| p == capability || p == ADMINISTER_SITE)
    }

    /// Check an optional configured capability; an unset capability is never held.
    pub fn can_configured(&self, capability: Option<&str>) -> bool {
        capability
            .filter(|c| !c.is_empty())
            .is_some_and(|c| self.can(c))
    }
}
