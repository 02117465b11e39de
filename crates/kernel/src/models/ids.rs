//! Identifier newtypes.
//!
//! Host identifiers are positive integers. On the wire, `"-1"` (or an empty
//! field) is the conventional "no selection" marker.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Wire value meaning "no selection".
pub const NO_SELECTION: &str = "-1";

/// A submitted identifier that is neither a positive integer nor the sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {field}: {value:?}")]
pub struct InvalidId {
    pub field: &'static str,
    pub value: String,
}

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Parse a wire value, mapping the sentinel (or blank) to `None`.
            pub fn parse_selection(
                field: &'static str,
                raw: &str,
            ) -> Result<Option<Self>, InvalidId> {
                let raw = raw.trim();
                if raw.is_empty() || raw == NO_SELECTION {
                    return Ok(None);
                }
                match raw.parse::<u64>() {
                    Ok(0) | Err(_) => Err(InvalidId {
                        field,
                        value: raw.to_string(),
                    }),
                    Ok(id) => Ok(Some(Self(id))),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(
    /// Content record identifier.
    PostId
);
id_type!(
    /// Media record identifier.
    MediaId
);
id_type!(
    /// Category identifier.
    CategoryId
);
id_type!(
    /// Host user identifier.
    UserId
);
