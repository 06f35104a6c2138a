//! Validated identifiers for tenants, leaderboards and items.
//!
//! Each identifier is used verbatim as a single directory or file name, so
//! construction rejects anything that could escape or alias a path segment.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a string cannot be used as an identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    /// The value was empty.
    #[error("{kind} must not be empty")]
    Empty {
        /// Identifier kind, for example `"tenant id"`.
        kind: &'static str,
    },
    /// The value starts with `.`, which covers `.`, `..` and hidden names.
    #[error("{kind} `{value}` must not start with '.'")]
    LeadingDot {
        /// Identifier kind.
        kind: &'static str,
        /// Rejected value.
        value: String,
    },
    /// The value contains a path separator or NUL.
    #[error("{kind} `{value}` contains reserved character {found:?}")]
    ReservedCharacter {
        /// Identifier kind.
        kind: &'static str,
        /// Rejected value.
        value: String,
        /// First reserved character found.
        found: char,
    },
}

fn validate_segment(kind: &'static str, value: &str) -> Result<(), IdentifierError> {
    if value.is_empty() {
        return Err(IdentifierError::Empty { kind });
    }
    if value.starts_with('.') {
        return Err(IdentifierError::LeadingDot {
            kind,
            value: value.to_owned(),
        });
    }
    if let Some(found) = value.chars().find(|c| matches!(c, '/' | '\\' | '\0')) {
        return Err(IdentifierError::ReservedCharacter {
            kind,
            value: value.to_owned(),
            found,
        });
    }
    Ok(())
}

macro_rules! path_segment_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Validate `value` and wrap it.
            pub fn new(value: impl Into<String>) -> Result<Self, IdentifierError> {
                let raw = value.into();
                validate_segment($kind, &raw)?;
                Ok(Self(raw))
            }

            /// Borrow the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = IdentifierError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdentifierError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

path_segment_id!(
    /// Identifier of an isolated tenant namespace, such as one chat server.
    TenantId,
    "tenant id"
);

path_segment_id!(
    /// Name of a leaderboard within a tenant.
    BoardName,
    "leaderboard name"
);

path_segment_id!(
    /// Stable external identifier of a trackable item.
    ItemId,
    "item id"
);
