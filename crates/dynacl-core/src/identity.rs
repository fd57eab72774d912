//! # Identity Newtypes
//!
//! Newtype wrappers for the three kinds of identifier that flow through an
//! evaluation. They prevent accidental identifier confusion: you cannot pass
//! a `UserId` where a `PrincipalName` is expected.
//!
//! ## Security Invariant
//!
//! The acting user and the principals bound to that user are different
//! namespaces. Mixing them up would let a user id that happens to collide
//! with a group name pick up that group's entries.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw identifier.
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Borrow the raw identifier.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// Opaque identity of a node in the resource tree.
    ResourceId
);

string_id!(
    /// Key identifying an individual subject or a group in the principal
    /// directory.
    PrincipalName
);

string_id!(
    /// Identity of the user performing the access being evaluated.
    UserId
);

// Lets `HashSet<PrincipalName>` and the static cache be queried with `&str`.
impl Borrow<str> for PrincipalName {
    fn borrow(&self) -> &str {
        &self.0
    }
}
