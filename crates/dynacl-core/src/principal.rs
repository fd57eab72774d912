//! # Principal Directory Records
//!
//! A `PrincipalRecord` is what the principal directory returns for a name:
//! its classification (individual or group) and the optional multi-valued
//! `dynamic` property that marks it for per-evaluation resolution.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DirectoryError;
use crate::identity::PrincipalName;

/// Whether a principal names a single subject or a group of subjects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrincipalKind {
    /// A single subject, typically a user.
    Individual,
    /// A group; its entries are evaluated after all individual entries.
    Group,
}

impl PrincipalKind {
    /// String identifier used in fixtures and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Individual => "individual",
            Self::Group => "group",
        }
    }
}

impl std::fmt::Display for PrincipalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrincipalKind {
    type Err = DirectoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "individual" | "user" => Ok(Self::Individual),
            "group" => Ok(Self::Group),
            other => Err(DirectoryError::Lookup(format!(
                "unknown principal kind: {other:?}"
            ))),
        }
    }
}

/// A principal as known to the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrincipalRecord {
    /// Directory key.
    pub name: PrincipalName,
    /// Individual or group.
    pub kind: PrincipalKind,
    /// Raw values of the `dynamic` property, if the property is set at all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dynamic: Option<Vec<String>>,
}

impl PrincipalRecord {
    /// A static individual principal.
    pub fn individual(name: impl Into<PrincipalName>) -> Self {
        Self {
            name: name.into(),
            kind: PrincipalKind::Individual,
            dynamic: None,
        }
    }

    /// A static group principal.
    pub fn group(name: impl Into<PrincipalName>) -> Self {
        Self {
            name: name.into(),
            kind: PrincipalKind::Group,
            dynamic: None,
        }
    }

    /// Set the raw values of the `dynamic` property.
    pub fn with_dynamic_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dynamic = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Mark the principal as dynamic (`dynamic = ["true"]`).
    pub fn dynamic(self) -> Self {
        self.with_dynamic_values(["true"])
    }

    /// Whether the `dynamic` property is present at all.
    pub fn has_dynamic_property(&self) -> bool {
        self.dynamic.is_some()
    }

    /// Truthy iff the property has at least one value and the first is
    /// exactly `"true"`. Any other shape counts as static.
    pub fn is_dynamic(&self) -> bool {
        self.dynamic
            .as_ref()
            .and_then(|values| values.first())
            .is_some_and(|first| first == "true")
    }

    /// Whether this principal is a group.
    pub fn is_group(&self) -> bool {
        self.kind == PrincipalKind::Group
    }
}
