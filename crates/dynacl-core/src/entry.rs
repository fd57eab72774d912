//! # Access-Control Entries
//!
//! Two shapes of the same rule:
//!
//! - [`StoredEntry`]: as read from storage: a principal *name*, privilege
//!   *names*, and the allow/deny flag. Grouped per resource into an
//!   [`AccessControlList`].
//! - [`AccessControlEntry`]: as handed to the permission compiler: the
//!   principal classified by the directory and every privilege resolved.
//!
//! Both are immutable once built.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::identity::{PrincipalName, ResourceId};
use crate::principal::PrincipalKind;

// ---------------------------------------------------------------------------
// Stored form
// ---------------------------------------------------------------------------

/// One rule exactly as the storage engine holds it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredEntry {
    /// Principal the rule applies to.
    pub principal: PrincipalName,
    /// Privilege names, in stored order.
    pub privileges: Vec<String>,
    /// `true` for a grant, `false` for a deny.
    #[serde(default = "default_allow")]
    pub allow: bool,
}

fn default_allow() -> bool {
    true
}

impl StoredEntry {
    /// A granting entry.
    pub fn allow<I, S>(principal: impl Into<PrincipalName>, privileges: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            principal: principal.into(),
            privileges: privileges.into_iter().map(Into::into).collect(),
            allow: true,
        }
    }

    /// A denying entry.
    pub fn deny<I, S>(principal: impl Into<PrincipalName>, privileges: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allow: false,
            ..Self::allow(principal, privileges)
        }
    }
}

/// The ordered entries attached to a single resource.
///
/// This is also the "ACL node" handed to the dynamic-membership resolver:
/// `owner` is the ancestor supplying the rule, which may differ from the
/// resource actually being accessed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessControlList {
    /// Resource this list is attached to.
    pub owner: ResourceId,
    /// Entries in storage order.
    #[serde(default)]
    pub entries: Vec<StoredEntry>,
}

impl AccessControlList {
    /// An empty list attached to `owner`.
    pub fn new(owner: impl Into<ResourceId>) -> Self {
        Self {
            owner: owner.into(),
            entries: Vec::new(),
        }
    }

    /// Append an entry, builder style.
    pub fn with_entry(mut self, entry: StoredEntry) -> Self {
        self.entries.push(entry);
        self
    }

    /// Entries in storage order.
    pub fn iter(&self) -> std::slice::Iter<'_, StoredEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a AccessControlList {
    type Item = &'a StoredEntry;
    type IntoIter = std::slice::Iter<'a, StoredEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// ---------------------------------------------------------------------------
// Resolved form
// ---------------------------------------------------------------------------

/// A resolved privilege, as the permission compiler expects it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Privilege(String);

impl Privilege {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Privilege {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A principal after directory classification.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal {
    pub name: PrincipalName,
    pub kind: PrincipalKind,
}

impl Principal {
    pub fn new(name: impl Into<PrincipalName>, kind: PrincipalKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn is_group(&self) -> bool {
        self.kind == PrincipalKind::Group
    }
}

/// A fully resolved rule, ready for permission compilation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessControlEntry {
    principal: Principal,
    privileges: Vec<Privilege>,
    allow: bool,
}

impl AccessControlEntry {
    pub fn new(principal: Principal, privileges: Vec<Privilege>, allow: bool) -> Self {
        Self {
            principal,
            privileges,
            allow,
        }
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    pub fn principal_name(&self) -> &PrincipalName {
        &self.principal.name
    }

    pub fn privileges(&self) -> &[Privilege] {
        &self.privileges
    }

    /// `true` for a grant, `false` for a deny.
    pub fn is_allow(&self) -> bool {
        self.allow
    }

    pub fn is_group_entry(&self) -> bool {
        self.principal.is_group()
    }
}

impl fmt::Display for AccessControlEntry {
    /// `allow read,write(alice)` / `deny read(G1)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = if self.allow { "allow" } else { "deny" };
        let privileges: Vec<&str> = self.privileges.iter().map(Privilege::name).collect();
        write!(f, "{verb} {}({})", privileges.join(","), self.principal.name)
    }
}
