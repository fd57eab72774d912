//! # YAML Fixtures
//!
//! A fixture is a self-contained world for the evaluator:
//!
//! ```yaml
//! root: /
//! privileges: [read, write]        # optional; any name is accepted if absent
//! resources:
//!   - id: /
//!     acl:
//!       - { principal: G1, privileges: [read] }
//!   - id: /a
//!     parent: /
//!     acl:
//!       - { principal: alice, privileges: [write] }
//!       - { principal: owner, privileges: [write], allow: false }
//! principals:
//!   - { name: alice, kind: individual }
//!   - { name: G1, kind: group }
//!   - { name: owner, kind: group, dynamic: ["true"] }
//! grants:
//!   - { principal: owner, user: alice, resource: /a }
//! ```
//!
//! A resource without an `acl` key is not access-controlled; `acl: []` is
//! access-controlled with no entries.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use dynacl_core::{AccessControlList, AclError, PrincipalName, PrincipalRecord, ResourceId, StoredEntry};
use dynacl_eval::memory::{
    DynamicGrant, GrantTable, InMemoryDirectory, InMemoryTree, PassThroughPrivileges,
    PrivilegeRegistry,
};
use dynacl_eval::{DynamicAclProvider, PrivilegeResolver, ProviderConfig};

/// One node of the fixture tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResourceNode {
    pub id: ResourceId,
    #[serde(default)]
    pub parent: Option<ResourceId>,
    #[serde(default)]
    pub acl: Option<Vec<StoredEntry>>,
}

/// Deserialized fixture file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Fixture {
    pub root: ResourceId,
    #[serde(default)]
    pub privileges: Option<Vec<String>>,
    #[serde(default)]
    pub resources: Vec<ResourceNode>,
    #[serde(default)]
    pub principals: Vec<PrincipalRecord>,
    #[serde(default)]
    pub grants: Vec<DynamicGrant>,
}

impl Fixture {
    /// Read and parse a fixture file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read fixture: {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("failed to parse fixture: {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let fixture: Self = serde_yaml::from_str(content)?;
        if fixture
            .resources
            .iter()
            .any(|r| r.id == fixture.root && r.parent.is_some())
        {
            anyhow::bail!("root {} must not declare a parent", fixture.root);
        }
        Ok(fixture)
    }

    /// The resource tree, parent pointers exactly as declared.
    pub fn tree(&self) -> InMemoryTree {
        let mut tree = InMemoryTree::new(self.root.clone());
        for resource in &self.resources {
            if resource.id != self.root {
                tree.insert_node(resource.id.clone(), resource.parent.clone());
            }
            if let Some(entries) = &resource.acl {
                tree.insert_acl(AccessControlList {
                    owner: resource.id.clone(),
                    entries: entries.clone(),
                });
            }
        }
        tree
    }

    pub fn directory(&self) -> InMemoryDirectory {
        self.principals.iter().cloned().collect()
    }

    pub fn resolver(&self) -> GrantTable {
        GrantTable::new(self.grants.clone())
    }

    /// A registry when the fixture lists its privileges, pass-through otherwise.
    pub fn privilege_resolver(&self) -> Arc<dyn PrivilegeResolver> {
        match &self.privileges {
            Some(names) => Arc::new(PrivilegeRegistry::new(names.iter().cloned())),
            None => Arc::new(PassThroughPrivileges),
        }
    }

    /// Assemble a provider over this fixture.
    pub fn provider(&self, config: ProviderConfig) -> Result<DynamicAclProvider, AclError> {
        DynamicAclProvider::builder(
            Arc::new(self.tree()),
            Arc::new(self.directory()),
            Arc::new(self.resolver()),
        )
        .privileges(self.privilege_resolver())
        .config(config)
        .init()
    }

    /// Principals named in some ACL but absent from `principals`, sorted.
    pub fn unknown_principals(&self) -> Vec<PrincipalName> {
        let known: BTreeSet<&PrincipalName> = self.principals.iter().map(|p| &p.name).collect();
        self.stored_entries()
            .map(|entry| &entry.principal)
            .filter(|name| !known.contains(name))
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Privilege names used in some ACL but not listed, sorted. Empty when
    /// the fixture does not list privileges.
    pub fn unknown_privileges(&self) -> Vec<String> {
        let Some(listed) = &self.privileges else {
            return Vec::new();
        };
        self.stored_entries()
            .flat_map(|entry| entry.privileges.iter())
            .filter(|name| !listed.contains(*name))
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    fn stored_entries(&self) -> impl Iterator<Item = &StoredEntry> {
        self.resources
            .iter()
            .filter_map(|r| r.acl.as_ref())
            .flatten()
    }
}
