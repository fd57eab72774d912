//! # In-Memory Collaborators
//!
//! Reference implementations of the collaborator traits, for tests, the CLI
//! and embedding hosts that keep their tree in memory.
//!
//! - [`InMemoryTree`]: parent pointers and ACLs in plain maps, built once.
//! - [`InMemoryDirectory`]: `DashMap`-backed, so principals can be added or
//!   changed while evaluations are running.
//! - [`PassThroughPrivileges`] / [`PrivilegeRegistry`]: privilege resolution.
//! - [`GrantTable`]: a dynamic-membership resolver driven by a fixed table.

use std::collections::{BTreeSet, HashMap};

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use dynacl_core::{
    AccessControlList, DirectoryError, PrincipalName, PrincipalRecord, Privilege, ResourceId,
    StorageError, UserId,
};

use crate::traits::{DynamicMembershipResolver, PrincipalDirectory, PrivilegeResolver, ResourceTree};

// ---------------------------------------------------------------------------
// Tree
// ---------------------------------------------------------------------------

/// A resource tree held in memory.
///
/// Parent pointers are stored as given, so malformed shapes (orphans,
/// cycles) can be represented and are reported by the walker, not here.
#[derive(Debug, Clone)]
pub struct InMemoryTree {
    root: ResourceId,
    parents: HashMap<ResourceId, Option<ResourceId>>,
    acls: HashMap<ResourceId, AccessControlList>,
}

impl InMemoryTree {
    /// A tree containing only `root`.
    pub fn new(root: impl Into<ResourceId>) -> Self {
        let root = root.into();
        let mut parents = HashMap::new();
        parents.insert(root.clone(), None);
        Self {
            root,
            parents,
            acls: HashMap::new(),
        }
    }

    /// Add `child` under `parent`. Builder style.
    pub fn with_child(mut self, child: impl Into<ResourceId>, parent: impl Into<ResourceId>) -> Self {
        self.insert_node(child.into(), Some(parent.into()));
        self
    }

    /// Attach `acl` to its owner. Builder style.
    pub fn with_acl(mut self, acl: AccessControlList) -> Self {
        self.insert_acl(acl);
        self
    }

    /// Insert or replace a node and its parent pointer.
    pub fn insert_node(&mut self, id: ResourceId, parent: Option<ResourceId>) {
        self.parents.insert(id, parent);
    }

    /// Insert or replace the ACL attached to `acl.owner`.
    pub fn insert_acl(&mut self, acl: AccessControlList) {
        self.acls.insert(acl.owner.clone(), acl);
    }

    /// All resources, sorted.
    pub fn resources(&self) -> Vec<ResourceId> {
        let sorted: BTreeSet<&ResourceId> = self.parents.keys().collect();
        sorted.into_iter().cloned().collect()
    }
}

impl ResourceTree for InMemoryTree {
    fn root(&self) -> Result<ResourceId, StorageError> {
        Ok(self.root.clone())
    }

    fn parent(&self, resource: &ResourceId) -> Result<Option<ResourceId>, StorageError> {
        self.parents
            .get(resource)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(resource.clone()))
    }

    fn access_control_list(
        &self,
        resource: &ResourceId,
    ) -> Result<Option<AccessControlList>, StorageError> {
        if !self.parents.contains_key(resource) {
            return Err(StorageError::NotFound(resource.clone()));
        }
        Ok(self.acls.get(resource).cloned())
    }
}

// ---------------------------------------------------------------------------
// Directory
// ---------------------------------------------------------------------------

/// Principal directory backed by a concurrent map.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    records: DashMap<PrincipalName, PrincipalRecord>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a record, keyed by its name.
    pub fn insert(&self, record: PrincipalRecord) {
        self.records.insert(record.name.clone(), record);
    }

    pub fn remove(&self, name: &PrincipalName) -> Option<PrincipalRecord> {
        self.records.remove(name).map(|(_, record)| record)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<PrincipalRecord> for InMemoryDirectory {
    fn from_iter<I: IntoIterator<Item = PrincipalRecord>>(iter: I) -> Self {
        let directory = Self::new();
        for record in iter {
            directory.insert(record);
        }
        directory
    }
}

impl PrincipalDirectory for InMemoryDirectory {
    fn lookup(&self, name: &PrincipalName) -> Result<Option<PrincipalRecord>, DirectoryError> {
        Ok(self.records.get(name).map(|r| r.value().clone()))
    }
}

// ---------------------------------------------------------------------------
// Privileges
// ---------------------------------------------------------------------------

/// Resolves every name to a privilege of the same name.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThroughPrivileges;

impl PrivilegeResolver for PassThroughPrivileges {
    fn privilege_from_name(&self, name: &str) -> Result<Privilege, StorageError> {
        Ok(Privilege::new(name))
    }
}

/// Resolves only registered names; anything else is an unknown privilege.
#[derive(Debug, Clone, Default)]
pub struct PrivilegeRegistry {
    known: BTreeSet<String>,
}

impl PrivilegeRegistry {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            known: names.into_iter().map(Into::into).collect(),
        }
    }
}

impl PrivilegeResolver for PrivilegeRegistry {
    fn privilege_from_name(&self, name: &str) -> Result<Privilege, StorageError> {
        if self.known.contains(name) {
            Ok(Privilege::new(name))
        } else {
            Err(StorageError::UnknownPrivilege(name.to_string()))
        }
    }
}

// ---------------------------------------------------------------------------
// Dynamic membership
// ---------------------------------------------------------------------------

/// One row of a [`GrantTable`]: `user` holds `principal`, optionally only
/// when accessing `resource`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicGrant {
    pub principal: PrincipalName,
    pub user: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<ResourceId>,
}

/// Dynamic-membership resolver answering from a fixed table.
#[derive(Debug, Clone, Default)]
pub struct GrantTable {
    grants: Vec<DynamicGrant>,
}

impl GrantTable {
    pub fn new(grants: Vec<DynamicGrant>) -> Self {
        Self { grants }
    }
}

impl DynamicMembershipResolver for GrantTable {
    fn has_principal_in_context(
        &self,
        principal: &PrincipalName,
        _acl: &AccessControlList,
        target: &ResourceId,
        user: &UserId,
    ) -> bool {
        self.grants.iter().any(|g| {
            g.principal == *principal
                && g.user == *user
                && g.resource.as_ref().map_or(true, |r| r == target)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dynacl_core::StoredEntry;

    #[test]
    fn tree_reports_parents_and_acls() {
        let tree = InMemoryTree::new("/")
            .with_child("/a", "/")
            .with_acl(AccessControlList::new("/a").with_entry(StoredEntry::allow("x", ["read"])));

        assert_eq!(tree.root().unwrap(), ResourceId::new("/"));
        assert_eq!(tree.parent(&"/a".into()).unwrap(), Some(ResourceId::new("/")));
        assert_eq!(tree.parent(&"/".into()).unwrap(), None);
        assert!(tree.access_control_list(&"/".into()).unwrap().is_none());
        assert_eq!(tree.access_control_list(&"/a".into()).unwrap().unwrap().len(), 1);
        assert!(tree.is_root(&"/".into()).unwrap());
        assert!(!tree.is_root(&"/a".into()).unwrap());
    }

    #[test]
    fn tree_unknown_resource_is_not_found() {
        let tree = InMemoryTree::new("/");
        assert_eq!(
            tree.parent(&"/missing".into()).unwrap_err(),
            StorageError::NotFound("/missing".into())
        );
    }

    #[test]
    fn directory_can_change_at_runtime() {
        let dir: InMemoryDirectory = [PrincipalRecord::group("g")].into_iter().collect();
        assert!(dir.lookup(&"g".into()).unwrap().is_some());
        dir.remove(&"g".into());
        assert!(dir.lookup(&"g".into()).unwrap().is_none());
        assert!(dir.is_empty());
    }

    #[test]
    fn registry_rejects_unknown() {
        let reg = PrivilegeRegistry::new(["read"]);
        assert_eq!(reg.privilege_from_name("read").unwrap(), Privilege::new("read"));
        assert_eq!(
            reg.privilege_from_name("fly").unwrap_err(),
            StorageError::UnknownPrivilege("fly".to_string())
        );
    }

    #[test]
    fn grant_table_scopes_by_resource() {
        let table = GrantTable::new(vec![DynamicGrant {
            principal: "owner".into(),
            user: "alice".into(),
            resource: Some("/docs/a".into()),
        }]);
        let acl = AccessControlList::new("/docs");
        assert!(table.has_principal_in_context(&"owner".into(), &acl, &"/docs/a".into(), &"alice".into()));
        assert!(!table.has_principal_in_context(&"owner".into(), &acl, &"/docs/b".into(), &"alice".into()));
        assert!(!table.has_principal_in_context(&"owner".into(), &acl, &"/docs/a".into(), &"bob".into()));
    }
}
