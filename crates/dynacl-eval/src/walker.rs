//! # Ancestor Walk
//!
//! Climbs from the target resource to the fixed root, one parent at a time,
//! and feeds every access-controlled node to the [`EntryCollector`].
//!
//! The walk is an explicit loop, so depth is bounded by the tree and not by
//! the call stack. The root identity is captured at provider initialization
//! and compared by value here; it is never re-derived mid-walk.
//!
//! ## Structural errors
//!
//! A node other than the root without a parent, or a node reached twice,
//! means the parent chain never reaches the root. Both are fatal: the walk
//! cannot terminate safely.

use std::collections::HashSet;

use dynacl_core::{AclError, ResourceId};

use crate::collector::{CollectedEntries, EntryCollector};
use crate::traits::ResourceTree;

/// Walks one parent chain. Cheap to construct per evaluation.
pub struct HierarchyWalker<'a> {
    tree: &'a dyn ResourceTree,
    root: &'a ResourceId,
}

impl<'a> HierarchyWalker<'a> {
    pub fn new(tree: &'a dyn ResourceTree, root: &'a ResourceId) -> Self {
        Self { tree, root }
    }

    /// Visit `target` and each ancestor up to and including the root,
    /// nearest first, merging every node's entries into one result.
    pub fn walk(
        &self,
        target: &ResourceId,
        collector: &EntryCollector<'_>,
    ) -> Result<CollectedEntries, AclError> {
        let mut collected = CollectedEntries::default();
        let mut visited: HashSet<ResourceId> = HashSet::new();
        let mut current = target.clone();

        loop {
            if !visited.insert(current.clone()) {
                return Err(AclError::Structural {
                    resource: current,
                    reason: "parent chain contains a cycle".to_string(),
                });
            }

            if let Some(acl) = self.tree.access_control_list(&current)? {
                tracing::trace!(node = %current, entries = acl.len(), "access-controlled node");
                collected.append(collector.collect_from_list(&acl)?);
            }

            if current == *self.root {
                break;
            }

            current = match self.tree.parent(&current)? {
                Some(parent) => parent,
                None => {
                    return Err(AclError::Structural {
                        resource: current,
                        reason: format!("no parent, but {} is the root", self.root),
                    })
                }
            };
        }

        Ok(collected)
    }

    /// Check that `resource` reaches the root without collecting anything.
    /// Returns the depth (root = 0).
    pub fn depth(&self, resource: &ResourceId) -> Result<usize, AclError> {
        let mut visited: HashSet<ResourceId> = HashSet::new();
        let mut current = resource.clone();
        let mut depth = 0;

        while current != *self.root {
            if !visited.insert(current.clone()) {
                return Err(AclError::Structural {
                    resource: current,
                    reason: "parent chain contains a cycle".to_string(),
                });
            }
            current = self.tree.parent(&current)?.ok_or_else(|| AclError::Structural {
                resource: current.clone(),
                reason: format!("no parent, but {} is the root", self.root),
            })?;
            depth += 1;
        }

        Ok(depth)
    }
}
