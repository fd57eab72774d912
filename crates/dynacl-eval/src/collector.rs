//! # Per-Node Entry Collection
//!
//! Reads one ACL in storage order, keeps the entries that apply to this
//! evaluation, and splits them into individual and group entries.
//!
//! ## Ordering
//!
//! The downstream compiler evaluates "most specific last", so each kept
//! entry is *prepended* to its node-local buffer: a node contributes its own
//! entries in reverse storage order. The buffers are then appended to the
//! walk's running sequences, so the cross-node order (nearest ancestor
//! first) is untouched.

use std::collections::{HashSet, VecDeque};

use dynacl_core::{
    AccessControlEntry, AccessControlList, AclError, Principal, PrincipalKind, PrincipalName,
    StoredEntry,
};

use crate::applicability::{DynamicPrincipalCheck, EvaluationContext};
use crate::traits::{PrincipalDirectory, PrivilegeResolver};

/// Entries gathered so far, split by principal kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectedEntries {
    pub user: Vec<AccessControlEntry>,
    pub group: Vec<AccessControlEntry>,
}

impl CollectedEntries {
    /// Append another node's contribution after everything collected so far.
    pub fn append(&mut self, node: NodeEntries) {
        self.user.extend(node.user);
        self.group.extend(node.group);
    }

    /// Final sequence: every individual entry, then every group entry.
    pub fn into_ordered(self) -> Vec<AccessControlEntry> {
        let mut ordered = self.user;
        ordered.extend(self.group);
        ordered
    }

    pub fn len(&self) -> usize {
        self.user.len() + self.group.len()
    }

    pub fn is_empty(&self) -> bool {
        self.user.is_empty() && self.group.is_empty()
    }
}

/// One node's contribution, already in reverse storage order.
#[derive(Debug, Default)]
pub struct NodeEntries {
    user: VecDeque<AccessControlEntry>,
    group: VecDeque<AccessControlEntry>,
}

impl NodeEntries {
    fn prepend(&mut self, entry: AccessControlEntry) {
        if entry.is_group_entry() {
            self.group.push_front(entry);
        } else {
            self.user.push_front(entry);
        }
    }
}

/// Why an entry was kept.
#[derive(Debug, Clone, Copy)]
enum Inclusion {
    /// The principal is in the caller's set; its kind is still unknown.
    Named,
    /// Dynamic membership, already classified by the directory.
    Dynamic(PrincipalKind),
}

/// Collects applicable entries from individual ACLs during one evaluation.
pub struct EntryCollector<'a> {
    principal_names: &'a HashSet<PrincipalName>,
    check: &'a DynamicPrincipalCheck,
    directory: &'a dyn PrincipalDirectory,
    privileges: &'a dyn PrivilegeResolver,
    ctx: EvaluationContext<'a>,
}

impl<'a> EntryCollector<'a> {
    pub fn new(
        principal_names: &'a HashSet<PrincipalName>,
        check: &'a DynamicPrincipalCheck,
        directory: &'a dyn PrincipalDirectory,
        privileges: &'a dyn PrivilegeResolver,
        ctx: EvaluationContext<'a>,
    ) -> Self {
        Self {
            principal_names,
            check,
            directory,
            privileges,
            ctx,
        }
    }

    /// Collect the entries of `acl` that apply to this evaluation.
    pub fn collect_from_list(&self, acl: &AccessControlList) -> Result<NodeEntries, AclError> {
        let mut node = NodeEntries::default();

        for stored in acl {
            let Some(inclusion) = self.inclusion(stored, acl)? else {
                continue;
            };
            node.prepend(self.resolve(stored, inclusion)?);
        }

        tracing::trace!(
            acl_owner = %acl.owner,
            user_entries = node.user.len(),
            group_entries = node.group.len(),
            "collected node entries"
        );
        Ok(node)
    }

    /// Literal membership short-circuits: a named principal is included
    /// whatever the dynamic resolver would say.
    fn inclusion(
        &self,
        stored: &StoredEntry,
        acl: &AccessControlList,
    ) -> Result<Option<Inclusion>, AclError> {
        if self.principal_names.contains(&stored.principal) {
            return Ok(Some(Inclusion::Named));
        }
        Ok(self
            .check
            .is_applicable(&stored.principal, acl, self.ctx)?
            .map(Inclusion::Dynamic))
    }

    fn resolve(
        &self,
        stored: &StoredEntry,
        inclusion: Inclusion,
    ) -> Result<AccessControlEntry, AclError> {
        let kind = match inclusion {
            Inclusion::Dynamic(kind) => kind,
            // Names the directory does not know are treated as individuals.
            Inclusion::Named => self
                .directory
                .lookup(&stored.principal)?
                .map_or(PrincipalKind::Individual, |record| record.kind),
        };

        let privileges = stored
            .privileges
            .iter()
            .map(|name| self.privileges.privilege_from_name(name))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(AccessControlEntry::new(
            Principal::new(stored.principal.clone(), kind),
            privileges,
            stored.allow,
        ))
    }
}
