//! # Dynamic ACL Provider
//!
//! Entry point of the crate. A [`DynamicAclProvider`] is assembled from its
//! collaborators by a [`ProviderBuilder`]; [`ProviderBuilder::init`] reads
//! the root identity once and the provider keeps it for its lifetime.
//!
//! ```
//! use std::collections::HashSet;
//! use std::sync::Arc;
//!
//! use dynacl_core::{AccessControlList, PrincipalName, PrincipalRecord, StoredEntry};
//! use dynacl_eval::memory::{GrantTable, InMemoryDirectory, InMemoryTree};
//! use dynacl_eval::DynamicAclProvider;
//!
//! let tree = InMemoryTree::new("/")
//!     .with_child("/a", "/")
//!     .with_acl(AccessControlList::new("/").with_entry(StoredEntry::allow("G1", ["read"])));
//! let directory: InMemoryDirectory = [PrincipalRecord::group("G1")].into_iter().collect();
//!
//! let provider = DynamicAclProvider::builder(
//!     Arc::new(tree),
//!     Arc::new(directory),
//!     Arc::new(GrantTable::default()),
//! )
//! .init()
//! .unwrap();
//!
//! let principals: HashSet<PrincipalName> = ["G1".into()].into_iter().collect();
//! let entries = provider.collect(&"/a".into(), &principals, &"alice".into()).unwrap();
//! assert_eq!(entries.len(), 1);
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use dynacl_core::{AccessControlEntry, AclError, PrincipalName, ResourceId, UserId};

use crate::applicability::{DynamicPrincipalCheck, EvaluationContext};
use crate::cache::StaticPrincipalCache;
use crate::collector::EntryCollector;
use crate::config::ProviderConfig;
use crate::memory::PassThroughPrivileges;
use crate::traits::{
    DynamicMembershipResolver, PermissionCompiler, PrincipalDirectory, PrivilegeResolver,
    ResourceTree,
};
use crate::walker::HierarchyWalker;

/// Assembles a [`DynamicAclProvider`].
pub struct ProviderBuilder {
    tree: Arc<dyn ResourceTree>,
    directory: Arc<dyn PrincipalDirectory>,
    resolver: Arc<dyn DynamicMembershipResolver>,
    privileges: Arc<dyn PrivilegeResolver>,
    cache: Option<Arc<StaticPrincipalCache>>,
    config: ProviderConfig,
}

impl ProviderBuilder {
    /// Privilege resolution. Defaults to [`PassThroughPrivileges`].
    pub fn privileges(mut self, privileges: Arc<dyn PrivilegeResolver>) -> Self {
        self.privileges = privileges;
        self
    }

    pub fn config(mut self, config: ProviderConfig) -> Self {
        self.config = config;
        self
    }

    /// Share an existing static cache (e.g. one per process across several
    /// providers). Overrides `config.static_cache_capacity`.
    pub fn static_cache(mut self, cache: Arc<StaticPrincipalCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Fix the root identity and build the provider.
    ///
    /// Fails if the tree does not recognize its own root through
    /// [`ResourceTree::is_root`].
    pub fn init(self) -> Result<DynamicAclProvider, AclError> {
        let root = self.tree.root()?;
        if !self.tree.is_root(&root)? {
            return Err(AclError::Structural {
                resource: root,
                reason: "tree does not report its root as the root".to_string(),
            });
        }
        let cache = self
            .cache
            .unwrap_or_else(|| Arc::new(StaticPrincipalCache::new(self.config.static_cache_capacity)));

        tracing::debug!(
            root = %root,
            cache_capacity = cache.capacity().get(),
            policy = ?self.config.directory_failure_policy,
            "dynamic ACL provider initialized"
        );

        let check = DynamicPrincipalCheck::new(
            cache,
            Arc::clone(&self.directory),
            self.resolver,
            self.config.directory_failure_policy,
        );

        Ok(DynamicAclProvider {
            tree: self.tree,
            directory: self.directory,
            privileges: self.privileges,
            check,
            root,
        })
    }
}

/// Resolves effective entry lists for principal sets, including dynamic
/// principals.
///
/// `Send + Sync`: one provider serves concurrent evaluations. The only
/// shared mutable state is the static principal cache.
pub struct DynamicAclProvider {
    tree: Arc<dyn ResourceTree>,
    directory: Arc<dyn PrincipalDirectory>,
    privileges: Arc<dyn PrivilegeResolver>,
    check: DynamicPrincipalCheck,
    root: ResourceId,
}

impl DynamicAclProvider {
    pub fn builder(
        tree: Arc<dyn ResourceTree>,
        directory: Arc<dyn PrincipalDirectory>,
        resolver: Arc<dyn DynamicMembershipResolver>,
    ) -> ProviderBuilder {
        ProviderBuilder {
            tree,
            directory,
            resolver,
            privileges: Arc::new(PassThroughPrivileges),
            cache: None,
            config: ProviderConfig::default(),
        }
    }

    /// Root identity fixed at initialization.
    pub fn root(&self) -> &ResourceId {
        &self.root
    }

    pub fn static_cache(&self) -> &Arc<StaticPrincipalCache> {
        self.check.cache()
    }

    /// Effective entries for `principal_names` acting as `user_id` on
    /// `target`: every individual entry, then every group entry, each in
    /// nearest-ancestor-first order.
    pub fn collect(
        &self,
        target: &ResourceId,
        principal_names: &HashSet<PrincipalName>,
        user_id: &UserId,
    ) -> Result<Vec<AccessControlEntry>, AclError> {
        let ctx = EvaluationContext::new(target, user_id);
        let collector = EntryCollector::new(
            principal_names,
            &self.check,
            self.directory.as_ref(),
            self.privileges.as_ref(),
            ctx,
        );

        let collected = HierarchyWalker::new(self.tree.as_ref(), &self.root).walk(target, &collector)?;

        tracing::debug!(
            target = %target,
            user = %user_id,
            user_entries = collected.user.len(),
            group_entries = collected.group.len(),
            "collected effective entries"
        );
        Ok(collected.into_ordered())
    }

    /// Collect and hand the result straight to `compiler`.
    pub fn compile_permissions<C: PermissionCompiler>(
        &self,
        compiler: &C,
        target: &ResourceId,
        principal_names: &HashSet<PrincipalName>,
        user_id: &UserId,
    ) -> Result<C::Output, AclError> {
        let entries = self.collect(target, principal_names, user_id)?;
        compiler.compile(entries)
    }

    /// Depth of `resource` below the root; fails if it never reaches it.
    pub fn depth(&self, resource: &ResourceId) -> Result<usize, AclError> {
        HierarchyWalker::new(self.tree.as_ref(), &self.root).depth(resource)
    }
}

impl std::fmt::Debug for DynamicAclProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamicAclProvider")
            .field("root", &self.root)
            .field("check", &self.check)
            .finish()
    }
}
