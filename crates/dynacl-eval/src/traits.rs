//! # Collaborator Traits
//!
//! The evaluator owns no storage. Everything it reads comes through one of
//! these traits, supplied at construction time:
//!
//! - [`ResourceTree`]: parent pointers and attached ACLs.
//! - [`PrincipalDirectory`]: principal classification and the `dynamic` marker.
//! - [`DynamicMembershipResolver`]: the pluggable per-evaluation verdict.
//! - [`PrivilegeResolver`]: stored privilege names to [`Privilege`] values.
//! - [`PermissionCompiler`]: the downstream consumer of the entry list.
//!
//! All calls are synchronous and may block. Implementations must be
//! `Send + Sync` so one provider can serve many evaluation threads.

use dynacl_core::{
    AccessControlEntry, AccessControlList, AclError, DirectoryError, PrincipalName,
    PrincipalRecord, Privilege, ResourceId, StorageError, UserId,
};

/// Read-only view of the resource tree.
pub trait ResourceTree: Send + Sync {
    /// Identity of the root. Called once, when the provider is initialized.
    fn root(&self) -> Result<ResourceId, StorageError>;

    /// Parent of `resource`, or `None` if it has none.
    fn parent(&self, resource: &ResourceId) -> Result<Option<ResourceId>, StorageError>;

    /// ACL attached to `resource`, if it is access-controlled.
    fn access_control_list(
        &self,
        resource: &ResourceId,
    ) -> Result<Option<AccessControlList>, StorageError>;

    /// Whether `resource` is the root of this tree.
    fn is_root(&self, resource: &ResourceId) -> Result<bool, StorageError> {
        Ok(self.root()? == *resource)
    }
}

/// Lookup of principals by name.
pub trait PrincipalDirectory: Send + Sync {
    /// `Ok(None)` if no such principal exists.
    fn lookup(&self, name: &PrincipalName) -> Result<Option<PrincipalRecord>, DirectoryError>;
}

/// Decides whether a dynamic principal applies to one evaluation.
///
/// `acl` is the list currently supplying the rule (possibly on an ancestor);
/// `target` is the resource actually being accessed. The verdict is never
/// cached by the caller.
pub trait DynamicMembershipResolver: Send + Sync {
    fn has_principal_in_context(
        &self,
        principal: &PrincipalName,
        acl: &AccessControlList,
        target: &ResourceId,
        user: &UserId,
    ) -> bool;
}

impl<F> DynamicMembershipResolver for F
where
    F: Fn(&PrincipalName, &AccessControlList, &ResourceId, &UserId) -> bool + Send + Sync,
{
    fn has_principal_in_context(
        &self,
        principal: &PrincipalName,
        acl: &AccessControlList,
        target: &ResourceId,
        user: &UserId,
    ) -> bool {
        self(principal, acl, target, user)
    }
}

/// Maps stored privilege names to the compiler's privilege representation.
pub trait PrivilegeResolver: Send + Sync {
    /// Unknown names are a storage failure, not a skip.
    fn privilege_from_name(&self, name: &str) -> Result<Privilege, StorageError>;
}

/// Turns an ordered entry list into allow/deny decisions.
///
/// The evaluator only produces the list; compilation semantics belong to
/// the implementor.
pub trait PermissionCompiler {
    type Output;

    fn compile(&self, entries: Vec<AccessControlEntry>) -> Result<Self::Output, AclError>;
}
