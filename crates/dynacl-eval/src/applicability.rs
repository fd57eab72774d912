//! # Dynamic Principal Applicability
//!
//! Decides whether a principal that is *not* literally in the caller's
//! principal set still applies to this evaluation.
//!
//! ## Decision procedure
//!
//! 1. Cached static → not applicable, no I/O.
//! 2. Directory lookup:
//!    - unknown principal → not applicable, *not* cached (the directory
//!      may gain the principal later);
//!    - `dynamic` marker absent or not truthy → cached static, not applicable;
//!    - marker truthy → step 3.
//! 3. Ask the pluggable resolver. Its verdict is never cached: the same
//!    principal may apply to one resource or user and not to another.
//!
//! An applicable principal comes back with the kind read in step 2, so the
//! collector classifies the entry without a second directory read.
//!
//! A directory failure in step 2 is logged and counts as "not dynamic"
//! under [`DirectoryFailurePolicy::FailClosed`]. Excluding an entry can only
//! narrow access. Under [`DirectoryFailurePolicy::Abort`] it is returned.

use std::sync::Arc;

use dynacl_core::{
    AccessControlList, AclError, DirectoryError, PrincipalKind, PrincipalName, ResourceId, UserId,
};

use crate::cache::StaticPrincipalCache;
use crate::config::DirectoryFailurePolicy;
use crate::traits::{DynamicMembershipResolver, PrincipalDirectory};

/// Resolution context for one evaluation. Fixed for the whole walk.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext<'a> {
    /// Resource actually being accessed (never the ancestor supplying a rule).
    pub target: &'a ResourceId,
    /// Acting user.
    pub user: &'a UserId,
}

impl<'a> EvaluationContext<'a> {
    pub fn new(target: &'a ResourceId, user: &'a UserId) -> Self {
        Self { target, user }
    }
}

/// Applicability check shared by every evaluation of one provider.
pub struct DynamicPrincipalCheck {
    cache: Arc<StaticPrincipalCache>,
    directory: Arc<dyn PrincipalDirectory>,
    resolver: Arc<dyn DynamicMembershipResolver>,
    policy: DirectoryFailurePolicy,
}

impl DynamicPrincipalCheck {
    pub fn new(
        cache: Arc<StaticPrincipalCache>,
        directory: Arc<dyn PrincipalDirectory>,
        resolver: Arc<dyn DynamicMembershipResolver>,
        policy: DirectoryFailurePolicy,
    ) -> Self {
        Self {
            cache,
            directory,
            resolver,
            policy,
        }
    }

    pub fn cache(&self) -> &Arc<StaticPrincipalCache> {
        &self.cache
    }

    /// Whether `principal` applies in `ctx` by dynamic membership.
    ///
    /// `Some(kind)` if it applies, carrying the directory's classification;
    /// `None` otherwise. Only fails under [`DirectoryFailurePolicy::Abort`].
    pub fn is_applicable(
        &self,
        principal: &PrincipalName,
        acl: &AccessControlList,
        ctx: EvaluationContext<'_>,
    ) -> Result<Option<PrincipalKind>, AclError> {
        if self.cache.contains(principal.as_str()) {
            tracing::debug!(principal = %principal, "principal is cached static, not resolving dynamically");
            return Ok(None);
        }

        let record = match self.directory.lookup(principal) {
            Ok(Some(record)) => record,
            Ok(None) => {
                tracing::trace!(principal = %principal, "principal unknown to directory");
                return Ok(None);
            }
            Err(e) => return self.on_directory_failure(principal, e),
        };

        if !record.is_dynamic() {
            tracing::debug!(principal = %principal, "found static principal, caching");
            self.cache.mark_static(principal);
            return Ok(None);
        }

        tracing::debug!(principal = %principal, acl_owner = %acl.owner, target = %ctx.target, "found dynamic principal");
        let applies = self
            .resolver
            .has_principal_in_context(principal, acl, ctx.target, ctx.user);
        Ok(applies.then_some(record.kind))
    }

    fn on_directory_failure(
        &self,
        principal: &PrincipalName,
        error: DirectoryError,
    ) -> Result<Option<PrincipalKind>, AclError> {
        match self.policy {
            DirectoryFailurePolicy::FailClosed => {
                let reason = match &error {
                    DirectoryError::AccessDenied(_) => "unable to determine group status",
                    DirectoryError::Unsupported(_) | DirectoryError::Lookup(_) => {
                        "unable to access principal directory"
                    }
                };
                tracing::error!(principal = %principal, error = %error, "{reason}; treating as not dynamic");
                Ok(None)
            }
            DirectoryFailurePolicy::Abort => Err(error.into()),
        }
    }
}

impl std::fmt::Debug for DynamicPrincipalCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamicPrincipalCheck")
            .field("cache", &self.cache)
            .field("policy", &self.policy)
            .finish()
    }
}
