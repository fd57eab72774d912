//! # dynacl-eval: Effective ACL Entry Resolution
//!
//! Resolves the ordered list of access-control entries that apply to a
//! principal set acting on a resource, walking the resource's ancestors and
//! extending static membership with dynamic principals resolved per
//! evaluation.
//!
//! ## Components
//!
//! - **Static principal cache** (`cache.rs`): bounded LRU of principal
//!   names proven not dynamic. Shared, never invalidated.
//!
//! - **Applicability check** (`applicability.rs`): cache → directory →
//!   pluggable resolver. Directory failures fail closed.
//!
//! - **Entry collector** (`collector.rs`): one ACL at a time, keeps the
//!   applicable entries and splits them into individual and group entries in
//!   reverse storage order.
//!
//! - **Hierarchy walker** (`walker.rs`): iterative climb from target to the
//!   fixed root, nearest ancestor first.
//!
//! - **Provider** (`provider.rs`): wires the collaborators together and
//!   exposes `collect`.
//!
//! ## Output order
//!
//! Every individual-principal entry precedes every group-principal entry
//! across the whole hierarchy. Within each kind, nodes appear nearest
//! first, and each node's own entries appear in reverse storage order. With
//! no dynamic principal involved the result equals that of a purely static
//! evaluator.

#![forbid(unsafe_code)]

pub mod applicability;
pub mod cache;
pub mod collector;
pub mod config;
pub mod memory;
pub mod provider;
pub mod traits;
pub mod walker;

pub use applicability::{DynamicPrincipalCheck, EvaluationContext};
pub use cache::{StaticPrincipalCache, DEFAULT_STATIC_CACHE_CAPACITY};
pub use collector::{CollectedEntries, EntryCollector, NodeEntries};
pub use config::{ConfigError, DirectoryFailurePolicy, ProviderConfig};
pub use provider::{DynamicAclProvider, ProviderBuilder};
pub use traits::{
    DynamicMembershipResolver, PermissionCompiler, PrincipalDirectory, PrivilegeResolver,
    ResourceTree,
};
pub use walker::HierarchyWalker;
