//! # Error Types
//!
//! Defines the error types used throughout dynamic ACL resolution. All
//! errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.
//!
//! ## Design
//!
//! - Storage failures are always fatal to an evaluation. A truncated entry
//!   list could grant more than the stored rules allow.
//! - Directory failures carry the failing principal so the evaluator can
//!   log and suppress them where the fail-closed policy permits.
//! - Structural errors name the resource where the parent chain broke.

use thiserror::Error;

use crate::identity::{PrincipalName, ResourceId};

/// Top-level error type for an evaluation.
#[derive(Error, Debug)]
pub enum AclError {
    /// The parent chain from a resource never reaches the fixed root.
    #[error("malformed resource tree at {resource}: {reason}")]
    Structural {
        /// Resource at which the walk could not continue.
        resource: ResourceId,
        /// Why the walk could not continue.
        reason: String,
    },

    /// Reading tree, ACL, or privilege data failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// The principal directory failed in a path where that is not
    /// suppressible.
    #[error("directory error: {0}")]
    Directory(#[from] DirectoryError),

    /// The downstream permission compiler rejected the entry list.
    #[error("permission compilation failed: {0}")]
    Compilation(String),
}

/// Error reading from the tree/storage collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The resource does not exist.
    #[error("resource not found: {0}")]
    NotFound(ResourceId),

    /// A stored privilege name has no known privilege.
    #[error("unknown privilege: {0:?}")]
    UnknownPrivilege(String),

    /// Any other backend failure.
    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// Error from the principal directory collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    /// The directory refused to reveal the principal.
    #[error("access denied reading principal {0}")]
    AccessDenied(PrincipalName),

    /// The directory does not support the requested operation.
    #[error("unsupported directory operation: {0}")]
    Unsupported(String),

    /// Generic lookup failure.
    #[error("principal lookup failed: {0}")]
    Lookup(String),
}
