//! # dynacl-core: Foundational Types for Dynamic ACL Resolution
//!
//! This crate defines the vocabulary shared by every other `dynacl-*` crate:
//! the identities that flow through an evaluation, the access-control entries
//! read from storage and handed to the permission compiler, the principal
//! directory record, and the error hierarchy.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for identities.** `ResourceId`, `PrincipalName` and
//!    `UserId` are distinct types. A user id cannot be passed where a
//!    principal name is expected, even though both are strings underneath.
//!
//! 2. **Stored vs. resolved entries.** `StoredEntry` is what the storage
//!    engine hands back (principal *name*, privilege *names*). An
//!    `AccessControlEntry` is only built after the principal has been
//!    classified and its privileges resolved, so downstream code never sees
//!    a half-resolved entry.
//!
//! 3. **Classification lives in the directory.** Whether a principal is an
//!    individual or a group is carried by `PrincipalRecord`, never inferred
//!    from the name.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `dynacl-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

#![forbid(unsafe_code)]

pub mod entry;
pub mod error;
pub mod identity;
pub mod principal;

pub use entry::{AccessControlEntry, AccessControlList, Principal, Privilege, StoredEntry};
pub use error::{AclError, DirectoryError, StorageError};
pub use identity::{PrincipalName, ResourceId, UserId};
pub use principal::{PrincipalKind, PrincipalRecord};
