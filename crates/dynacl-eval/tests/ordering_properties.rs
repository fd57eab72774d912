//! Property tests for the output order of `collect`.
//!
//! Random parent chains with random ACLs, principals drawn from a fixed pool
//! of individuals and groups. The expected order is rebuilt independently:
//! nodes nearest first, each node reversed, individuals before groups.

use std::collections::HashSet;
use std::sync::Arc;

use proptest::prelude::*;

use dynacl_core::{AccessControlList, PrincipalName, PrincipalRecord, StoredEntry};
use dynacl_eval::memory::{GrantTable, InMemoryDirectory, InMemoryTree};
use dynacl_eval::DynamicAclProvider;

const INDIVIDUALS: [&str; 3] = ["alice", "bob", "carol"];
const GROUPS: [&str; 3] = ["G1", "G2", "G3"];
const PRIVILEGES: [&str; 3] = ["read", "write", "admin"];

fn directory() -> InMemoryDirectory {
    INDIVIDUALS
        .iter()
        .map(|n| PrincipalRecord::individual(*n))
        .chain(GROUPS.iter().map(|n| PrincipalRecord::group(*n)))
        .collect()
}

fn is_group(name: &str) -> bool {
    GROUPS.contains(&name)
}

fn arb_entry() -> impl Strategy<Value = StoredEntry> {
    (
        prop::sample::select(INDIVIDUALS.iter().chain(GROUPS.iter()).copied().collect::<Vec<_>>()),
        prop::sample::select(PRIVILEGES.to_vec()),
        any::<bool>(),
    )
        .prop_map(|(principal, privilege, allow)| {
            if allow {
                StoredEntry::allow(principal, [privilege])
            } else {
                StoredEntry::deny(principal, [privilege])
            }
        })
}

/// Per node from root downward: `None` for a node without an ACL.
fn arb_chain() -> impl Strategy<Value = Vec<Option<Vec<StoredEntry>>>> {
    prop::collection::vec(
        prop::option::of(prop::collection::vec(arb_entry(), 0..6)),
        1..6,
    )
}

/// Builds `n0 -> n1 -> ... -> nk` and returns the tree with the deepest id.
fn build(chain: &[Option<Vec<StoredEntry>>]) -> (InMemoryTree, String) {
    let mut tree = InMemoryTree::new("n0");
    for depth in 1..chain.len() {
        tree = tree.with_child(format!("n{depth}"), format!("n{}", depth - 1));
    }
    for (depth, entries) in chain.iter().enumerate() {
        if let Some(entries) = entries {
            let acl = entries
                .iter()
                .cloned()
                .fold(AccessControlList::new(format!("n{depth}")), AccessControlList::with_entry);
            tree = tree.with_acl(acl);
        }
    }
    (tree, format!("n{}", chain.len() - 1))
}

/// `(principal, privilege, allow)` in the order the evaluator must emit.
fn expected(
    chain: &[Option<Vec<StoredEntry>>],
    names: &HashSet<PrincipalName>,
) -> Vec<(String, String, bool)> {
    let mut users = Vec::new();
    let mut groups = Vec::new();
    for entries in chain.iter().rev().flatten() {
        for entry in entries.iter().rev() {
            if !names.contains(&entry.principal) {
                continue;
            }
            let row = (
                entry.principal.to_string(),
                entry.privileges[0].clone(),
                entry.allow,
            );
            if is_group(entry.principal.as_str()) {
                groups.push(row);
            } else {
                users.push(row);
            }
        }
    }
    users.extend(groups);
    users
}

fn provider(tree: InMemoryTree, resolver_verdict: bool) -> DynamicAclProvider {
    let resolver = move |_: &PrincipalName,
                         _: &AccessControlList,
                         _: &dynacl_core::ResourceId,
                         _: &dynacl_core::UserId| resolver_verdict;
    DynamicAclProvider::builder(Arc::new(tree), Arc::new(directory()), Arc::new(resolver))
        .init()
        .unwrap()
}

proptest! {
    #[test]
    fn order_is_users_then_groups_nearest_first_reversed(
        chain in arb_chain(),
        named in prop::sample::subsequence(
            INDIVIDUALS.iter().chain(GROUPS.iter()).copied().collect::<Vec<_>>(),
            0..=6,
        ),
    ) {
        let (tree, target) = build(&chain);
        let names: HashSet<PrincipalName> = named.iter().map(|n| PrincipalName::new(*n)).collect();
        let p = provider(tree, false);

        let entries = p.collect(&target.as_str().into(), &names, &"alice".into()).unwrap();
        let actual: Vec<(String, String, bool)> = entries
            .iter()
            .map(|e| (
                e.principal_name().to_string(),
                e.privileges()[0].name().to_string(),
                e.is_allow(),
            ))
            .collect();

        prop_assert_eq!(actual, expected(&chain, &names));

        let first_group = entries.iter().position(|e| e.is_group_entry()).unwrap_or(entries.len());
        prop_assert!(entries[first_group..].iter().all(|e| e.is_group_entry()));
    }

    #[test]
    fn without_dynamic_principals_resolver_is_irrelevant(
        chain in arb_chain(),
        named in prop::sample::subsequence(
            INDIVIDUALS.iter().chain(GROUPS.iter()).copied().collect::<Vec<_>>(),
            0..=6,
        ),
    ) {
        let (tree, target) = build(&chain);
        let names: HashSet<PrincipalName> = named.iter().map(|n| PrincipalName::new(*n)).collect();

        let permissive = provider(tree.clone(), true);
        let strict = provider(tree, false);

        prop_assert_eq!(
            permissive.collect(&target.as_str().into(), &names, &"bob".into()).unwrap(),
            strict.collect(&target.as_str().into(), &names, &"bob".into()).unwrap()
        );
    }
}
