//! # Check Subcommand
//!
//! Validates a fixture before it is used for evaluation: every resource must
//! reach the root through its parent chain, and every privilege named in an
//! ACL must be listed when the fixture lists privileges. Principals named in
//! ACLs but missing from the directory only produce warnings; the evaluator
//! treats them as unknown and never includes them dynamically.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use dynacl_core::{PrincipalName, ResourceId};
use dynacl_eval::ProviderConfig;

use crate::fixture::Fixture;

/// Arguments for the check subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Path to the YAML fixture.
    #[arg(long)]
    pub fixture: PathBuf,
}

/// Outcome of checking one fixture.
#[derive(Debug, Default)]
pub struct CheckReport {
    /// Resources reaching the root, with their depth.
    pub reachable: Vec<(ResourceId, usize)>,
    /// Resources whose parent chain is broken, with the reason.
    pub broken: Vec<(ResourceId, String)>,
    pub unknown_privileges: Vec<String>,
    pub unknown_principals: Vec<PrincipalName>,
}

impl CheckReport {
    /// Warnings do not count.
    pub fn is_ok(&self) -> bool {
        self.broken.is_empty() && self.unknown_privileges.is_empty()
    }
}

/// Execute the check subcommand.
pub fn run_check(args: &CheckArgs, config: ProviderConfig) -> Result<u8> {
    let fixture = Fixture::load(&args.fixture)?;
    let report = check_fixture(&fixture, config)?;

    for (resource, depth) in &report.reachable {
        println!("  OK    {resource} (depth {depth})");
    }
    for (resource, reason) in &report.broken {
        println!("  FAIL  {resource}: {reason}");
    }
    for privilege in &report.unknown_privileges {
        println!("  FAIL  unknown privilege: {privilege}");
    }
    for principal in &report.unknown_principals {
        tracing::warn!(principal = %principal, "principal named in an ACL is not in the directory");
        println!("  WARN  unknown principal: {principal}");
    }

    if report.is_ok() {
        println!("{}: OK", args.fixture.display());
        Ok(0)
    } else {
        println!("{}: FAILED", args.fixture.display());
        Ok(2)
    }
}

/// Check every resource of `fixture` without printing anything.
pub fn check_fixture(fixture: &Fixture, config: ProviderConfig) -> Result<CheckReport> {
    let tree = fixture.tree();
    let provider = fixture
        .provider(config)
        .context("failed to initialize provider")?;

    let mut report = CheckReport {
        unknown_privileges: fixture.unknown_privileges(),
        unknown_principals: fixture.unknown_principals(),
        ..CheckReport::default()
    };

    for resource in tree.resources() {
        match provider.depth(&resource) {
            Ok(depth) => report.reachable.push((resource, depth)),
            Err(e) => report.broken.push((resource, e.to_string())),
        }
    }

    Ok(report)
}
