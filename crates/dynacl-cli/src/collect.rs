//! # Collect Subcommand
//!
//! Effective entries for one user on one resource of a fixture.
//!
//! ```bash
//! dynacl collect --fixture world.yaml --resource /a/b --user alice --principal G1
//! dynacl collect --fixture world.yaml --resource /a/b --user alice --json
//! ```

use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use dynacl_core::{AccessControlEntry, PrincipalName, ResourceId, UserId};
use dynacl_eval::ProviderConfig;

use crate::fixture::Fixture;

/// Arguments for the collect subcommand.
#[derive(Args, Debug)]
pub struct CollectArgs {
    /// Path to the YAML fixture.
    #[arg(long)]
    pub fixture: PathBuf,

    /// Resource being accessed.
    #[arg(long)]
    pub resource: String,

    /// Acting user. Its own id is always part of the principal set.
    #[arg(long)]
    pub user: String,

    /// Additional principal the user holds statically. Repeatable.
    #[arg(long = "principal")]
    pub principals: Vec<String>,

    /// Print JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

/// Serialized shape of one output row.
#[derive(Debug, Serialize)]
struct EntryRow<'a> {
    principal: &'a str,
    kind: &'static str,
    allow: bool,
    privileges: Vec<&'a str>,
}

impl<'a> From<&'a AccessControlEntry> for EntryRow<'a> {
    fn from(entry: &'a AccessControlEntry) -> Self {
        Self {
            principal: entry.principal_name().as_str(),
            kind: entry.principal().kind.as_str(),
            allow: entry.is_allow(),
            privileges: entry.privileges().iter().map(|p| p.name()).collect(),
        }
    }
}

/// Execute the collect subcommand.
pub fn run_collect(args: &CollectArgs, config: ProviderConfig) -> Result<u8> {
    let entries = collect_entries(args, config)?;
    if args.json {
        println!("{}", render_json(&entries)?);
    } else {
        print!("{}", render_table(&entries));
    }
    Ok(0)
}

/// Load the fixture and run one evaluation.
pub fn collect_entries(args: &CollectArgs, config: ProviderConfig) -> Result<Vec<AccessControlEntry>> {
    let fixture = Fixture::load(&args.fixture)?;
    let provider = fixture
        .provider(config)
        .context("failed to initialize provider")?;

    let user = UserId::new(args.user.as_str());
    let mut principals: HashSet<PrincipalName> =
        args.principals.iter().map(|p| PrincipalName::new(p.as_str())).collect();
    principals.insert(PrincipalName::new(user.as_str()));

    let target = ResourceId::new(args.resource.as_str());
    tracing::debug!(target = %target, user = %user, principals = principals.len(), "collecting");

    provider
        .collect(&target, &principals, &user)
        .with_context(|| format!("failed to collect entries for {target}"))
}

pub fn render_json(entries: &[AccessControlEntry]) -> Result<String> {
    let rows: Vec<EntryRow<'_>> = entries.iter().map(EntryRow::from).collect();
    Ok(serde_json::to_string_pretty(&rows)?)
}

/// Fixed-width table, one row per entry in evaluation order.
pub fn render_table(entries: &[AccessControlEntry]) -> String {
    if entries.is_empty() {
        return "no applicable entries\n".to_string();
    }

    let width = entries
        .iter()
        .map(|e| e.principal_name().as_str().len())
        .max()
        .unwrap_or(0)
        .max("PRINCIPAL".len());

    let mut out = format!("{:>3}  {:<6} {:<width$}  {:<10}  PRIVILEGES\n", "#", "ACTION", "PRINCIPAL", "KIND");
    for (i, entry) in entries.iter().enumerate() {
        let row = EntryRow::from(entry);
        out.push_str(&format!(
            "{:>3}  {:<6} {:<width$}  {:<10}  {}\n",
            i + 1,
            if row.allow { "allow" } else { "deny" },
            row.principal,
            row.kind,
            row.privileges.join(","),
        ));
    }
    out
}
