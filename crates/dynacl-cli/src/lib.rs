//! # dynacl-cli: Dynamic ACL Command-Line Interface
//!
//! Runs the evaluator against a YAML fixture describing a resource tree,
//! a principal directory and a table of dynamic grants.
//!
//! ## Subcommands
//!
//! - `collect`: effective entries for a user on a resource
//! - `check`: every resource reaches the root; unknown names are reported
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from the handlers.
//! - Handlers return an exit code; evaluation logic lives in `dynacl-eval`.

pub mod check;
pub mod collect;
pub mod fixture;
