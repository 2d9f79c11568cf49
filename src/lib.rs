//! fetchtree - A CLI tool for materializing source trees from a declarative fetch manifest
//!
//! This library replaces ad-hoc bootstrap shell scripts (a linear sequence of
//! `git clone` / `git checkout` commands) with an explicit manifest: an ordered
//! list of fetch steps, each naming a source, a destination, an optional ref,
//! and optional sparse paths. Steps run strictly in declaration order and the
//! run aborts on the first failure.

pub mod cli;
pub mod config;
pub mod error;
pub mod git;
pub mod operations;
pub mod system;

use anyhow::Result;
use cli::Args;
use git::GitCli;
use operations::{FetchRun, RunReport};
use system::RealSystem;

/// Main entry point for the fetchtree library
pub fn run(args: Args) -> Result<RunReport> {
    let system = RealSystem;
    let git = GitCli::new();
    let fetch_run = FetchRun::new(args, &system, &git)?;
    fetch_run.execute()
}
