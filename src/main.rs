//! # fetchtree
//!
//! fetchtree is a command-line tool that materializes a local source tree from a
//! declarative manifest of git fetch steps. It replaces the bootstrap shell script
//! pattern (a fixed sequence of `git clone` and `git checkout` commands) with a
//! data-driven, testable component.
//!
//! ## Features
//! - Ordered fetch steps: each names a source, a destination, an optional ref,
//!   and optional sparse paths.
//! - Sparse checkout: fetch history without a working tree, then populate only
//!   the named paths.
//! - Disabled steps are kept in the manifest for documentation but never run.
//! - The first failure aborts the run and identifies the offending destination.
//!
//! ## Usage
//!
//! **With a manifest:**
//! ```sh
//! fetchtree --manifest fetchtree.yaml --workdir ./deps
//! ```
//!
//! **Ad-hoc steps:**
//! ```sh
//! fetchtree --step-url cms-sw/cmssw --step-dest cmssw --step-ref CMSSW_12_4_0
//! ```
//!
//! See `fetchtree --help` for more options and details.

use anyhow::Result;
use clap::Parser as _;
use fetchtree::cli::Args;
use fetchtree::error::FetchError;
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing subscriber based on verbose flag
    let log_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_target(false).with_env_filter(filter).init();

    match fetchtree::run(args) {
        Ok(_report) => std::process::exit(0),
        Err(err) => {
            error!("{}", err);
            std::process::exit(
                err.downcast_ref::<FetchError>()
                    .map_or(1, FetchError::exit_code),
            );
        }
    }
}
