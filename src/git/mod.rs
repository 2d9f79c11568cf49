//! Git operations module
//!
//! Defines the remote-fetch capability as a trait so runs can be driven
//! either by the real `git` binary or by a recording mock in tests.

pub mod cli;
pub mod mock;
pub mod repository;

pub use cli::*;
pub use mock::*;
pub use repository::*;

use std::path::Path;
use thiserror::Error;

/// Failure classification for backend operations
///
/// The backend knows *what kind* of git failure happened; the runner
/// attaches the offending step's destination when surfacing it.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum GitFailure {
    /// The remote could not be reached or cloned
    #[error("{0}")]
    Remote(String),

    /// The requested ref does not exist
    #[error("{0}")]
    RefMissing(String),

    /// Any other git failure (missing binary, sparse-checkout setup, ...)
    #[error("{0}")]
    Other(String),
}

/// The remote-fetch capability: clone, ref checkout, and sparse checkout
///
/// # Implementations
/// - `GitCli`: production implementation shelling out to the `git` binary
/// - `MockGit`: test implementation recording every call in order
pub trait GitBackend: Send + Sync {
    /// Verify the backend is usable (binary present, version sufficient)
    fn check_available(&self) -> Result<(), GitFailure>;

    /// Clone a repository into `dest`, populating the working tree
    fn clone_repo(&self, url: &str, dest: &Path) -> Result<(), GitFailure>;

    /// Clone history into `dest` without populating the working tree
    fn clone_no_checkout(&self, url: &str, dest: &Path) -> Result<(), GitFailure>;

    /// Restrict the working tree of `repo` to the given paths
    fn sparse_checkout(&self, repo: &Path, paths: &[String]) -> Result<(), GitFailure>;

    /// Check out a ref in `repo`
    fn checkout(&self, repo: &Path, reference: &str) -> Result<(), GitFailure>;
}
