//! Mock git backend for testing

use super::{GitBackend, GitFailure};
use crate::system::{MockSystem, System as _};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// A single recorded backend invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitCall {
    Clone { url: String, dest: PathBuf },
    CloneNoCheckout { url: String, dest: PathBuf },
    SparseCheckout { repo: PathBuf, paths: Vec<String> },
    Checkout { repo: PathBuf, reference: String },
}

/// Recording git backend for testing
///
/// Records every call in invocation order and materializes destinations
/// through a shared `MockSystem`: plain clones produce a marker tree, sparse
/// checkouts produce only the named paths. Can be armed to fail for a given
/// URL or ref to exercise abort behavior.
#[derive(Clone)]
pub struct MockGit {
    system: MockSystem,
    state: Arc<RwLock<MockGitState>>,
}

struct MockGitState {
    calls: Vec<GitCall>,
    unreachable_urls: HashSet<String>,
    missing_refs: HashSet<String>,
}

/// Files every simulated remote contains on a full clone
const REMOTE_TREE: &[&str] = &["README.md", "src/lib.rs"];

impl MockGit {
    /// Create a new `MockGit` materializing into the given system
    #[must_use]
    #[inline]
    pub fn new(system: MockSystem) -> Self {
        Self {
            system,
            state: Arc::new(RwLock::new(MockGitState {
                calls: Vec::new(),
                unreachable_urls: HashSet::new(),
                missing_refs: HashSet::new(),
            })),
        }
    }

    /// Make clones of the given URL fail as unreachable (builder pattern)
    #[must_use]
    #[inline]
    pub fn with_unreachable_url(self, url: &str) -> Self {
        {
            let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
            state.unreachable_urls.insert(url.to_owned());
        }
        self
    }

    /// Make checkouts of the given ref fail as missing (builder pattern)
    #[must_use]
    #[inline]
    pub fn with_missing_ref(self, reference: &str) -> Self {
        {
            let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
            state.missing_refs.insert(reference.to_owned());
        }
        self
    }

    /// Get all recorded calls in invocation order
    #[must_use]
    #[inline]
    pub fn calls(&self) -> Vec<GitCall> {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        state.calls.clone()
    }

    fn record(&self, call: GitCall) {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        state.calls.push(call);
    }

    fn url_unreachable(&self, url: &str) -> bool {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        state.unreachable_urls.contains(url)
    }

    fn ref_missing(&self, reference: &str) -> bool {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        state.missing_refs.contains(reference)
    }

    fn materialize_git_dir(&self, dest: &Path) -> Result<(), GitFailure> {
        self.system
            .create_dir_all(&dest.join(".git"))
            .map_err(|e| GitFailure::Other(e.to_string()))
    }

    fn materialize_paths(&self, dest: &Path, paths: &[String]) -> Result<(), GitFailure> {
        for path in paths {
            let target = dest.join(path);
            if let Some(parent) = target.parent() {
                self.system
                    .create_dir_all(parent)
                    .map_err(|e| GitFailure::Other(e.to_string()))?;
            }
            self.system
                .write(&target, b"mock contents")
                .map_err(|e| GitFailure::Other(e.to_string()))?;
        }
        Ok(())
    }
}

impl GitBackend for MockGit {
    fn check_available(&self) -> Result<(), GitFailure> {
        Ok(())
    }

    fn clone_repo(&self, url: &str, dest: &Path) -> Result<(), GitFailure> {
        self.record(GitCall::Clone {
            url: url.to_owned(),
            dest: dest.to_path_buf(),
        });

        if self.url_unreachable(url) {
            return Err(GitFailure::Remote(format!(
                "Failed to clone repository '{url}': could not resolve host"
            )));
        }

        self.materialize_git_dir(dest)?;
        let tree: Vec<String> = REMOTE_TREE.iter().map(|s| (*s).to_owned()).collect();
        self.materialize_paths(dest, &tree)
    }

    fn clone_no_checkout(&self, url: &str, dest: &Path) -> Result<(), GitFailure> {
        self.record(GitCall::CloneNoCheckout {
            url: url.to_owned(),
            dest: dest.to_path_buf(),
        });

        if self.url_unreachable(url) {
            return Err(GitFailure::Remote(format!(
                "Failed to clone repository '{url}': could not resolve host"
            )));
        }

        // No working tree is populated until checkout
        self.materialize_git_dir(dest)
    }

    fn sparse_checkout(&self, repo: &Path, paths: &[String]) -> Result<(), GitFailure> {
        self.record(GitCall::SparseCheckout {
            repo: repo.to_path_buf(),
            paths: paths.to_vec(),
        });

        self.materialize_paths(repo, paths)
    }

    fn checkout(&self, repo: &Path, reference: &str) -> Result<(), GitFailure> {
        self.record(GitCall::Checkout {
            repo: repo.to_path_buf(),
            reference: reference.to_owned(),
        });

        if self.ref_missing(reference) {
            return Err(GitFailure::RefMissing(format!(
                "Failed to checkout reference '{reference}': pathspec did not match"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_calls_in_order() {
        let system = MockSystem::new();
        let git = MockGit::new(system);

        git.clone_repo("url-a", Path::new("/w/a")).unwrap();
        git.checkout(Path::new("/w/a"), "v1").unwrap();

        assert_eq!(
            git.calls(),
            vec![
                GitCall::Clone {
                    url: "url-a".to_owned(),
                    dest: PathBuf::from("/w/a"),
                },
                GitCall::Checkout {
                    repo: PathBuf::from("/w/a"),
                    reference: "v1".to_owned(),
                },
            ]
        );
    }

    #[test]
    fn test_clone_materializes_marker_tree() {
        let system = MockSystem::new();
        let git = MockGit::new(system.clone());

        git.clone_repo("url-a", Path::new("/w/a")).unwrap();

        assert!(system.is_file(Path::new("/w/a/README.md")));
        assert!(system.is_file(Path::new("/w/a/src/lib.rs")));
    }

    #[test]
    fn test_no_checkout_clone_leaves_tree_empty() {
        let system = MockSystem::new();
        let git = MockGit::new(system.clone());

        git.clone_no_checkout("url-a", Path::new("/w/a")).unwrap();

        assert!(system.is_dir(Path::new("/w/a/.git")));
        assert!(!system.exists(Path::new("/w/a/README.md")));
    }

    #[test]
    fn test_armed_failures() {
        let system = MockSystem::new();
        let git = MockGit::new(system)
            .with_unreachable_url("bad-url")
            .with_missing_ref("v9");

        assert!(matches!(
            git.clone_repo("bad-url", Path::new("/w/a")),
            Err(GitFailure::Remote(_))
        ));
        assert!(matches!(
            git.checkout(Path::new("/w/a"), "v9"),
            Err(GitFailure::RefMissing(_))
        ));
    }
}
