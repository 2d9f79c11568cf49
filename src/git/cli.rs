//! Production git backend shelling out to the `git` binary

use super::{GitBackend, GitFailure};
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Real backend driving the installed `git` binary via subprocesses
#[derive(Debug, Clone, Copy, Default)]
pub struct GitCli;

impl GitCli {
    /// Create a new `GitCli` instance
    #[must_use]
    pub const fn new() -> Self {
        return Self;
    }

    fn run_git(args: &[&str], cwd: Option<&Path>) -> Result<String, GitFailure> {
        let mut command = Command::new("git");
        command.args(args);
        if let Some(dir) = cwd {
            command.current_dir(dir);
        }

        let output = command.output().map_err(|e| {
            GitFailure::Other(format!(
                "Failed to execute git {}: {e}. Please ensure Git is installed and available in PATH",
                args.first().copied().unwrap_or("")
            ))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GitFailure::Other(stderr.trim().to_owned()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl GitBackend for GitCli {
    /// Check that git is available and meets the minimum version
    ///
    /// Non-cone sparse checkout requires Git 2.35.0 or later.
    fn check_available(&self) -> Result<(), GitFailure> {
        let version_output = Self::run_git(&["--version"], None)?;

        if let Some(version_part) = version_output.split_whitespace().nth(2)
            && let Ok(version) = parse_git_version(version_part)
            && version < (2, 35, 0)
        {
            return Err(GitFailure::Other(format!(
                "Git version {version_part} is too old. fetchtree requires Git 2.35.0 or later for sparse checkout support"
            )));
        }

        Ok(())
    }

    fn clone_repo(&self, url: &str, dest: &Path) -> Result<(), GitFailure> {
        debug!("Cloning {url} into {dest:?}");
        let dest_str = dest
            .to_str()
            .ok_or_else(|| GitFailure::Other("Destination path is not valid UTF-8".to_owned()))?;

        Self::run_git(&["clone", url, dest_str], None)
            .map_err(|e| GitFailure::Remote(format!("Failed to clone repository '{url}': {e}")))?;

        Ok(())
    }

    fn clone_no_checkout(&self, url: &str, dest: &Path) -> Result<(), GitFailure> {
        debug!("Cloning {url} into {dest:?} (no checkout)");
        let dest_str = dest
            .to_str()
            .ok_or_else(|| GitFailure::Other("Destination path is not valid UTF-8".to_owned()))?;

        Self::run_git(
            &["clone", "--filter=blob:none", "--no-checkout", url, dest_str],
            None,
        )
        .map_err(|e| GitFailure::Remote(format!("Failed to clone repository '{url}': {e}")))?;

        Ok(())
    }

    fn sparse_checkout(&self, repo: &Path, paths: &[String]) -> Result<(), GitFailure> {
        debug!("Restricting checkout of {repo:?} to {paths:?}");

        // Non-cone mode so that individual files can be named, not just directories
        let mut args = vec!["sparse-checkout", "set", "--no-cone"];
        args.extend(paths.iter().map(String::as_str));

        Self::run_git(&args, Some(repo)).map_err(|e| {
            GitFailure::Other(format!("Failed to set sparse checkout patterns: {e}"))
        })?;

        Ok(())
    }

    fn checkout(&self, repo: &Path, reference: &str) -> Result<(), GitFailure> {
        debug!("Checking out reference {reference} in {repo:?}");

        Self::run_git(&["checkout", reference], Some(repo)).map_err(|e| {
            GitFailure::RefMissing(format!("Failed to checkout reference '{reference}': {e}"))
        })?;

        Ok(())
    }
}

/// Parse a git version string into a (major, minor, patch) tuple
///
/// # Errors
///
/// Returns an error if:
/// - The version string is invalid
#[inline]
pub fn parse_git_version(version: &str) -> Result<(u32, u32, u32), GitFailure> {
    let parts: Vec<&str> = version.split('.').collect();
    if parts.len() >= 3 {
        let parse = |s: &str, what: &str| {
            s.parse()
                .map_err(|_| GitFailure::Other(format!("Invalid {what} version in '{version}'")))
        };
        let major = parse(parts[0], "major")?;
        let minor = parse(parts[1], "minor")?;
        let patch = parse(parts[2], "patch")?;
        Ok((major, minor, patch))
    } else {
        Err(GitFailure::Other(format!(
            "Invalid version format: '{version}'"
        )))
    }
}
