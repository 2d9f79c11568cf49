//! Manifest validation logic

use crate::config::{Manifest, StepConfig};
use anyhow::{Result, anyhow};
use std::collections::HashSet;
use std::path::{Component, Path};

/// Validate a complete manifest
///
/// # Errors
///
/// Returns an error if:
/// - The manifest does not contain at least one step
/// - Two enabled steps target the same destination
/// - Any step configuration is invalid
#[inline]
pub fn validate_manifest(manifest: &Manifest) -> Result<()> {
    if manifest.steps.is_empty() {
        return Err(anyhow!("Manifest must contain at least one fetch step"));
    }

    for (index, step) in manifest.steps.iter().enumerate() {
        validate_step_config(step, index)?;
    }

    // Destinations must be unique among enabled steps
    let mut seen: HashSet<&str> = HashSet::new();
    for step in manifest.enabled_steps() {
        if !seen.insert(step.dest.as_str()) {
            return Err(anyhow!(
                "Duplicate destination '{}': each enabled step must target a unique directory",
                step.dest
            ));
        }
    }

    Ok(())
}

/// Validate a single step configuration
fn validate_step_config(step: &StepConfig, index: usize) -> Result<()> {
    let context = format!("Step #{}", index + 1);

    if step.source.trim().is_empty() {
        return Err(anyhow!("{context}: Source cannot be empty"));
    }

    validate_source_url(&step.source).map_err(|e| anyhow!("{context}: {e}"))?;

    if step.dest.trim().is_empty() {
        return Err(anyhow!("{context}: Destination cannot be empty"));
    }

    validate_path_safety(&step.dest).map_err(|e| anyhow!("{context}: {e}"))?;

    if let Some(reference) = step.git_ref.as_ref()
        && reference.trim().is_empty()
    {
        return Err(anyhow!("{context}: Ref cannot be empty when specified"));
    }

    for (sparse_index, sparse_path) in step.sparse.iter().enumerate() {
        if sparse_path.trim().is_empty() {
            return Err(anyhow!(
                "{}: Sparse path #{} cannot be empty",
                context,
                sparse_index + 1
            ));
        }
        validate_path_safety(sparse_path)
            .map_err(|e| anyhow!("{}: Sparse path #{}: {}", context, sparse_index + 1, e))?;
    }

    Ok(())
}

/// Validate a clone source format
///
/// # Errors
///
/// Returns an error if:
/// - The source is not a recognized URL or shorthand format
#[inline]
pub fn validate_source_url(url: &str) -> Result<()> {
    // Local clone sources - detailed handling happens in Repository::parse()
    if url.starts_with("file:") || url.starts_with('/') {
        return Ok(());
    }

    if url.starts_with("https://") || url.starts_with("http://") || url.starts_with("git@") {
        return Ok(());
    }

    // Short format: org/repo
    if url.contains('/') && !url.contains(':') && url.matches('/').count() == 1 {
        return Ok(());
    }

    Err(anyhow!(
        "Invalid source format: '{url}'\n\
        Supported formats:\n\
        - Short: myorg/repo\n\
        - HTTPS: https://github.com/myorg/repo.git\n\
        - SSH: git@github.com:myorg/repo.git\n\
        - Local: file:///path/to/repo or /path/to/repo"
    ))
}

/// Validate that a manifest path stays inside the working directory
///
/// # Errors
///
/// Returns an error if:
/// - The path is absolute
/// - The path contains parent-directory traversal
#[inline]
pub fn validate_path_safety(path: &str) -> Result<()> {
    let path_obj = Path::new(path);

    if path_obj.is_absolute() {
        return Err(anyhow!(
            "Path '{path}' must be relative to the working directory"
        ));
    }

    for component in path_obj.components() {
        if matches!(component, Component::ParentDir) {
            return Err(anyhow!(
                "Path '{path}' must not traverse outside the working directory"
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(source: &str, dest: &str) -> StepConfig {
        StepConfig {
            source: source.to_owned(),
            dest: dest.to_owned(),
            git_ref: None,
            sparse: Vec::new(),
            enabled: true,
        }
    }

    #[test]
    fn test_valid_manifest() {
        let manifest = Manifest {
            workdir: None,
            steps: vec![step("cms-sw/cmssw", "cmssw"), step("a/b", "b")],
        };
        assert!(validate_manifest(&manifest).is_ok());
    }

    #[test]
    fn test_empty_manifest_rejected() {
        let manifest = Manifest {
            workdir: None,
            steps: Vec::new(),
        };
        assert!(validate_manifest(&manifest).is_err());
    }

    #[test]
    fn test_duplicate_enabled_dest_rejected() {
        let manifest = Manifest {
            workdir: None,
            steps: vec![step("a/b", "same"), step("c/d", "same")],
        };
        let err = validate_manifest(&manifest).unwrap_err();
        assert!(err.to_string().contains("Duplicate destination 'same'"));
    }

    #[test]
    fn test_duplicate_dest_allowed_when_disabled() {
        let mut disabled = step("c/d", "same");
        disabled.enabled = false;

        let manifest = Manifest {
            workdir: None,
            steps: vec![step("a/b", "same"), disabled],
        };
        assert!(validate_manifest(&manifest).is_ok());
    }

    #[test]
    fn test_source_url_formats() {
        assert!(validate_source_url("myorg/repo").is_ok());
        assert!(validate_source_url("https://github.com/myorg/repo.git").is_ok());
        assert!(validate_source_url("git@github.com:myorg/repo.git").is_ok());
        assert!(validate_source_url("file:///srv/mirror/repo").is_ok());

        assert!(validate_source_url("invalid").is_err());
        assert!(validate_source_url("too/many/slashes").is_err());
    }

    #[test]
    fn test_path_safety() {
        assert!(validate_path_safety("deps/fastjet").is_ok());
        assert!(validate_path_safety("./deps").is_ok());

        assert!(validate_path_safety("/absolute").is_err());
        assert!(validate_path_safety("../escape").is_err());
        assert!(validate_path_safety("deps/../../escape").is_err());
    }

    #[test]
    fn test_empty_ref_rejected() {
        let mut bad = step("a/b", "b");
        bad.git_ref = Some("  ".to_owned());

        let manifest = Manifest {
            workdir: None,
            steps: vec![bad],
        };
        assert!(validate_manifest(&manifest).is_err());
    }
}
