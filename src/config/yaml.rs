//! YAML manifest loading and parsing

use crate::config::Manifest;
use crate::system::System;
use anyhow::{Context as _, Result, anyhow};
use std::path::Path;

/// Load and parse a YAML manifest from file
pub fn load_manifest(system: &dyn System, path: &str) -> Result<Manifest> {
    let path_obj = Path::new(path);

    if !system.exists(path_obj) {
        return Err(anyhow!(
            "Manifest file not found: {path}\n\
            Create a fetchtree.yaml file or specify a different path with --manifest"
        ));
    }

    let content = system
        .read_to_string(path_obj)
        .with_context(|| format!("Failed to read manifest file: {path}"))?;

    // Parse to a generic value first so the schema sees unknown fields,
    // which serde would otherwise silently ignore
    let raw: serde_json::Value = serde_yaml::from_str(&content).with_context(|| {
        return format!(
            "Failed to parse YAML manifest in file: {path}\n\
            Please check the syntax and structure of your manifest file"
        );
    })?;

    crate::config::schema::validate_against_schema(&raw)
        .context("Manifest validation failed")?;

    let manifest: Manifest = serde_json::from_value(raw)
        .with_context(|| format!("Failed to parse manifest structure in file: {path}"))?;

    // Validate manifest logic (dest uniqueness, path safety, URL formats)
    crate::config::validation::validate_manifest(&manifest)
        .context("Manifest validation failed")?;

    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::MockSystem;

    const VALID_MANIFEST: &str = r#"
workdir: "./deps"
steps:
  - source: "cms-sw/cmssw"
    dest: "cmssw"
    ref: "CMSSW_12_4_0"
  - source: "https://github.com/fastjet/fastjet.git"
    dest: "fastjet"
    sparse:
      - "include/fastjet"
  - source: "cms-sw/old-tool"
    dest: "old-tool"
    enabled: false
"#;

    #[test]
    fn test_load_valid_manifest() {
        let system = MockSystem::new().with_file("/fetchtree.yaml", VALID_MANIFEST.as_bytes());

        let manifest = load_manifest(&system, "/fetchtree.yaml").unwrap();
        assert_eq!(manifest.workdir.as_deref(), Some("./deps"));
        assert_eq!(manifest.steps.len(), 3);
        assert_eq!(manifest.steps[0].git_ref.as_deref(), Some("CMSSW_12_4_0"));
        assert_eq!(manifest.steps[1].sparse, vec!["include/fastjet"]);
        assert!(manifest.steps[0].enabled);
        assert!(!manifest.steps[2].enabled);
    }

    #[test]
    fn test_enabled_steps_preserve_order() {
        let system = MockSystem::new().with_file("/fetchtree.yaml", VALID_MANIFEST.as_bytes());

        let manifest = load_manifest(&system, "/fetchtree.yaml").unwrap();
        let dests: Vec<&str> = manifest
            .enabled_steps()
            .map(|step| step.dest.as_str())
            .collect();
        assert_eq!(dests, vec!["cmssw", "fastjet"]);
    }

    #[test]
    fn test_missing_file() {
        let system = MockSystem::new();
        let err = load_manifest(&system, "/missing.yaml").unwrap_err();
        assert!(err.to_string().contains("Manifest file not found"));
    }

    #[test]
    fn test_invalid_yaml_syntax() {
        let system = MockSystem::new().with_file("/bad.yaml", b"steps: [ {source: ");
        let err = load_manifest(&system, "/bad.yaml").unwrap_err();
        assert!(err.to_string().contains("Failed to parse YAML manifest"));
    }

    #[test]
    fn test_empty_steps_rejected_by_schema() {
        let system = MockSystem::new().with_file("/empty.yaml", b"steps: []");
        assert!(load_manifest(&system, "/empty.yaml").is_err());
    }
}
