//! Manifest management module
//!
//! Handles YAML manifest parsing, JSON schema validation, and semantic checks

pub mod schema;
pub mod validation;
pub mod yaml;

use crate::system::System;
use serde::{Deserialize, Serialize};

/// A single fetch step from the manifest
///
/// Steps are immutable once loaded; they are created by parsing the manifest
/// and discarded after execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepConfig {
    /// Git repository URL, account/repo shorthand, or local clone source
    pub source: String,

    /// Destination directory, relative to the working directory
    pub dest: String,

    /// Git reference (branch, tag, or commit hash) to check out after cloning
    #[serde(default, rename = "ref", skip_serializing_if = "Option::is_none")]
    pub git_ref: Option<String>,

    /// Restrict the checkout to these paths (sparse checkout)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sparse: Vec<String>,

    /// Disabled steps are parsed for documentation but never executed
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    return true;
}

/// Main manifest structure: an ordered list of fetch steps
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    /// Working directory all destinations are resolved against
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workdir: Option<String>,

    /// Fetch steps, executed in declaration order
    pub steps: Vec<StepConfig>,
}

impl Manifest {
    /// Load a manifest from a YAML file
    pub fn load_from_file(system: &dyn System, path: &str) -> anyhow::Result<Self> {
        yaml::load_manifest(system, path)
    }

    /// Validate the manifest (schema-independent semantic checks)
    pub fn validate(&self) -> anyhow::Result<()> {
        validation::validate_manifest(self)
    }

    /// Iterate over the enabled steps in declaration order
    pub fn enabled_steps(&self) -> impl Iterator<Item = &StepConfig> {
        self.steps.iter().filter(|step| step.enabled)
    }
}
