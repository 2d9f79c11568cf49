use crate::config::StepConfig;
use anyhow::{Result, anyhow};
use clap::Parser;

/// Command-line arguments for fetchtree
#[derive(Parser, Debug, Clone)]
#[command(name = "fetchtree")]
#[command(about = "A CLI tool for materializing source trees from a declarative fetch manifest")]
#[command(long_about = None)]
#[command(version)]
pub struct Args {
    /// Manifest file path
    #[arg(long, value_name = "PATH", default_value = "./fetchtree.yaml")]
    pub manifest: String,

    /// Working directory destinations are resolved against
    /// (overrides the manifest's workdir; defaults to the current directory)
    #[arg(long, value_name = "PATH")]
    pub workdir: Option<String>,

    /// Preview operations without executing
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Ad-hoc fetch steps (can be specified multiple times)
    #[command(flatten)]
    pub steps: StepArgs,
}

/// Arguments for ad-hoc fetch steps given directly on the command line
///
/// The vectors are paired by index: the Nth `--step-url` goes with the Nth
/// `--step-dest`. Optional vectors must either be omitted entirely or given
/// once per step, with an empty string meaning "not set" for that step.
#[derive(Parser, Debug, Clone, Default)]
pub struct StepArgs {
    /// Source URL for a step
    #[arg(long = "step-url", value_name = "URL")]
    pub urls: Vec<String>,

    /// Destination directory for a step
    #[arg(long = "step-dest", value_name = "PATH")]
    pub dests: Vec<String>,

    /// Git reference for a step (empty string = none)
    #[arg(long = "step-ref", value_name = "REF")]
    pub refs: Vec<String>,

    /// Comma-separated sparse paths for a step (empty string = none)
    #[arg(long = "step-sparse", value_name = "PATHS")]
    pub sparse: Vec<String>,
}

impl StepArgs {
    /// Check whether any ad-hoc step arguments were given
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
            && self.dests.is_empty()
            && self.refs.is_empty()
            && self.sparse.is_empty()
    }

    /// Convert the paired argument vectors into step configurations
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The number of `--step-url` and `--step-dest` arguments differ
    /// - An optional vector is neither omitted nor given once per step
    pub fn to_steps(&self) -> Result<Vec<StepConfig>> {
        if self.urls.len() != self.dests.len() {
            return Err(anyhow!(
                "Mismatched step arguments: {} --step-url but {} --step-dest",
                self.urls.len(),
                self.dests.len()
            ));
        }

        let count = self.urls.len();

        if !self.refs.is_empty() && self.refs.len() != count {
            return Err(anyhow!(
                "Expected 0 or {} --step-ref arguments, got {} (use an empty string for steps without a ref)",
                count,
                self.refs.len()
            ));
        }

        if !self.sparse.is_empty() && self.sparse.len() != count {
            return Err(anyhow!(
                "Expected 0 or {} --step-sparse arguments, got {} (use an empty string for steps without sparse paths)",
                count,
                self.sparse.len()
            ));
        }

        let steps = (0..count)
            .map(|i| {
                let git_ref = self
                    .refs
                    .get(i)
                    .filter(|r| !r.is_empty())
                    .map(ToOwned::to_owned);

                let sparse = self
                    .sparse
                    .get(i)
                    .filter(|s| !s.is_empty())
                    .map(|s| s.split(',').map(|p| p.trim().to_owned()).collect())
                    .unwrap_or_default();

                StepConfig {
                    source: self.urls[i].clone(),
                    dest: self.dests[i].clone(),
                    git_ref,
                    sparse,
                    enabled: true,
                }
            })
            .collect();

        Ok(steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_steps_pairs_by_index() {
        let args = StepArgs {
            urls: vec!["a/one".to_owned(), "a/two".to_owned()],
            dests: vec!["one".to_owned(), "two".to_owned()],
            refs: vec!["v1".to_owned(), String::new()],
            sparse: vec![String::new(), "inc/x.h,inc/y.h".to_owned()],
        };

        let steps = args.to_steps().unwrap();
        assert_eq!(steps.len(), 2);

        assert_eq!(steps[0].source, "a/one");
        assert_eq!(steps[0].dest, "one");
        assert_eq!(steps[0].git_ref.as_deref(), Some("v1"));
        assert!(steps[0].sparse.is_empty());

        assert_eq!(steps[1].git_ref, None);
        assert_eq!(steps[1].sparse, vec!["inc/x.h", "inc/y.h"]);
        assert!(steps[1].enabled);
    }

    #[test]
    fn test_to_steps_optional_vectors_may_be_omitted() {
        let args = StepArgs {
            urls: vec!["a/one".to_owned()],
            dests: vec!["one".to_owned()],
            refs: Vec::new(),
            sparse: Vec::new(),
        };

        let steps = args.to_steps().unwrap();
        assert_eq!(steps[0].git_ref, None);
        assert!(steps[0].sparse.is_empty());
    }

    #[test]
    fn test_to_steps_mismatched_lengths() {
        let args = StepArgs {
            urls: vec!["a/one".to_owned(), "a/two".to_owned()],
            dests: vec!["one".to_owned()],
            refs: Vec::new(),
            sparse: Vec::new(),
        };
        assert!(args.to_steps().is_err());

        let args = StepArgs {
            urls: vec!["a/one".to_owned()],
            dests: vec!["one".to_owned()],
            refs: vec!["v1".to_owned(), "v2".to_owned()],
            sparse: Vec::new(),
        };
        assert!(args.to_steps().is_err());
    }

    #[test]
    fn test_is_empty() {
        assert!(StepArgs::default().is_empty());

        let args = StepArgs {
            urls: vec!["a/one".to_owned()],
            ..StepArgs::default()
        };
        assert!(!args.is_empty());
    }
}
