//! Fetch run coordination

use crate::cli::Args;
use crate::config::{Manifest, StepConfig};
use crate::error::FetchError;
use crate::git::{GitBackend, GitFailure, Repository};
use crate::system::System;
use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Summary of a completed (or aborted) run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Enabled steps that finished successfully
    pub completed: usize,
    /// Total enabled steps in the manifest
    pub total: usize,
}

/// Coordinates the complete fetch run
#[non_exhaustive]
pub struct FetchRun<'src> {
    manifest: Manifest,
    workdir: PathBuf,
    dry_run: bool,
    system: &'src dyn System,
    git: &'src dyn GitBackend,
}

impl std::fmt::Debug for FetchRun<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchRun")
            .field("manifest", &self.manifest)
            .field("workdir", &self.workdir)
            .field("dry_run", &self.dry_run)
            .finish_non_exhaustive()
    }
}

impl<'src> FetchRun<'src> {
    /// Create a new fetch run from CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The manifest file cannot be loaded or parsed
    /// - The manifest (after merging ad-hoc CLI steps) is invalid
    /// - The working directory does not exist or is not a directory
    /// - The git backend is unavailable while enabled steps exist
    #[inline]
    pub fn new(
        args: Args,
        system: &'src dyn System,
        git: &'src dyn GitBackend,
    ) -> Result<Self> {
        let mut manifest = if system.exists(Path::new(&args.manifest)) {
            Manifest::load_from_file(system, &args.manifest)?
        } else if !args.steps.is_empty() {
            // No manifest file, but ad-hoc steps were given on the command line
            Manifest {
                workdir: None,
                steps: Vec::new(),
            }
        } else if args.manifest.ends_with("fetchtree.yaml") {
            return Err(FetchError::configuration(
                "No manifest found. Create a fetchtree.yaml file or provide steps via --step-url/--step-dest",
            )
            .into());
        } else {
            return Err(FetchError::configuration(format!(
                "Manifest file not found: {}",
                args.manifest
            ))
            .into());
        };

        // Ad-hoc CLI steps append after the manifest's own steps
        if !args.steps.is_empty() {
            let cli_steps = args
                .steps
                .to_steps()
                .map_err(|e| FetchError::configuration(e.to_string()))?;
            manifest.steps.extend(cli_steps);
        }

        if args.workdir.is_some() {
            manifest.workdir = args.workdir.clone();
        }

        manifest
            .validate()
            .map_err(|e| FetchError::configuration(e.to_string()))?;

        let workdir = Self::resolve_workdir(system, manifest.workdir.as_deref())?;

        // Dry runs and disabled-only manifests never need the backend
        if !args.dry_run && manifest.enabled_steps().next().is_some() {
            git.check_available()
                .map_err(|e| FetchError::configuration(e.to_string()))
                .context("Git validation failed")?;
        }

        Ok(FetchRun {
            manifest,
            workdir,
            dry_run: args.dry_run,
            system,
            git,
        })
    }

    /// Resolve the working directory, requiring it to exist
    fn resolve_workdir(
        system: &dyn System,
        workdir: Option<&str>,
    ) -> Result<PathBuf> {
        let current = system.current_dir().map_err(|e| {
            FetchError::filesystem(format!("Cannot get current directory: {e}"))
        })?;

        let resolved = match workdir {
            Some(dir) => {
                let path = PathBuf::from(dir);
                if path.is_absolute() {
                    path
                } else {
                    current.join(path)
                }
            }
            None => current,
        };

        if !system.exists(&resolved) {
            return Err(FetchError::configuration(format!(
                "Working directory does not exist: '{}'",
                resolved.display()
            ))
            .into());
        }
        if !system.is_dir(&resolved) {
            return Err(FetchError::configuration(format!(
                "Working directory is not a directory: '{}'",
                resolved.display()
            ))
            .into());
        }

        Ok(resolved)
    }

    /// Execute the fetch run
    ///
    /// Enabled steps run strictly in declaration order; the first failure
    /// aborts the run with no rollback of already-completed steps.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A destination already exists and is non-empty
    /// - A clone, checkout, or filesystem operation fails
    #[inline]
    pub fn execute(&self) -> Result<RunReport> {
        let total = self.manifest.enabled_steps().count();

        if self.dry_run {
            self.preview_steps()?;
            return Ok(RunReport {
                completed: 0,
                total,
            });
        }

        info!("Starting fetchtree run...");

        let mut completed = 0;

        for (index, step) in self.manifest.steps.iter().enumerate() {
            if !step.enabled {
                info!("  [{}] Skipping disabled step: {}", index + 1, step.dest);
                continue;
            }

            // First failure aborts the whole run; completed steps stay in place
            if let Err(err) = self.execute_single_step(step, index) {
                debug!("Step #{} failed, aborting run", index + 1);
                return Err(err);
            }

            completed += 1;
            info!(
                "  \u{2713} {} \u{2192} {} ({})",
                step.source,
                step.dest,
                step.git_ref.as_deref().unwrap_or("default branch")
            );
        }

        info!("\n\u{2713} Completed {completed}/{total} fetch steps");

        Ok(RunReport { completed, total })
    }

    /// Preview the planned steps without executing them
    fn preview_steps(&self) -> Result<()> {
        info!("Dry run preview - no files will be fetched:");
        info!("");
        info!("Planned steps:");

        for (index, step) in self.manifest.steps.iter().enumerate() {
            if !step.enabled {
                info!("  [{}] (disabled) {}", index + 1, step.source);
                continue;
            }

            let repository = Repository::parse(&step.source)?;
            let dest_path = self.workdir.join(&step.dest);

            info!(
                "  [{}] {} \u{2192} {}",
                index + 1,
                step.source,
                dest_path.display()
            );
            info!("      - Clone URL: {}", repository.git_url());
            if let Some(reference) = step.git_ref.as_ref() {
                info!("      - Reference: {reference}");
            }
            if !step.sparse.is_empty() {
                info!("      - Sparse paths: {}", step.sparse.join(", "));
            }
        }

        info!("");
        info!("Run without --dry-run to execute these steps.");

        Ok(())
    }

    /// Execute a single fetch step
    fn execute_single_step(&self, step: &StepConfig, index: usize) -> Result<()> {
        debug!("Executing step #{}: {:?}", index + 1, step);

        let repository = Repository::parse(&step.source).context("Failed to parse source")?;
        let dest_path = self.workdir.join(&step.dest);

        self.check_destination(step, &dest_path)?;

        if let Some(parent) = dest_path.parent() {
            self.system.create_dir_all(parent).map_err(|e| {
                FetchError::filesystem(format!(
                    "Cannot create parent directories for '{}': {e}",
                    dest_path.display()
                ))
            })?;
        }

        info!(
            "  [{}] Fetching {} \u{2192} {}",
            index + 1,
            step.source,
            step.dest
        );

        if step.sparse.is_empty() {
            self.git
                .clone_repo(repository.git_url(), &dest_path)
                .map_err(|e| step_error(&step.dest, e))?;

            if let Some(reference) = step.git_ref.as_ref() {
                self.git
                    .checkout(&dest_path, reference)
                    .map_err(|e| step_error(&step.dest, e))?;
            }
        } else {
            // Fetch history without a working tree, then restrict the
            // checkout to the named paths at the requested ref
            self.git
                .clone_no_checkout(repository.git_url(), &dest_path)
                .map_err(|e| step_error(&step.dest, e))?;

            self.git
                .sparse_checkout(&dest_path, &step.sparse)
                .map_err(|e| step_error(&step.dest, e))?;

            let reference = step.git_ref.as_deref().unwrap_or("HEAD");
            self.git
                .checkout(&dest_path, reference)
                .map_err(|e| step_error(&step.dest, e))?;
        }

        Ok(())
    }

    /// Fail if the destination already exists and is non-empty
    fn check_destination(&self, step: &StepConfig, dest_path: &Path) -> Result<()> {
        if !self.system.exists(dest_path) {
            return Ok(());
        }

        if self.system.is_file(dest_path) {
            return Err(FetchError::destination_conflict(step.dest.clone()).into());
        }

        let entries = self.system.read_dir(dest_path).map_err(|e| {
            FetchError::filesystem(format!(
                "Cannot read destination '{}': {e}",
                dest_path.display()
            ))
        })?;

        if !entries.is_empty() {
            return Err(FetchError::destination_conflict(step.dest.clone()).into());
        }

        Ok(())
    }
}

/// Attach the offending step's destination to a backend failure
fn step_error(dest: &str, failure: GitFailure) -> anyhow::Error {
    match failure {
        GitFailure::Remote(message) => FetchError::remote_unreachable(dest, message).into(),
        GitFailure::RefMissing(message) => FetchError::ref_not_found(dest, message).into(),
        GitFailure::Other(message) => {
            anyhow::anyhow!("Git error for step '{dest}': {message}")
        }
    }
}
