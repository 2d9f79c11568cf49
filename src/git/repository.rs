//! Clone source handling and URL normalization

use crate::error::FetchError;
use anyhow::Result;

/// A clone source with its normalized git URL
#[derive(Debug, Clone)]
pub struct Repository {
    original: String,
    git_url: String,
}

impl Repository {
    /// Parse a source string into a repository
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The source string is not a recognized URL or shorthand format
    #[inline]
    pub fn parse(url: &str) -> Result<Self> {
        let git_url = normalize_source_url(url)?;
        return Ok(Self {
            original: url.to_owned(),
            git_url,
        });
    }

    /// Get the normalized URL for git operations
    #[must_use]
    pub fn git_url(&self) -> &str {
        &self.git_url
    }

    /// Get the original source string as provided
    #[must_use]
    pub fn original_url(&self) -> &str {
        &self.original
    }
}

/// Normalize a source string to a format suitable for git clone
fn normalize_source_url(url: &str) -> Result<String> {
    if url.starts_with("https://") || url.starts_with("http://") {
        // Full HTTP/HTTPS URL
        if url.ends_with(".git") {
            return Ok(url.to_owned());
        } else {
            return Ok(format!("{url}.git"));
        }
    } else if url.starts_with("git@") {
        // SSH URL - use as-is
        return Ok(url.to_owned());
    } else if url.starts_with("file:") || url.starts_with('/') {
        // Local clone source - git handles these natively
        return Ok(url.to_owned());
    } else if url.contains('/') && !url.contains(':') {
        // Short format: myorg/repo -> https://github.com/myorg/repo.git
        if url.matches('/').count() == 1 {
            return Ok(format!("https://github.com/{url}.git"));
        } else {
            return Err(FetchError::configuration(format!(
                "Invalid source format: '{url}'. Expected format: 'org/repo'"
            ))
            .into());
        }
    } else {
        return Err(FetchError::configuration(format!(
            "Unsupported source format: '{url}'\n\
            Supported formats:\n\
            - Short: myorg/repo\n\
            - HTTPS: https://github.com/myorg/repo.git\n\
            - SSH: git@github.com:myorg/repo.git\n\
            - Local: file:///path/to/repo or /path/to/repo"
        ))
        .into());
    }
}
