//! Error handling for the release builder.
//!
//! Two types cooperate here, following the same split used across the
//! codebase's CLI surface:
//!
//! - [`BuilderError`] - strongly-typed failure cases for precise handling
//! - [`ErrorContext`] - wrapper that adds a user-facing suggestion and
//!   optional details for terminal display
//!
//! Fatal errors bubble up as `anyhow::Error` (usually wrapping a
//! [`BuilderError`]) and are rendered once, at the top of `main`, through
//! [`user_friendly_error`]. Degraded and per-file conditions never reach
//! this module; they are logged where they occur and the operation
//! continues.

use colored::Colorize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for release-builder operations.
///
/// Each variant represents a specific failure mode with enough context to
/// build an actionable message. Variants map onto the error taxonomy of the
/// build workflow: composer/manifest problems are structural (abort the
/// build), git and rsync problems carry the failing command's stderr, and
/// I/O problems keep the offending path.
#[derive(Error, Debug)]
pub enum BuilderError {
    /// No `composer.json` was found where one is required.
    #[error("composer.json not found in {}", path.display())]
    ComposerNotFound {
        /// Directory that was searched.
        path: PathBuf,
    },

    /// `composer.json` exists but could not be parsed as JSON.
    #[error("failed to parse {}: {reason}", path.display())]
    ComposerParseError {
        /// Path of the offending file.
        path: PathBuf,
        /// Parser message.
        reason: String,
    },

    /// `extra.shopware-plugin-class` is missing or empty, so the plugin
    /// name and namespace cannot be derived.
    #[error("composer.json does not declare extra.shopware-plugin-class")]
    PluginClassMissing,

    /// The configured foundation (donor) plugin path does not exist.
    #[error("foundation plugin path does not exist: {}", path.display())]
    FoundationPathNotFound {
        /// The path that was configured.
        path: PathBuf,
    },

    /// The git executable is not available on this system.
    #[error("git command not found")]
    GitNotFound,

    /// A git command exited unsuccessfully.
    #[error("git {operation} failed: {stderr}")]
    GitCommandError {
        /// Operation being performed (e.g. "commit", "push").
        operation: String,
        /// Captured stderr output.
        stderr: String,
    },

    /// The build was started outside of a git repository.
    #[error("{} is not a git repository", path.display())]
    NotAGitRepository {
        /// Directory that was checked.
        path: PathBuf,
    },

    /// The rsync executable is not available on this system.
    #[error("rsync command not found")]
    RsyncNotFound,

    /// The pandoc executable is not available on this system.
    #[error("pandoc command not found")]
    PandocNotFound,

    /// The rsync upload exited unsuccessfully.
    #[error("rsync failed: {stderr}")]
    RsyncFailed {
        /// Captured stderr output.
        stderr: String,
    },

    /// Compiled storefront/administration assets are older than their
    /// sources, so the package would ship stale JavaScript or CSS.
    #[error("compiled assets are outdated:\n{details}")]
    OutdatedAssets {
        /// One line per failed freshness check.
        details: String,
    },

    /// A filesystem operation failed with path context attached.
    #[error("{operation} failed for {}: {source}", path.display())]
    FileSystemError {
        /// Operation being performed (e.g. "copy", "create directory").
        operation: String,
        /// Path involved in the operation.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Generic I/O error without further context.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Version string could not be parsed as a semantic version.
    #[error("invalid version: {0}")]
    SemverError(#[from] semver::Error),
}

/// Error wrapper that carries a user-facing suggestion and details.
///
/// Produced by [`user_friendly_error`] right before process exit; `display`
/// writes a colored, multi-line report to stderr.
pub struct ErrorContext {
    /// The underlying error.
    pub error: anyhow::Error,
    /// A short, actionable suggestion shown to the user.
    pub suggestion: Option<String>,
    /// Longer background details, shown below the suggestion.
    pub details: Option<String>,
}

impl ErrorContext {
    /// Wrap an error without suggestion or details.
    pub fn new(error: impl Into<anyhow::Error>) -> Self {
        Self {
            error: error.into(),
            suggestion: None,
            details: None,
        }
    }

    /// Attach a suggestion line.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Attach a details paragraph.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error report to stderr with colors.
    pub fn display(&self) {
        eprintln!("{} {}", "error:".red().bold(), self.error);

        // Show the error chain beneath the headline, skipping the headline
        // itself.
        for cause in self.error.chain().skip(1) {
            eprintln!("  {} {}", "caused by:".yellow(), cause);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("\n{} {}", "suggestion:".green().bold(), suggestion);
        }

        if let Some(details) = &self.details {
            eprintln!("\n{details}");
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nsuggestion: {suggestion}")?;
        }
        Ok(())
    }
}

/// Convert any error into an [`ErrorContext`] with a matching suggestion.
///
/// Recognized [`BuilderError`] variants get targeted suggestions; anything
/// else passes through unchanged.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let suggestion = match error.downcast_ref::<BuilderError>() {
        Some(BuilderError::ComposerNotFound { .. }) => {
            Some("Run swrb from the plugin root directory (the one containing composer.json)")
        }
        Some(BuilderError::ComposerParseError { .. }) => {
            Some("Fix the JSON syntax in composer.json and retry")
        }
        Some(BuilderError::PluginClassMissing) => Some(
            "Add \"extra\": { \"shopware-plugin-class\": \"Vendor\\\\PluginName\\\\PluginName\" } to composer.json",
        ),
        Some(BuilderError::FoundationPathNotFound { .. }) => {
            Some("Check the FOUNDATION_PLUGIN_PATH environment variable")
        }
        Some(BuilderError::GitNotFound) => Some("Install git and make sure it is on your PATH"),
        Some(BuilderError::NotAGitRepository { .. }) => {
            Some("Initialize a repository with 'git init' or run from a checked-out plugin")
        }
        Some(BuilderError::RsyncNotFound) => {
            Some("Install rsync and make sure it is on your PATH, or pass --no-sync")
        }
        Some(BuilderError::PandocNotFound) => {
            Some("Install pandoc and a xelatex engine (e.g. texlive-xetex) for PDF manuals")
        }
        Some(BuilderError::OutdatedAssets { .. }) => Some(
            "Rebuild the plugin assets (e.g. bin/build-storefront.sh) or pass --skip-asset-check",
        ),
        _ => None,
    };

    let mut ctx = ErrorContext::new(error);
    if let Some(s) = suggestion {
        ctx = ctx.with_suggestion(s);
    }
    ctx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composer_not_found_has_suggestion() {
        let err = anyhow::Error::from(BuilderError::ComposerNotFound {
            path: PathBuf::from("/tmp/build"),
        });
        let ctx = user_friendly_error(err);
        assert!(ctx.suggestion.is_some());
        assert!(ctx.error.to_string().contains("composer.json"));
    }

    #[test]
    fn unknown_errors_pass_through_without_suggestion() {
        let ctx = user_friendly_error(anyhow::anyhow!("something else"));
        assert!(ctx.suggestion.is_none());
    }

    #[test]
    fn error_context_display_includes_suggestion() {
        let ctx = ErrorContext::new(anyhow::anyhow!("boom")).with_suggestion("try again");
        let rendered = format!("{ctx}");
        assert!(rendered.contains("boom"));
        assert!(rendered.contains("try again"));
    }
}
