//! Fluent builder for executing git commands.
//!
//! The builder wraps `tokio::process::Command`, captures output, and turns
//! non-zero exits into [`BuilderError::GitCommandError`] with the stderr
//! attached, so callers get a useful message instead of a bare status code.

use crate::core::BuilderError;
use anyhow::Result;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::debug;

/// Builder for a single git invocation.
pub struct GitCommand {
    args: Vec<String>,
    current_dir: Option<PathBuf>,
}

impl GitCommand {
    /// Start building a git command with the given arguments.
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            current_dir: None,
        }
    }

    /// Run the command inside `dir` instead of the process working
    /// directory.
    #[must_use]
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Execute the command and return trimmed stdout.
    ///
    /// # Errors
    ///
    /// [`BuilderError::GitNotFound`] when git cannot be spawned,
    /// [`BuilderError::GitCommandError`] on a non-zero exit.
    pub async fn execute(self) -> Result<String> {
        let operation = self.args.first().cloned().unwrap_or_default();
        debug!("running git {}", self.args.join(" "));

        let mut command = Command::new("git");
        command.args(&self.args);
        if let Some(dir) = &self.current_dir {
            command.current_dir(dir);
        }

        let output = command.output().await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                anyhow::Error::from(BuilderError::GitNotFound)
            } else {
                anyhow::Error::from(e)
            }
        })?;

        if !output.status.success() {
            return Err(BuilderError::GitCommandError {
                operation,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}
