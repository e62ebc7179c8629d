//! Git operations for the release workflow.
//!
//! Uses the system `git` binary through [`GitCommand`] rather than an
//! embedded library - the release builder runs where developers already
//! have git configured, and shelling out inherits their authentication
//! and hooks for free.

pub mod command_builder;

use anyhow::Result;
use std::path::Path;

pub use command_builder::GitCommand;

/// Current branch and commit of a repository.
#[derive(Debug, Clone)]
pub struct GitInfo {
    /// Abbreviated branch name (e.g. `main`).
    pub branch: String,
    /// Full commit hash of `HEAD`.
    pub commit: String,
}

/// Whether `dir` is inside a git work tree.
pub async fn is_git_repository(dir: &Path) -> bool {
    GitCommand::new(["rev-parse", "--is-inside-work-tree"])
        .current_dir(dir)
        .execute()
        .await
        .map(|out| out == "true")
        .unwrap_or(false)
}

/// Read the current branch and commit.
pub async fn get_git_info(dir: &Path) -> Result<GitInfo> {
    let branch = GitCommand::new(["rev-parse", "--abbrev-ref", "HEAD"])
        .current_dir(dir)
        .execute()
        .await?;
    let commit = GitCommand::new(["rev-parse", "HEAD"])
        .current_dir(dir)
        .execute()
        .await?;
    Ok(GitInfo { branch, commit })
}

/// Stage `file`, commit with `message`, and tag the commit `v<version>`.
pub async fn commit_and_tag(dir: &Path, file: &str, version: &str, message: &str) -> Result<()> {
    GitCommand::new(["add", file]).current_dir(dir).execute().await?;
    GitCommand::new(["commit", "-m", message])
        .current_dir(dir)
        .execute()
        .await?;
    let tag = format!("v{}", version.trim_start_matches('v'));
    GitCommand::new(["tag", &tag]).current_dir(dir).execute().await?;
    Ok(())
}

/// Push the branch and the release tag to `origin`.
pub async fn push_changes(dir: &Path, branch: &str, version: &str) -> Result<()> {
    GitCommand::new(["push", "origin", branch])
        .current_dir(dir)
        .execute()
        .await?;
    let tag = format!("v{}", version.trim_start_matches('v'));
    GitCommand::new(["push", "origin", &tag])
        .current_dir(dir)
        .execute()
        .await?;
    Ok(())
}

/// Pull the current branch (used before a release to avoid tagging a
/// stale checkout).
pub async fn pull_changes(dir: &Path) -> Result<String> {
    GitCommand::new(["pull"]).current_dir(dir).execute().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn non_repo_is_detected() {
        let temp = tempfile::tempdir().unwrap();
        assert!(!is_git_repository(temp.path()).await);
    }
}
