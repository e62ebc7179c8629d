//! The `build` command: the full release workflow.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::io::IsTerminal;
use std::path::PathBuf;
use tempfile::TempDir;
use tracing::{debug, info, warn};

use crate::archive::create_archive;
use crate::composer::ComposerJson;
use crate::config::Settings;
use crate::core::BuilderError;
use crate::git;
use crate::injector::{self, InjectionOptions};
use crate::manual::copy_manuals;
use crate::notify::{ReleaseNotification, send_release_notification};
use crate::plugin::{build_directory_tree, stage_plugin_files, verify_compiled_assets};
use crate::release::{TableStyle, create_release_info};
use crate::remote::sync_to_remote;
use crate::utils::fs::{safe_write, sha256_file};
use crate::utils::progress::ProgressSpinner;
use crate::version::{VersionBump, bump_version, update_composer_version};

/// Build and package the plugin in the current (or given) directory.
#[derive(Args, Debug)]
pub struct BuildCommand {
    /// Plugin source directory.
    #[arg(long, default_value = ".")]
    pub source_dir: PathBuf,

    /// Directory the finished archive is written to.
    #[arg(short, long, default_value = "builds")]
    pub output_dir: PathBuf,

    /// Version increment to apply before building.
    #[arg(long, value_parser = ["none", "patch", "minor", "major"])]
    pub version_increment: Option<String>,

    /// Skip the compiled-asset freshness check.
    #[arg(long)]
    pub skip_asset_check: bool,

    /// Skip foundation injection even when the plugin depends on it.
    #[arg(long)]
    pub no_inject: bool,

    /// Do not upload the archive to the release server.
    #[arg(long)]
    pub no_sync: bool,

    /// Do not send a release notification.
    #[arg(long)]
    pub no_notify: bool,
}

impl BuildCommand {
    pub async fn execute(self, verbose: bool, quiet: bool) -> Result<()> {
        let settings = Settings::from_env();
        let source_dir = self
            .source_dir
            .canonicalize()
            .with_context(|| format!("Plugin directory not found: {}", self.source_dir.display()))?;

        let mut composer = ComposerJson::load(&source_dir)?;
        let info = composer.plugin_info()?;
        info!("building {} (current version {})", info.name, info.version);

        if !git::is_git_repository(&source_dir).await {
            return Err(BuilderError::NotAGitRepository { path: source_dir }.into());
        }

        // Version bump happens before anything else touches the tree so
        // the tag points at exactly what gets packaged.
        let version = match self.select_bump(&info.version, quiet)? {
            VersionBump::None => info.version.clone(),
            bump => {
                let new_version = bump_version(&info.version, bump)?;
                update_composer_version(&mut composer, &new_version)?;
                git::commit_and_tag(
                    &source_dir,
                    "composer.json",
                    &new_version,
                    &format!("Bump version to {new_version}"),
                )
                .await?;
                git::push_changes(&source_dir, &git::get_git_info(&source_dir).await?.branch, &new_version)
                    .await?;
                println!("{} {} -> {new_version}", "✓ Version bumped:".green(), info.version);
                new_version
            }
        };

        let git_info = git::get_git_info(&source_dir).await?;

        if self.skip_asset_check {
            warn!("asset freshness check skipped");
        } else {
            verify_compiled_assets(&source_dir)?;
        }

        // Stage a clean copy of the plugin tree.
        let spinner = ProgressSpinner::new("Staging plugin files");
        let staging = TempDir::new().context("Failed to create staging directory")?;
        let plugin_dir = stage_plugin_files(&source_dir, staging.path(), &info.name)?;
        spinner.finish_with_message(format!("Staged {}", info.name));

        if verbose {
            println!("{}", build_directory_tree(&plugin_dir, 3));
        }

        // Inject foundation code when the plugin depends on it. The staged
        // copy is patched; the source tree is never modified.
        if composer.has_foundation_dependency() && !self.no_inject {
            match &settings.foundation_plugin_path {
                Some(donor) => {
                    let spinner = ProgressSpinner::new("Injecting foundation code");
                    let report =
                        injector::inject(&plugin_dir, donor, &InjectionOptions::default())?;
                    spinner.finish_with_message("Foundation injection done");
                    report.print_summary();
                }
                None => {
                    println!(
                        "{} plugin requires the foundation but FOUNDATION_PLUGIN_PATH is not set; \
                         the archive will not be self-contained",
                        "warning:".yellow()
                    );
                }
            }
        }

        // Drop a release_info.txt into the staged tree before zipping.
        let release_info = create_release_info(
            &info.name,
            &git_info.branch,
            &git_info.commit,
            &version,
            TableStyle::Divided,
        );
        safe_write(&plugin_dir.join("release_info.txt"), &format!("{release_info}\n"))?;

        let archive_name = format!("{}-v{}.zip", info.name, version);
        let archive_path = self.output_dir.join(&archive_name);
        let spinner = ProgressSpinner::new("Creating archive");
        let entries = create_archive(staging.path(), &archive_path)?;
        spinner.finish_with_message(format!("Archived {entries} files"));
        let checksum = sha256_file(&archive_path)?;
        debug!("archive checksum {checksum}");

        if let Some(manuals_dir) = &settings.manuals_dir {
            let copied = copy_manuals(&source_dir, manuals_dir, &info.name, &version)?;
            if copied > 0 {
                println!("{} {copied} manual tree(s)", "✓ Manuals copied:".green());
            }
        }

        let mut download_url = None;
        if !self.no_sync {
            if let Some(rsync) = &settings.rsync {
                let spinner = ProgressSpinner::new("Uploading archive");
                let remote_path = sync_to_remote(&archive_path, rsync, &info.name).await?;
                spinner.finish_with_message(format!("Uploaded to {remote_path}"));
                download_url = settings
                    .release_dir
                    .as_ref()
                    .map(|base| format!("{}/{}/{archive_name}", base.trim_end_matches('/'), info.name));
            }
        }

        if !self.no_notify {
            if let Some(webhook) = &settings.slack_webhook_url {
                let notification = ReleaseNotification {
                    plugin_name: &info.name,
                    version: &version,
                    branch: &git_info.branch,
                    commit: &git_info.commit,
                    download_url: download_url.as_deref(),
                };
                if send_release_notification(webhook, &notification).await {
                    println!("{}", "✓ Release notification sent".green());
                }
            }
        }

        println!();
        println!("{}", release_info);
        println!();
        println!(
            "{} {}",
            "✓ Release built:".green().bold(),
            archive_path.display()
        );
        println!("  {checksum}");
        Ok(())
    }

    /// Decide the version bump: from the flag when given, interactively
    /// when on a terminal, otherwise no bump.
    fn select_bump(&self, current: &str, quiet: bool) -> Result<VersionBump> {
        if let Some(flag) = &self.version_increment {
            // The value parser restricts input to the known labels.
            return Ok(VersionBump::from_flag(flag).unwrap_or(VersionBump::None));
        }
        if quiet || !std::io::stdin().is_terminal() {
            debug!("non-interactive session, keeping version {current}");
            return Ok(VersionBump::None);
        }

        let items: Vec<String> = VersionBump::ALL
            .iter()
            .map(|bump| match bump {
                VersionBump::None => bump.to_string(),
                bump => match bump_version(current, *bump) {
                    Ok(next) => format!("{bump} ({current} -> {next})"),
                    Err(_) => bump.to_string(),
                },
            })
            .collect();
        let choice = dialoguer::Select::new()
            .with_prompt("Version increment")
            .items(&items)
            .default(0)
            .interact()
            .context("Failed to read version selection")?;
        Ok(VersionBump::ALL[choice])
    }
}
