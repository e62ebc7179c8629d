//! Environment-driven configuration.
//!
//! The builder is configured entirely through environment variables so it
//! slots into shell profiles and CI secrets without a config file:
//!
//! - `FOUNDATION_PLUGIN_PATH` - donor tree for foundation injection
//! - `RSYNC_SSH_HOST`, `RSYNC_SSH_PORT`, `RSYNC_REMOTE_PATH_RELEASES_FOLDER`
//!   - upload destination for built archives
//! - `MANUALS_DIR` - where per-language manuals get copied
//! - `RELEASE_DIR` - public base URL/path used in release notifications
//! - `SLACK_WEBHOOK_URL` - release announcement webhook
//!
//! Everything is optional; features silently disable when their settings
//! are absent. Paths support `~` expansion.

use std::path::PathBuf;

/// Remote upload settings, present only when both a host and a base path
/// are configured.
#[derive(Debug, Clone)]
pub struct RsyncSettings {
    /// SSH host (optionally `user@host`).
    pub host: String,
    /// SSH port, defaulting to 22.
    pub port: String,
    /// Base directory for releases on the remote, with a trailing slash.
    pub releases_folder: String,
}

impl RsyncSettings {
    /// The remote directory for a plugin's archives, in `host:path/` form.
    pub fn remote_dir(&self, plugin_name: &str) -> String {
        format!("{}:{}{}/", self.host, self.releases_folder, plugin_name)
    }
}

/// All settings resolved from the environment.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    /// Donor tree for foundation injection.
    pub foundation_plugin_path: Option<PathBuf>,
    /// Base directory for copied manuals.
    pub manuals_dir: Option<PathBuf>,
    /// Public location of published releases, used for download links.
    pub release_dir: Option<String>,
    /// Slack webhook for release announcements.
    pub slack_webhook_url: Option<String>,
    /// Remote upload settings.
    pub rsync: Option<RsyncSettings>,
}

impl Settings {
    /// Resolve settings from the process environment.
    pub fn from_env() -> Self {
        let rsync = match (
            env_nonempty("RSYNC_SSH_HOST"),
            env_nonempty("RSYNC_REMOTE_PATH_RELEASES_FOLDER"),
        ) {
            (Some(host), Some(base)) => Some(RsyncSettings {
                host,
                port: env_nonempty("RSYNC_SSH_PORT").unwrap_or_else(|| "22".to_string()),
                releases_folder: format!("{}/", base.trim_end_matches('/')),
            }),
            _ => None,
        };

        Self {
            foundation_plugin_path: env_path("FOUNDATION_PLUGIN_PATH"),
            manuals_dir: env_path("MANUALS_DIR"),
            release_dir: env_nonempty("RELEASE_DIR"),
            slack_webhook_url: env_nonempty("SLACK_WEBHOOK_URL"),
            rsync,
        }
    }
}

fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_path(key: &str) -> Option<PathBuf> {
    env_nonempty(key).map(|v| PathBuf::from(shellexpand::tilde(&v).into_owned()))
}
