//! Remote synchronization of built archives.
//!
//! Uploads go through the system `rsync` over ssh, mirroring how the
//! release servers are provisioned. The remote directory is created on
//! the fly via `--rsync-path`, so a plugin's first release needs no
//! manual setup on the server.

use anyhow::Result;
use std::path::Path;
use tokio::process::Command;
use tracing::debug;

use crate::config::RsyncSettings;
use crate::core::BuilderError;

/// Upload `archive_path` into the plugin's release directory on the
/// remote. Returns the full remote path of the uploaded file.
pub async fn sync_to_remote(
    archive_path: &Path,
    settings: &RsyncSettings,
    plugin_name: &str,
) -> Result<String> {
    if which::which("rsync").is_err() {
        return Err(BuilderError::RsyncNotFound.into());
    }

    let remote_dir = settings.remote_dir(plugin_name);
    let remote_base = remote_dir
        .split_once(':')
        .map_or(remote_dir.as_str(), |(_, path)| path);
    let file_name = archive_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let remote_path = format!("{remote_dir}{file_name}");

    let mut command = Command::new("rsync");
    command
        .arg("-av")
        .arg("--progress")
        .arg("-e")
        .arg(format!("ssh -p {}", settings.port))
        // Create the destination directory before transferring.
        .arg("--rsync-path")
        .arg(format!("mkdir -p {remote_base} && rsync"))
        .arg(archive_path)
        .arg(&remote_path);

    debug!("running rsync to {remote_path}");
    let output = command.output().await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            anyhow::Error::from(BuilderError::RsyncNotFound)
        } else {
            anyhow::Error::from(e)
        }
    })?;

    if !output.status.success() {
        return Err(BuilderError::RsyncFailed {
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
        .into());
    }

    Ok(remote_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_path_is_composed_from_settings() {
        let settings = RsyncSettings {
            host: "deploy@releases.example.com".to_string(),
            port: "2222".to_string(),
            releases_folder: "/var/www/releases/".to_string(),
        };
        assert_eq!(
            settings.remote_dir("MyPlugin"),
            "deploy@releases.example.com:/var/www/releases/MyPlugin/"
        );
    }
}
