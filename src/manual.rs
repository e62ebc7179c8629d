//! Manual/documentation copying.
//!
//! Plugins may ship a `manual/<language>/` tree; on release those trees
//! are mirrored into a central manuals directory, versioned per plugin:
//! `<MANUALS_DIR>/<language>/<plugin>/<version>/`.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::utils::fs::ensure_dir;

/// Copy the plugin's `manual/` directory into the manuals store. Returns
/// the number of language trees copied; a plugin without manuals is a
/// no-op, not an error.
pub fn copy_manuals(
    source_dir: &Path,
    manuals_dir: &Path,
    plugin_name: &str,
    version: &str,
) -> Result<usize> {
    let manual_root = source_dir.join("manual");
    if !manual_root.is_dir() {
        debug!("no manual directory in {}, skipping", source_dir.display());
        return Ok(0);
    }

    let mut copied = 0;
    for entry in std::fs::read_dir(&manual_root)
        .with_context(|| format!("Failed to list {}", manual_root.display()))?
    {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let language = entry.file_name();
        let dest_root = manuals_dir
            .join(&language)
            .join(plugin_name)
            .join(version.trim_start_matches('v'));
        copy_tree(&entry.path(), &dest_root)?;
        info!(
            "copied {} manual to {}",
            language.to_string_lossy(),
            dest_root.display()
        );
        copied += 1;
    }
    Ok(copied)
}

fn copy_tree(source: &Path, dest: &Path) -> Result<()> {
    ensure_dir(dest)?;
    for entry in WalkDir::new(source).min_depth(1) {
        let entry = entry?;
        let relative = entry.path().strip_prefix(source).expect("under source");
        let target = dest.join(relative);
        if entry.file_type().is_dir() {
            ensure_dir(&target)?;
        } else if entry.file_type().is_file() {
            if let Some(parent) = target.parent() {
                ensure_dir(parent)?;
            }
            std::fs::copy(entry.path(), &target)
                .with_context(|| format!("Failed to copy {}", entry.path().display()))?;
        }
    }
    Ok(())
}
