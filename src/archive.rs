//! ZIP archive creation.
//!
//! The archive is built from the staging directory so its single top-level
//! entry is the plugin directory itself (`MyPlugin/composer.json`, ...),
//! which is the layout the Shopware administration expects when a plugin
//! ZIP is uploaded.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;
use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

use crate::utils::fs::ensure_dir;

/// Create a ZIP archive of everything under `staging_dir` at
/// `archive_path`. Returns the number of file entries written.
pub fn create_archive(staging_dir: &Path, archive_path: &Path) -> Result<usize> {
    if let Some(parent) = archive_path.parent() {
        ensure_dir(parent)?;
    }
    let file = File::create(archive_path)
        .with_context(|| format!("Failed to create archive {}", archive_path.display()))?;
    let mut zip = zip::ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut entries = 0;
    for entry in WalkDir::new(staging_dir).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(staging_dir)
            .expect("walked path is under staging dir");
        // ZIP entry names always use forward slashes.
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        if entry.file_type().is_dir() {
            zip.add_directory(format!("{name}/"), options)?;
        } else if entry.file_type().is_file() {
            zip.start_file(name, options)?;
            let mut content = Vec::new();
            File::open(entry.path())
                .with_context(|| format!("Failed to open {}", entry.path().display()))?
                .read_to_end(&mut content)?;
            zip.write_all(&content)?;
            entries += 1;
        }
    }

    zip.finish().context("Failed to finalize archive")?;
    debug!("wrote {entries} files to {}", archive_path.display());
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn archive_round_trips_staged_tree() {
        let temp = tempdir().unwrap();
        let staging = temp.path().join("staging");
        let plugin = staging.join("MyPlugin");
        fs::create_dir_all(plugin.join("src")).unwrap();
        fs::write(plugin.join("composer.json"), "{}").unwrap();
        fs::write(plugin.join("src/MyPlugin.php"), "<?php\n").unwrap();

        let archive_path = temp.path().join("builds/MyPlugin-v1.0.0.zip");
        let entries = create_archive(&staging, &archive_path).unwrap();
        assert_eq!(entries, 2);

        let mut archive = zip::ZipArchive::new(File::open(&archive_path).unwrap()).unwrap();
        let mut composer = String::new();
        archive
            .by_name("MyPlugin/composer.json")
            .unwrap()
            .read_to_string(&mut composer)
            .unwrap();
        assert_eq!(composer, "{}");
        assert!(archive.by_name("MyPlugin/src/MyPlugin.php").is_ok());
    }
}
