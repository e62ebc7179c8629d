//! File system helpers used throughout the build pipeline.
//!
//! All writes of generated content go through [`safe_write`], which writes
//! to a sibling temporary file and renames it into place so a crashed build
//! never leaves a half-written `composer.json` or `services.xml` behind.

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

/// Ensure a directory exists, creating it and all parents if necessary.
///
/// Returns an error if the path exists but is not a directory.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;
    } else if !path.is_dir() {
        anyhow::bail!("Path exists but is not a directory: {}", path.display());
    }
    Ok(())
}

/// Write a string to a file atomically (temp file + rename).
pub fn safe_write(path: &Path, content: &str) -> Result<()> {
    atomic_write(path, content.as_bytes())
}

/// Write bytes to a file atomically (temp file + rename).
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    ensure_dir(parent)?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent)
        .with_context(|| format!("Failed to create temporary file in {}", parent.display()))?;
    std::io::Write::write_all(&mut tmp, content)
        .with_context(|| format!("Failed to write temporary file for {}", path.display()))?;
    tmp.persist(path)
        .with_context(|| format!("Failed to persist {}", path.display()))?;
    Ok(())
}

/// Read a file to a string with path context attached to failures.
pub fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Compute the SHA-256 digest of a file, hex-encoded with a `sha256:`
/// prefix.
pub fn sha256_file(path: &Path) -> Result<String> {
    let content = fs::read(path)
        .with_context(|| format!("Cannot read file for checksum calculation: {}", path.display()))?;
    let mut hasher = Sha256::new();
    hasher.update(&content);
    Ok(format!("sha256:{}", hex::encode(hasher.finalize())))
}
