//! Build staging: assembling a clean copy of the plugin tree.
//!
//! A release archive must not contain development clutter (VCS metadata,
//! build output, editor state, test suites), so the plugin is copied into
//! a temporary directory through an ignore filter before zipping. The
//! filter combines a built-in pattern list with per-plugin additions read
//! from a `.sw-zip-blacklist` file in the plugin root.
//!
//! This module also verifies that compiled storefront/administration
//! assets are at least as new as their sources - shipping a package whose
//! `public/` JavaScript predates the `app/` sources it was built from is
//! the most common release mistake this tool guards against.

use anyhow::{Context, Result};
use glob::Pattern;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::core::BuilderError;
use crate::utils::fs::ensure_dir;

/// File name of the per-plugin exclusion list.
pub const BLACKLIST_FILE: &str = ".sw-zip-blacklist";

/// Patterns excluded from every build, matched against individual path
/// components (file and directory names).
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[
    ".git*",
    "builds",
    "node_modules",
    "tests",
    ".idea",
    ".vscode",
    "*.zip",
    "php-cs-fixer.*",
    ".php-cs-fixer.*",
    "phpstan.*",
    "rector.*",
    "bitbucket-pipelines.yml",
    BLACKLIST_FILE,
];

/// The ignore filter applied while staging.
pub struct IgnoreFilter {
    patterns: Vec<Pattern>,
}

impl IgnoreFilter {
    /// Build the filter from the default patterns plus any entries in the
    /// plugin's `.sw-zip-blacklist` (one glob per line, `#` comments).
    pub fn for_plugin(source_dir: &Path) -> Result<Self> {
        let mut raw: Vec<String> =
            DEFAULT_IGNORE_PATTERNS.iter().map(ToString::to_string).collect();

        let blacklist = source_dir.join(BLACKLIST_FILE);
        if blacklist.is_file() {
            let content = std::fs::read_to_string(&blacklist)
                .with_context(|| format!("Failed to read {}", blacklist.display()))?;
            let mut added = 0;
            for line in content.lines() {
                let line = line.trim();
                if !line.is_empty() && !line.starts_with('#') {
                    raw.push(line.to_string());
                    added += 1;
                }
            }
            debug!("added {added} patterns from {}", blacklist.display());
        }

        let patterns = raw
            .iter()
            .map(|p| Pattern::new(p).with_context(|| format!("Invalid ignore pattern: {p}")))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// Whether a path component should be excluded.
    pub fn is_ignored(&self, name: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(name))
    }
}

/// Copy the plugin into `<staging_dir>/<plugin_name>/`, applying the
/// ignore filter. Returns the created plugin directory.
pub fn stage_plugin_files(
    source_dir: &Path,
    staging_dir: &Path,
    plugin_name: &str,
) -> Result<PathBuf> {
    let filter = IgnoreFilter::for_plugin(source_dir)?;
    let plugin_dir = staging_dir.join(plugin_name);
    ensure_dir(&plugin_dir)?;

    let walker = WalkDir::new(source_dir).min_depth(1).into_iter();
    for entry in walker.filter_entry(|e| {
        e.file_name()
            .to_str()
            .is_none_or(|name| !filter.is_ignored(name))
    }) {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(source_dir)
            .expect("walked path is under source_dir");
        let dest = plugin_dir.join(relative);

        if entry.file_type().is_dir() {
            ensure_dir(&dest)?;
        } else if entry.file_type().is_file() {
            if let Some(parent) = dest.parent() {
                ensure_dir(parent)?;
            }
            std::fs::copy(entry.path(), &dest).map_err(|source| BuilderError::FileSystemError {
                operation: "copy".to_string(),
                path: entry.path().to_path_buf(),
                source,
            })?;
        }
        // Symlinks and other special files are skipped on purpose: they
        // have no meaningful representation inside the ZIP.
    }

    Ok(plugin_dir)
}

/// One freshness check: a source tree whose newest file must not be newer
/// than the newest file of the matching dist tree.
struct AssetCheck {
    label: &'static str,
    src_path: &'static str,
    dist_path: &'static str,
    src_ext: &'static [&'static str],
    dist_ext: &'static [&'static str],
}

const ASSET_CHECKS: &[AssetCheck] = &[
    AssetCheck {
        label: "Administration JS",
        src_path: "src/Resources/app/administration/src",
        dist_path: "src/Resources/public/administration/js",
        src_ext: &["ts", "js"],
        dist_ext: &["js"],
    },
    AssetCheck {
        label: "Storefront JS",
        src_path: "src/Resources/app/storefront/src",
        dist_path: "src/Resources/public/storefront/js",
        src_ext: &["ts", "js"],
        dist_ext: &["js"],
    },
    AssetCheck {
        label: "Storefront CSS",
        src_path: "src/Resources/app/storefront/src",
        dist_path: "src/Resources/public/storefront/css",
        src_ext: &["scss", "css"],
        dist_ext: &["css"],
    },
];

/// Verify that compiled assets are up to date.
///
/// Checks are skipped when the source tree does not exist (the plugin
/// simply has no such assets). Returns
/// [`BuilderError::OutdatedAssets`] listing every failed check.
pub fn verify_compiled_assets(source_dir: &Path) -> Result<()> {
    let mut failures = Vec::new();

    for check in ASSET_CHECKS {
        let src_root = source_dir.join(check.src_path);
        if !src_root.exists() {
            continue;
        }
        let (src_time, src_count) = newest_mtime(&src_root, check.src_ext);
        let (dist_time, dist_count) = newest_mtime(&source_dir.join(check.dist_path), check.dist_ext);

        if src_count > 0 && dist_count > 0 && src_time > dist_time {
            failures.push(format!(
                "{}: sources are newer than compiled output",
                check.label
            ));
        }
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(BuilderError::OutdatedAssets {
            details: failures.join("\n"),
        }
        .into())
    }
}

/// Newest modification time among files with one of `extensions` under
/// `root`, plus the number of matching files. A missing directory counts
/// as zero files.
fn newest_mtime(root: &Path, extensions: &[&str]) -> (SystemTime, usize) {
    let mut newest = SystemTime::UNIX_EPOCH;
    let mut count = 0;
    if !root.exists() {
        return (newest, count);
    }
    for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        let matches = entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| extensions.contains(&ext));
        if !matches {
            continue;
        }
        count += 1;
        match entry.metadata().map_err(std::io::Error::from).and_then(|m| m.modified()) {
            Ok(mtime) => {
                if mtime > newest {
                    newest = mtime;
                }
            }
            Err(e) => warn!("cannot stat {}: {e}", entry.path().display()),
        }
    }
    (newest, count)
}

/// Render an ASCII tree of a directory, for verbose build output.
pub fn build_directory_tree(root: &Path, max_depth: usize) -> String {
    let mut out = format!("{}/\n", root.file_name().unwrap_or_default().to_string_lossy());
    render_tree(root, "", max_depth, &mut out);
    out
}

fn render_tree(dir: &Path, prefix: &str, depth_left: usize, out: &mut String) {
    if depth_left == 0 {
        return;
    }
    let mut entries: Vec<_> = match std::fs::read_dir(dir) {
        Ok(entries) => entries.filter_map(|e| e.ok()).collect(),
        Err(_) => return,
    };
    entries.sort_by_key(|e| {
        (
            e.file_type().map(|t| t.is_file()).unwrap_or(true),
            e.file_name().to_ascii_lowercase(),
        )
    });

    let last = entries.len().saturating_sub(1);
    for (index, entry) in entries.iter().enumerate() {
        let connector = if index == last { "└── " } else { "├── " };
        let child_prefix = if index == last { "    " } else { "│   " };
        out.push_str(&format!(
            "{prefix}{connector}{}\n",
            entry.file_name().to_string_lossy()
        ));
        if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
            render_tree(
                &entry.path(),
                &format!("{prefix}{child_prefix}"),
                depth_left - 1,
                out,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "x").unwrap();
    }

    #[test]
    fn staging_applies_default_ignores() {
        let temp = tempdir().unwrap();
        let source = temp.path().join("plugin");
        touch(&source, "composer.json");
        touch(&source, "src/MyPlugin.php");
        touch(&source, ".git/config");
        touch(&source, "node_modules/pkg/index.js");
        touch(&source, "tests/SomeTest.php");

        let staging = temp.path().join("staging");
        fs::create_dir_all(&staging).unwrap();
        let plugin_dir = stage_plugin_files(&source, &staging, "MyPlugin").unwrap();

        assert!(plugin_dir.join("composer.json").is_file());
        assert!(plugin_dir.join("src/MyPlugin.php").is_file());
        assert!(!plugin_dir.join(".git").exists());
        assert!(!plugin_dir.join("node_modules").exists());
        assert!(!plugin_dir.join("tests").exists());
    }

    #[test]
    fn staging_honors_blacklist_file() {
        let temp = tempdir().unwrap();
        let source = temp.path().join("plugin");
        touch(&source, "composer.json");
        touch(&source, "docs/internal.md");
        touch(&source, "src/Keep.php");
        fs::write(
            source.join(BLACKLIST_FILE),
            "# internal docs never ship\ndocs\n",
        )
        .unwrap();

        let staging = temp.path().join("staging");
        fs::create_dir_all(&staging).unwrap();
        let plugin_dir = stage_plugin_files(&source, &staging, "MyPlugin").unwrap();

        assert!(!plugin_dir.join("docs").exists());
        assert!(plugin_dir.join("src/Keep.php").is_file());
        // The blacklist file itself never ships either.
        assert!(!plugin_dir.join(BLACKLIST_FILE).exists());
    }

    #[test]
    fn asset_check_passes_without_asset_dirs() {
        let temp = tempdir().unwrap();
        touch(temp.path(), "composer.json");
        verify_compiled_assets(temp.path()).unwrap();
    }

    #[test]
    fn asset_check_fails_for_stale_dist() {
        let temp = tempdir().unwrap();
        touch(temp.path(), "src/Resources/public/storefront/js/plugin.js");
        // Make the compiled file clearly older than the source.
        let old = filetime_set_past(&temp.path().join("src/Resources/public/storefront/js/plugin.js"));
        touch(temp.path(), "src/Resources/app/storefront/src/plugin.ts");

        if old {
            let err = verify_compiled_assets(temp.path()).unwrap_err();
            let builder_err = err.downcast_ref::<BuilderError>().unwrap();
            assert!(matches!(builder_err, BuilderError::OutdatedAssets { .. }));
        }
    }

    // Best-effort mtime rewind; returns false when the platform refuses,
    // in which case the assertion is skipped rather than made flaky.
    fn filetime_set_past(path: &Path) -> bool {
        let past = std::time::SystemTime::now() - std::time::Duration::from_secs(3600);
        std::fs::File::options()
            .write(true)
            .open(path)
            .and_then(|f| f.set_modified(past))
            .is_ok()
    }

    #[test]
    fn tree_rendering_is_sorted_and_bounded() {
        let temp = tempdir().unwrap();
        touch(temp.path(), "b.txt");
        touch(temp.path(), "a/deep/nested.txt");
        let tree = build_directory_tree(temp.path(), 2);
        assert!(tree.contains("├── a") || tree.contains("└── a"));
        assert!(tree.contains("b.txt"));
        // Depth 2 stops before nested.txt.
        assert!(!tree.contains("nested.txt"));
    }
}
