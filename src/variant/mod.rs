//! Plugin variant creation.
//!
//! A variant is the same plugin under a different identity: a prefix
//! and/or suffix folded into the name (`TopdataDemoSW6` with prefix
//! `Free` becomes `FreeTopdataDemoSW6`), with every derived spelling
//! following along - the namespace and plugin FQCN, the Composer package
//! name and labels, the main class file, compiled storefront asset paths,
//! and finally the plugin directory itself. Used to cut a free or
//! white-label edition from one codebase without maintaining a fork.
//!
//! The transform works on the directory in place and renames it at the
//! end; run it on a staged copy, not on a source checkout.

use anyhow::{Context, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::composer::ComposerJson;
use crate::utils::string_case::camel_to_kebab_for_js_asset;

/// File extensions included in the global identity rewrite.
const REWRITE_EXTENSIONS: &[&str] = &["php", "xml", "js", "twig", "json", "yml", "yaml", "md"];

/// Storefront JS output location inside a plugin tree, relative to the
/// plugin root; webpack names the directory and bundle after the
/// kebab-cased plugin name.
const JS_DIST_DIR: &str = "src/Resources/app/storefront/dist/storefront/js";

/// The complete name mapping of one variant transform.
#[derive(Debug, Clone)]
pub struct VariantIdentity {
    /// Original plugin name (e.g. `TopdataDemoSW6`).
    pub original_name: String,
    /// Variant plugin name (e.g. `FreeTopdataDemoSW6`).
    pub new_name: String,
    /// Original namespace root (e.g. `Topdata\TopdataDemoSW6`).
    pub original_namespace: String,
    /// Variant namespace root (e.g. `Topdata\FreeTopdataDemoSW6`).
    pub new_namespace: String,
    /// Variant plugin class FQCN.
    pub new_fqcn: String,
    /// Prefix folded into the name, possibly empty.
    pub prefix: String,
    /// Suffix folded into the name, possibly empty.
    pub suffix: String,
}

impl VariantIdentity {
    /// Derive the full mapping from the original identity and the
    /// prefix/suffix to fold in.
    pub fn derive(
        original_name: &str,
        original_namespace: &str,
        prefix: &str,
        suffix: &str,
    ) -> Self {
        let new_name = format!("{prefix}{original_name}{suffix}");
        let new_namespace = match original_namespace.rsplit_once('\\') {
            Some((vendor, _)) => format!("{vendor}\\{new_name}"),
            None => new_name.clone(),
        };
        Self {
            original_name: original_name.to_string(),
            new_name: new_name.clone(),
            original_namespace: original_namespace.to_string(),
            new_namespace: new_namespace.clone(),
            new_fqcn: format!("{new_namespace}\\{new_name}"),
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
        }
    }

    /// Vendor segment of the namespace in path spelling
    /// (`Topdata\X` yields `Topdata`), used for `Vendor/Plugin` path
    /// references in comments and configs.
    fn vendor_path(&self) -> Option<&str> {
        self.original_namespace
            .rsplit_once('\\')
            .map(|(vendor, _)| vendor)
    }
}

/// Outcome summary of one variant transform.
#[derive(Debug)]
pub struct VariantReport {
    /// The variant's plugin name.
    pub new_name: String,
    /// The renamed plugin directory.
    pub plugin_dir: PathBuf,
    /// Files changed by the global identity rewrite.
    pub files_rewritten: usize,
    /// Non-fatal problems (missing asset directories and the like).
    pub warnings: Vec<String>,
}

/// Transform the plugin in `plugin_dir` into a variant named with
/// `prefix` and/or `suffix`. The directory is modified in place and
/// renamed; the returned report carries its new location.
///
/// # Errors
///
/// Fatal when both prefix and suffix are empty, when `composer.json` is
/// missing or lacks a plugin class, or when a rename fails. Per-file
/// rewrite problems are skipped.
pub fn transform_to_variant(
    plugin_dir: &Path,
    prefix: &str,
    suffix: &str,
) -> Result<VariantReport> {
    if prefix.is_empty() && suffix.is_empty() {
        anyhow::bail!("a variant needs a prefix or a suffix");
    }

    let mut composer = ComposerJson::load(plugin_dir)?;
    let original_name = composer.plugin_info()?.name;
    let original_namespace = composer.root_namespace()?;
    let identity = VariantIdentity::derive(&original_name, &original_namespace, prefix, suffix);
    info!(
        "transforming {} -> {} ({} -> {})",
        identity.original_name, identity.new_name, identity.original_namespace, identity.new_namespace
    );

    composer.apply_variant_identity(&identity);
    composer.save()?;

    rename_main_class_file(plugin_dir, &identity)?;

    let mut report = VariantReport {
        new_name: identity.new_name.clone(),
        plugin_dir: plugin_dir.to_path_buf(),
        files_rewritten: rewrite_identity_in_dir(plugin_dir, &identity)?,
        warnings: Vec::new(),
    };

    rename_storefront_assets(plugin_dir, &identity, &mut report.warnings)?;

    // The directory rename comes last so every earlier step works with
    // stable paths.
    let renamed = plugin_dir
        .parent()
        .map(|parent| parent.join(&identity.new_name))
        .filter(|target| target != plugin_dir);
    if let Some(target) = renamed {
        std::fs::rename(plugin_dir, &target).with_context(|| {
            format!("Failed to rename {} to {}", plugin_dir.display(), target.display())
        })?;
        report.plugin_dir = target;
    }

    Ok(report)
}

/// Rename `src/<Original>.php` to `src/<New>.php`. A missing file is not
/// an error; headless plugins keep their class elsewhere.
fn rename_main_class_file(plugin_dir: &Path, identity: &VariantIdentity) -> Result<()> {
    let original = plugin_dir.join("src").join(format!("{}.php", identity.original_name));
    if !original.is_file() {
        return Ok(());
    }
    let target = plugin_dir.join("src").join(format!("{}.php", identity.new_name));
    std::fs::rename(&original, &target)
        .with_context(|| format!("Failed to rename {}", original.display()))?;
    debug!("renamed {} -> {}", original.display(), target.display());
    Ok(())
}

/// Replace every spelling of the old identity across text files: the
/// namespace, the bare plugin name (word-bounded), and `Vendor/Name` path
/// references. Returns the number of files changed.
fn rewrite_identity_in_dir(root: &Path, identity: &VariantIdentity) -> Result<usize> {
    let name_pattern = Regex::new(&format!(
        r"\b{}\b",
        regex::escape(&identity.original_name)
    ))
    .context("plugin name is not a valid pattern")?;
    let path_spelling = identity
        .vendor_path()
        .map(|vendor| {
            (
                format!("{vendor}/{}", identity.original_name),
                format!("{vendor}/{}", identity.new_name),
            )
        });

    let mut rewritten = 0;
    for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        let eligible = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| REWRITE_EXTENSIONS.contains(&ext.to_lowercase().as_str()));
        if !eligible {
            continue;
        }
        // Binary or non-UTF-8 content is silently skipped.
        let Ok(content) = std::fs::read_to_string(entry.path()) else {
            continue;
        };

        let mut updated = content.replace(&identity.original_namespace, &identity.new_namespace);
        updated = name_pattern
            .replace_all(&updated, identity.new_name.as_str())
            .into_owned();
        if let Some((old_path, new_path)) = &path_spelling {
            updated = updated.replace(old_path, new_path);
        }

        if updated != content {
            std::fs::write(entry.path(), updated)
                .with_context(|| format!("Failed to write {}", entry.path().display()))?;
            debug!("rewrote identity in {}", entry.path().display());
            rewritten += 1;
        }
    }
    Ok(rewritten)
}

/// Rename the compiled storefront JS directory and bundle after the
/// kebab-cased variant name. Missing assets are warnings: not every
/// plugin ships storefront JavaScript.
fn rename_storefront_assets(
    plugin_dir: &Path,
    identity: &VariantIdentity,
    warnings: &mut Vec<String>,
) -> Result<()> {
    let dist = plugin_dir.join(JS_DIST_DIR);
    if !dist.is_dir() {
        debug!("no storefront JS dist directory, skipping asset rename");
        return Ok(());
    }

    let original_kebab = camel_to_kebab_for_js_asset(&identity.original_name);
    let new_kebab = camel_to_kebab_for_js_asset(&identity.new_name);

    let original_dir = dist.join(&original_kebab);
    if !original_dir.is_dir() {
        warnings.push(format!(
            "storefront JS directory not found: {}",
            original_dir.display()
        ));
        return Ok(());
    }
    let new_dir = dist.join(&new_kebab);
    std::fs::rename(&original_dir, &new_dir)
        .with_context(|| format!("Failed to rename {}", original_dir.display()))?;

    let original_bundle = new_dir.join(format!("{original_kebab}.js"));
    if original_bundle.is_file() {
        std::fs::rename(&original_bundle, new_dir.join(format!("{new_kebab}.js")))
            .with_context(|| format!("Failed to rename {}", original_bundle.display()))?;
    } else {
        warnings.push(format!(
            "storefront JS bundle not found: {}",
            original_bundle.display()
        ));
    }
    Ok(())
}
