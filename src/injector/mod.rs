//! Foundation code injection.
//!
//! Makes a plugin package self-contained: instead of shipping with a
//! Composer dependency on the foundation plugin, the subset of foundation
//! code the plugin actually needs is copied into the build directory,
//! relocated under `<TargetNamespace>\Foundation`, and wired up in the
//! plugin's own autoload map and service registry.
//!
//! The operation walks a fixed, one-way sequence of stages:
//!
//! 1. patch `composer.json` (drop the foundation requirement, add the
//!    `\Foundation` PSR-4 rule) - this also yields the target namespace
//! 2. resolve the dependency closure ([`resolver`])
//! 3. copy the resolved donor files ([`materializer`])
//! 4. rewrite namespaces across the whole target tree ([`rewriter`])
//! 5. merge matching service definitions ([`services`])
//!
//! There is no rollback: the target is a transient build directory owned
//! by the caller, so a failed late stage simply fails the build and the
//! directory is discarded. Only manifest problems are fatal; registry
//! problems degrade to warnings and per-file problems are logged and
//! skipped.

pub mod materializer;
pub mod resolver;
pub mod rewriter;
pub mod scanner;
pub mod services;

use anyhow::Result;
use colored::Colorize;
use std::path::Path;
use tracing::info;

use crate::composer::ComposerJson;
use crate::core::BuilderError;

/// Namespace root of the foundation plugin's code.
pub const DEFAULT_DONOR_NAMESPACE: &str = r"Topdata\TopdataFoundationSW6";

/// Subdirectory of the target tree that receives injected code.
pub const INJECTION_SUBDIR: &str = "src/Foundation";

/// Tunables for one injection run.
#[derive(Debug, Clone)]
pub struct InjectionOptions {
    /// Namespace prefix of the donor code.
    pub donor_namespace: String,
}

impl Default for InjectionOptions {
    fn default() -> Self {
        Self {
            donor_namespace: DEFAULT_DONOR_NAMESPACE.to_string(),
        }
    }
}

/// Outcome summary of one injection run.
#[derive(Debug, Default)]
pub struct InjectionReport {
    /// Donor source files copied into the target.
    pub files_copied: usize,
    /// Files whose namespaces were rewritten (copied and pre-existing).
    pub files_rewritten: usize,
    /// Service definitions appended to the target registry.
    pub services_injected: usize,
    /// Non-fatal problems encountered along the way.
    pub warnings: Vec<String>,
}

impl InjectionReport {
    /// Print the human-readable summary the build output ends with.
    pub fn print_summary(&self) {
        println!(
            "{} {} files copied, {} files rewritten, {} services injected",
            "✓ Foundation injected:".green(),
            self.files_copied,
            self.files_rewritten,
            self.services_injected
        );
        for warning in &self.warnings {
            println!("{} {warning}", "warning:".yellow());
        }
    }
}

/// Inject the required foundation code from `donor_root` into
/// `target_root`.
///
/// # Errors
///
/// Fatal only when the donor path does not exist or the target's
/// `composer.json` is missing, unparsable, or lacks a plugin class - in
/// every one of those cases the target namespace cannot be derived and
/// the injection cannot proceed.
pub fn inject(
    target_root: &Path,
    donor_root: &Path,
    options: &InjectionOptions,
) -> Result<InjectionReport> {
    if !donor_root.is_dir() {
        return Err(BuilderError::FoundationPathNotFound {
            path: donor_root.to_path_buf(),
        }
        .into());
    }

    // Stage 1: manifest. This is the single source of truth for the
    // namespace mapping applied in every later stage.
    let mut composer = ComposerJson::load(target_root)?;
    let new_namespace = format!("{}\\Foundation", composer.root_namespace()?);
    let removed = composer.remove_foundation_requirement();
    composer.add_foundation_autoload(&new_namespace);
    composer.save()?;
    info!(
        "patched composer.json (dependency removed: {removed}, autoload -> {new_namespace})"
    );

    let mut report = InjectionReport::default();
    let old_namespace = options.donor_namespace.as_str();

    // Stage 2: resolve.
    let resolved = resolver::resolve(target_root, donor_root, old_namespace, &mut report.warnings);
    info!("resolved {} required foundation classes", resolved.len());

    // Stage 3: materialize.
    report.files_copied = materializer::copy_resolved_files(
        &resolved,
        donor_root,
        target_root,
        old_namespace,
        &mut report.warnings,
    );

    // Stage 4: rewrite. One pass over the whole target covers both the
    // freshly copied subtree and pre-existing references.
    report.files_rewritten =
        rewriter::rewrite_namespaces_in_dir(target_root, old_namespace, &new_namespace);

    // Stage 5: merge service definitions (best effort).
    report.services_injected = services::merge_service_definitions(
        donor_root,
        target_root,
        &resolved,
        old_namespace,
        &new_namespace,
        &mut report.warnings,
    );

    info!(
        files_copied = report.files_copied,
        files_rewritten = report.files_rewritten,
        services_injected = report.services_injected,
        "foundation injection finished"
    );
    Ok(report)
}
