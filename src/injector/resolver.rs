//! Dependency resolution: the transitive closure of donor classes the
//! target actually needs.
//!
//! Resolution runs in two sequential passes:
//!
//! 1. **Reference closure** - every `.php` file under the target tree is
//!    scanned for `use` statements rooted at the donor namespace; each hit
//!    seeds a worklist that follows references through donor files until
//!    the set stops growing.
//! 2. **Soft-dependency pass** - the donor service registry is scanned for
//!    entries tagged `shopware.entity.definition`. Shopware activates
//!    these through declarative registration, not imports, so reference
//!    scanning alone would silently ship broken entity registrations.
//!    Tagged classes join the set and are then run through the same
//!    worklist so their own references are not dropped.
//!
//! The two discovery mechanisms stay independently testable: the second
//! pass starts only after the first has converged.
//!
//! An FQCN that maps to no donor file stays in the resolved set (it was
//! referenced, after all) but expands nothing and copies nothing. That is
//! the expected shape for classes that merely share the namespace prefix
//! or have been removed from the donor.

use std::collections::{BTreeSet, HashSet, VecDeque};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use super::scanner::scan_references;
use super::services;

/// The computed closure of donor FQCNs. Immutable once returned.
#[derive(Debug, Clone, Default)]
pub struct ResolvedClasses {
    classes: BTreeSet<String>,
}

impl ResolvedClasses {
    /// Iterate the resolved FQCNs in deterministic (sorted) order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }

    /// Whether `fqcn` is part of the closure.
    pub fn contains(&self, fqcn: &str) -> bool {
        self.classes.contains(fqcn)
    }

    /// Number of resolved classes.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Whether the closure is empty.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// Map an FQCN under `donor_namespace` to its source file inside the donor
/// tree: strip the prefix, swap namespace separators for path separators,
/// append `.php`, root at `<donor>/src/`.
///
/// Returns `None` for FQCNs outside the donor namespace (including the
/// namespace root itself, which names no class file).
pub fn fqcn_to_donor_path(
    donor_root: &Path,
    donor_namespace: &str,
    fqcn: &str,
) -> Option<PathBuf> {
    let relative = fqcn.strip_prefix(&format!("{donor_namespace}\\"))?;
    if relative.is_empty() {
        return None;
    }
    Some(donor_root.join("src").join(format!("{}.php", relative.replace('\\', "/"))))
}

/// The path of an FQCN relative to the donor namespace root, with `/`
/// separators and the `.php` extension (e.g. `Helper/CliLogger.php`).
/// Used by the materializer to mirror the layout under the injection
/// subdirectory.
pub fn fqcn_relative_path(donor_namespace: &str, fqcn: &str) -> Option<PathBuf> {
    let relative = fqcn.strip_prefix(&format!("{donor_namespace}\\"))?;
    if relative.is_empty() {
        return None;
    }
    Some(PathBuf::from(format!("{}.php", relative.replace('\\', "/"))))
}

/// Compute the closure of donor classes required by the target tree.
///
/// Read failures on individual files are logged and skipped: a missed scan
/// only risks under-resolution, never corruption.
pub fn resolve(
    target_root: &Path,
    donor_root: &Path,
    donor_namespace: &str,
    warnings: &mut Vec<String>,
) -> ResolvedClasses {
    // Seed with every reference found anywhere in the target tree.
    let mut pending: VecDeque<String> = VecDeque::new();
    for file in php_files(target_root) {
        match std::fs::read_to_string(&file) {
            Ok(content) => pending.extend(scan_references(&content, donor_namespace)),
            Err(e) => warn!("skipping unreadable file {}: {e}", file.display()),
        }
    }
    debug!("seeded resolver with {} referenced classes", pending.len());

    let mut checked: HashSet<String> = HashSet::new();
    let mut resolved: BTreeSet<String> = BTreeSet::new();
    expand_closure(&mut pending, &mut checked, &mut resolved, donor_root, donor_namespace);

    // Soft-dependency pass: entity definitions are required by declarative
    // tag, not by reference, and would otherwise be missed.
    let soft = services::entity_definition_ids(donor_root, donor_namespace, warnings);
    if !soft.is_empty() {
        debug!("soft-dependency pass adds {} tagged classes", soft.len());
        let mut pending: VecDeque<String> = soft.into_iter().collect();
        expand_closure(&mut pending, &mut checked, &mut resolved, donor_root, donor_namespace);
    }

    ResolvedClasses { classes: resolved }
}

/// Drain the worklist: mark each FQCN checked and resolved, then scan its
/// donor file (if one exists) for further references.
fn expand_closure(
    pending: &mut VecDeque<String>,
    checked: &mut HashSet<String>,
    resolved: &mut BTreeSet<String>,
    donor_root: &Path,
    donor_namespace: &str,
) {
    while let Some(fqcn) = pending.pop_front() {
        if !checked.insert(fqcn.clone()) {
            continue;
        }
        resolved.insert(fqcn.clone());

        let Some(path) = fqcn_to_donor_path(donor_root, donor_namespace, &fqcn) else {
            continue;
        };
        if !path.is_file() {
            // Referenced but not part of the donor; keep it in the set,
            // expand nothing.
            debug!("no donor file for {fqcn}, keeping as leaf");
            continue;
        }
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                for reference in scan_references(&content, donor_namespace) {
                    if !checked.contains(&reference) {
                        pending.push_back(reference);
                    }
                }
            }
            Err(e) => warn!("skipping unreadable donor file {}: {e}", path.display()),
        }
    }
}

/// All `.php` files under `root`, in directory-walk order.
pub fn php_files(root: &Path) -> impl Iterator<Item = PathBuf> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("walk error under {}: {e}", root.display());
                None
            }
        })
        .filter(|entry| {
            entry.file_type().is_file()
                && entry.path().extension().is_some_and(|ext| ext == "php")
        })
        .map(|entry| entry.into_path())
}
