//! Copies resolved donor files into the target's injection subdirectory.

use std::path::Path;
use tracing::{debug, warn};

use super::INJECTION_SUBDIR;
use super::resolver::{ResolvedClasses, fqcn_relative_path, fqcn_to_donor_path};
use crate::utils::fs::ensure_dir;

/// Copy every resolved class that maps to an existing donor file into
/// `<target>/src/Foundation/`, mirroring the donor's relative layout.
///
/// Returns the number of files copied. Re-running overwrites identically.
/// A failed copy is logged and recorded as a warning but never aborts the
/// run: a partially-injected build is easier to diagnose than a silent
/// abort halfway through.
pub fn copy_resolved_files(
    resolved: &ResolvedClasses,
    donor_root: &Path,
    target_root: &Path,
    donor_namespace: &str,
    warnings: &mut Vec<String>,
) -> usize {
    let injection_root = target_root.join(INJECTION_SUBDIR);
    let mut copied = 0;

    for fqcn in resolved.iter() {
        let Some(source) = fqcn_to_donor_path(donor_root, donor_namespace, fqcn) else {
            continue;
        };
        if !source.is_file() {
            // Referenced but not part of the donor tree; nothing to copy,
            // but the build log should name the gap.
            warn!("no donor file for {fqcn} (expected {})", source.display());
            warnings.push(format!(
                "referenced class {fqcn} has no donor file at {}",
                source.display()
            ));
            continue;
        }
        let relative = fqcn_relative_path(donor_namespace, fqcn)
            .expect("fqcn with a donor path has a relative path");
        let dest = injection_root.join(relative);

        let result = dest
            .parent()
            .map_or(Ok(()), ensure_dir)
            .and_then(|()| {
                std::fs::copy(&source, &dest).map_err(anyhow::Error::from)
            });
        match result {
            Ok(_) => {
                debug!("copied {} -> {}", source.display(), dest.display());
                copied += 1;
            }
            Err(e) => {
                warn!("failed to copy {}: {e}", source.display());
                warnings.push(format!("could not copy {}: {e}", source.display()));
            }
        }
    }

    copied
}
