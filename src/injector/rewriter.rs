//! Project-wide namespace rewriting.
//!
//! Exact substring replacement, deliberately not pattern-based: the donor
//! namespace prefix is a syntactically unambiguous token in PHP, so plain
//! replacement handles every context a structural rewrite would have to
//! enumerate one by one - `namespace` declarations, `use` statements,
//! inline `\Fully\Qualified::calls()`, and class names embedded in string
//! literals for container lookups. It also keeps the operation trivially
//! idempotent.

use std::path::Path;
use tracing::{debug, warn};

use super::resolver::php_files;

/// Replace every occurrence of `old_namespace` with `new_namespace` in all
/// `.php` files under `root`. Files are persisted only when their content
/// actually changed; the return value is the number of files modified.
///
/// Unreadable or unwritable files are logged and skipped.
pub fn rewrite_namespaces_in_dir(root: &Path, old_namespace: &str, new_namespace: &str) -> usize {
    let mut modified = 0;
    for file in php_files(root) {
        let content = match std::fs::read_to_string(&file) {
            Ok(content) => content,
            Err(e) => {
                warn!("could not read {}: {e}", file.display());
                continue;
            }
        };
        if !content.contains(old_namespace) {
            continue;
        }
        let rewritten = content.replace(old_namespace, new_namespace);
        match std::fs::write(&file, rewritten) {
            Ok(()) => {
                debug!("rewrote namespaces in {}", file.display());
                modified += 1;
            }
            Err(e) => warn!("could not write {}: {e}", file.display()),
        }
    }
    modified
}
