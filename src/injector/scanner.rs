//! Symbol reference scanning for PHP source files.
//!
//! The injector never parses PHP. Namespace references it cares about all
//! surface as `use` statements at the top of a file, and those are regular
//! enough for a line-anchored regex. Known limitations, accepted by
//! design: group-use syntax (`use Foo\{A, B};`) is not expanded, and a
//! `use` statement inside a block comment would still match. Both are
//! absent from the codebases this tool targets; under-matching only risks
//! under-resolution, which the soft-dependency pass and review of the
//! injection report catch.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

/// Matches a PHP `use` statement, capturing the fully-qualified name and
/// ignoring an optional `as Alias` rename clause.
static USE_STATEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*use\s+\\?([A-Za-z_][A-Za-z0-9_]*(?:\\[A-Za-z_][A-Za-z0-9_]*)+)(?:\s+as\s+[A-Za-z_][A-Za-z0-9_]*)?\s*;")
        .expect("use-statement regex is valid")
});

/// Extract the set of FQCNs referenced via `use` statements whose
/// namespace lies under `namespace_prefix`.
///
/// Aliased imports (`use X\Y as Z;`) resolve to the original FQCN `X\Y`;
/// the alias is presentation-only and never returned. `use function` and
/// `use const` imports do not match the statement pattern at all.
pub fn scan_references(content: &str, namespace_prefix: &str) -> BTreeSet<String> {
    let prefix = format!("{namespace_prefix}\\");
    USE_STATEMENT
        .captures_iter(content)
        .map(|caps| caps[1].to_string())
        .filter(|fqcn| fqcn.starts_with(&prefix))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const NS: &str = r"Topdata\TopdataFoundationSW6";

    #[test]
    fn scans_plain_use_statements() {
        let src = "<?php\n\
                   namespace Topdata\\TopdataConnectorSW6\\Service;\n\
                   \n\
                   use Topdata\\TopdataFoundationSW6\\Helper\\CliLogger;\n\
                   use Topdata\\TopdataFoundationSW6\\Service\\LocaleHelperService;\n\
                   use Shopware\\Core\\Framework\\Context;\n";
        let refs = scan_references(src, NS);
        assert_eq!(refs.len(), 2);
        assert!(refs.contains(r"Topdata\TopdataFoundationSW6\Helper\CliLogger"));
        assert!(refs.contains(r"Topdata\TopdataFoundationSW6\Service\LocaleHelperService"));
    }

    #[test]
    fn scans_aliased_use() {
        let src = "use Topdata\\TopdataFoundationSW6\\DTO\\CsvImportConfig as ImportConfig;\n";
        let refs = scan_references(src, NS);
        assert_eq!(refs.len(), 1);
        // The original FQCN, never the alias.
        assert!(refs.contains(r"Topdata\TopdataFoundationSW6\DTO\CsvImportConfig"));
    }

    #[test]
    fn ignores_foreign_namespaces() {
        let src = "use Symfony\\Component\\Console\\Command\\Command;\n\
                   use TopdataSomethingElse\\Helper\\CliLogger;\n";
        assert!(scan_references(src, NS).is_empty());
    }

    #[test]
    fn ignores_function_and_const_imports() {
        let src = "use function Topdata\\TopdataFoundationSW6\\Util\\slugify;\n\
                   use const Topdata\\TopdataFoundationSW6\\Constants\\VERSION;\n";
        assert!(scan_references(src, NS).is_empty());
    }

    #[test]
    fn leading_backslash_is_normalized() {
        let src = "use \\Topdata\\TopdataFoundationSW6\\Util\\UtilDict;\n";
        let refs = scan_references(src, NS);
        assert!(refs.contains(r"Topdata\TopdataFoundationSW6\Util\UtilDict"));
    }

    #[test]
    fn prefix_match_is_namespace_aware() {
        // A sibling namespace sharing a textual prefix must not match.
        let src = "use Topdata\\TopdataFoundationSW6Extra\\Helper\\Thing;\n";
        assert!(scan_references(src, NS).is_empty());
    }

    #[test]
    fn line_commented_use_is_skipped() {
        // The pattern is line-anchored, so `// use ...` does not match.
        // A use statement inside a block comment would still match; that
        // is the documented limitation of the lightweight scanner.
        let src = "// use Topdata\\TopdataFoundationSW6\\Helper\\CliLogger;\n";
        assert!(scan_references(src, NS).is_empty());
    }
}
