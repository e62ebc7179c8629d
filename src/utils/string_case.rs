//! Case-conversion helpers for plugin identities.
//!
//! A plugin name appears in several derived spellings: CamelCase for the
//! class and directory, kebab-case for the Composer package name, and a
//! stricter kebab variant for compiled storefront asset paths (where
//! webpack splits acronyms letter by letter, `SW6` becoming `s-w6`).

use regex::Regex;
use std::sync::LazyLock;

static LOWER_TO_UPPER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z0-9])([A-Z])").expect("valid case regex"));
static WORD_AFTER_ANY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(.)([A-Z][a-z]+)").expect("valid case regex"));
static ACRONYM_BEFORE_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Z])([A-Z][a-z])").expect("valid case regex"));
static UPPER_PAIR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Z])([A-Z])").expect("valid case regex"));
static VARIANT_MARKERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\[[A-Z]+\]\s*)+").expect("valid marker regex"));

/// Kebab-case spelling used for Composer package names.
/// `FreeTopdataPluginSW6` becomes `free-topdata-plugin-sw6`.
pub fn camel_to_kebab_for_composer(camel: &str) -> String {
    let step1 = WORD_AFTER_ANY.replace_all(camel, "${1}-${2}");
    let step2 = LOWER_TO_UPPER.replace_all(&step1, "${1}-${2}");
    step2.to_lowercase()
}

/// Kebab-case spelling used for compiled storefront JS asset paths, which
/// hyphenates acronyms letter by letter.
/// `TopdataCategoryFilterSW6` becomes `topdata-category-filter-s-w6`.
pub fn camel_to_kebab_for_js_asset(name: &str) -> String {
    let step1 = LOWER_TO_UPPER.replace_all(name, "${1}-${2}");
    let step2 = ACRONYM_BEFORE_WORD.replace_all(&step1, "${1}-${2}");
    let step3 = UPPER_PAIR.replace_all(&step2, "${1}-${2}");
    step3.to_lowercase()
}

/// Prefix a label/description with variant markers, `[PREFIX] [SUFFIX]
/// Text`. Existing leading markers are stripped first so repeated
/// transformation never stacks them.
pub fn prepend_variant_text(text: &str, prefix: &str, suffix: &str) -> String {
    let mut markers = String::new();
    if !prefix.is_empty() {
        markers.push_str(&format!("[{}] ", prefix.to_uppercase()));
    }
    if !suffix.is_empty() {
        markers.push_str(&format!("[{}] ", suffix.to_uppercase()));
    }
    let stripped = VARIANT_MARKERS.replace(text, "");
    format!("{markers}{stripped}")
}
