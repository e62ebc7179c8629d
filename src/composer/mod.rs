//! `composer.json` handling.
//!
//! Shopware plugins declare their identity in `composer.json`: the plugin
//! class under `extra.shopware-plugin-class`, the version, the dependency
//! list, and the PSR-4 autoload map. This module owns all reads and writes
//! of that file.
//!
//! The document is kept as a raw [`serde_json::Value`] rather than a typed
//! struct: the builder must round-trip arbitrary vendor keys untouched, and
//! the `preserve_order` feature keeps the author's key ordering stable
//! across a patch cycle. Output uses 4-space indentation, matching what
//! Composer itself writes.

use crate::core::BuilderError;
use crate::utils::fs::{read_to_string, safe_write};
use crate::utils::string_case::{camel_to_kebab_for_composer, prepend_variant_text};
use crate::variant::VariantIdentity;
use anyhow::Result;
use serde::Serialize;
use serde_json::{Map, Value, json};
use std::path::{Path, PathBuf};

/// Composer package name of the foundation plugin. A target that depends
/// on this package is eligible for foundation injection.
pub const FOUNDATION_PACKAGE: &str = "topdata/topdata-foundation-sw6";

/// Relative path the injected code is autoloaded from.
pub const FOUNDATION_AUTOLOAD_DIR: &str = "src/Foundation/";

/// An in-memory `composer.json` document bound to its file path.
#[derive(Debug, Clone)]
pub struct ComposerJson {
    path: PathBuf,
    data: Value,
}

/// Plugin identity extracted from `composer.json`.
#[derive(Debug, Clone)]
pub struct PluginInfo {
    /// Plugin name, the last segment of the plugin class
    /// (e.g. `TopdataConnectorSW6`).
    pub name: String,
    /// Version without a leading `v`.
    pub version: String,
    /// Version exactly as written in the manifest (may carry a `v`).
    pub original_version: String,
}

impl ComposerJson {
    /// Load `composer.json` from a plugin directory.
    ///
    /// # Errors
    ///
    /// [`BuilderError::ComposerNotFound`] if the file is missing,
    /// [`BuilderError::ComposerParseError`] if it is not valid JSON. Both
    /// are fatal to the build: without the manifest there is no plugin
    /// name, version, or namespace to work with.
    pub fn load(plugin_dir: &Path) -> Result<Self, BuilderError> {
        let path = plugin_dir.join("composer.json");
        if !path.is_file() {
            return Err(BuilderError::ComposerNotFound {
                path: plugin_dir.to_path_buf(),
            });
        }
        let content =
            read_to_string(&path).map_err(|e| BuilderError::ComposerParseError {
                path: path.clone(),
                reason: e.to_string(),
            })?;
        let data: Value =
            serde_json::from_str(&content).map_err(|e| BuilderError::ComposerParseError {
                path: path.clone(),
                reason: e.to_string(),
            })?;
        Ok(Self { path, data })
    }

    /// Write the document back to disk with 4-space indentation and a
    /// trailing newline.
    pub fn save(&self) -> Result<()> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.data.serialize(&mut ser)?;
        buf.push(b'\n');
        let content = String::from_utf8(buf).expect("serde_json output is UTF-8");
        safe_write(&self.path, &content)
    }

    /// Path of the underlying file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The fully-qualified plugin class from
    /// `extra.shopware-plugin-class`.
    pub fn plugin_class(&self) -> Result<&str, BuilderError> {
        self.data
            .pointer("/extra/shopware-plugin-class")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .ok_or(BuilderError::PluginClassMissing)
    }

    /// The plugin's root namespace: the plugin class minus its final
    /// segment (e.g. `Topdata\TopdataConnectorSW6`).
    pub fn root_namespace(&self) -> Result<String, BuilderError> {
        let class = self.plugin_class()?;
        match class.rsplit_once('\\') {
            Some((namespace, _)) if !namespace.is_empty() => Ok(namespace.to_string()),
            _ => Err(BuilderError::PluginClassMissing),
        }
    }

    /// Plugin identity (name and version) for the release workflow.
    pub fn plugin_info(&self) -> Result<PluginInfo, BuilderError> {
        let class = self.plugin_class()?;
        let name = class.rsplit('\\').next().unwrap_or(class).to_string();
        let original_version = self
            .data
            .get("version")
            .and_then(Value::as_str)
            .unwrap_or("0.0.0")
            .to_string();
        let version = original_version.trim_start_matches('v').to_string();
        Ok(PluginInfo {
            name,
            version,
            original_version,
        })
    }

    /// Overwrite the `version` field.
    pub fn set_version(&mut self, version: &str) {
        if let Some(obj) = self.data.as_object_mut() {
            obj.insert("version".to_string(), json!(version));
        }
    }

    /// Whether the plugin requires the foundation package.
    pub fn has_foundation_dependency(&self) -> bool {
        self.data
            .get("require")
            .and_then(|require| require.get(FOUNDATION_PACKAGE))
            .is_some()
    }

    /// Drop the foundation package from `require`, returning whether an
    /// entry was removed. Safe to call when the entry is already gone.
    pub fn remove_foundation_requirement(&mut self) -> bool {
        self.data
            .get_mut("require")
            .and_then(Value::as_object_mut)
            .and_then(|require| require.shift_remove(FOUNDATION_PACKAGE))
            .is_some()
    }

    /// Add (or overwrite) the PSR-4 autoload rule routing the injected
    /// namespace to [`FOUNDATION_AUTOLOAD_DIR`]. Idempotent.
    pub fn add_foundation_autoload(&mut self, new_namespace: &str) {
        let root = self
            .data
            .as_object_mut()
            .expect("composer.json root is an object");
        let autoload = root
            .entry("autoload")
            .or_insert_with(|| Value::Object(Map::new()));
        if !autoload.is_object() {
            *autoload = Value::Object(Map::new());
        }
        let psr4 = autoload
            .as_object_mut()
            .expect("autoload is an object")
            .entry("psr-4")
            .or_insert_with(|| Value::Object(Map::new()));
        if !psr4.is_object() {
            *psr4 = Value::Object(Map::new());
        }
        psr4.as_object_mut()
            .expect("psr-4 is an object")
            .insert(format!("{new_namespace}\\"), json!(FOUNDATION_AUTOLOAD_DIR));
    }

    /// Rewrite the manifest for a plugin variant: package name, plugin
    /// class, PSR-4 autoload key, and the `[PREFIX]`-marked labels and
    /// descriptions (both the plain-string and per-language forms).
    pub fn apply_variant_identity(&mut self, identity: &VariantIdentity) {
        let new_package_name = self
            .data
            .get("name")
            .and_then(Value::as_str)
            .and_then(|name| name.split_once('/'))
            .map(|(vendor, _)| {
                format!("{vendor}/{}", camel_to_kebab_for_composer(&identity.new_name))
            });
        if let Some(new_name) = new_package_name {
            if let Some(obj) = self.data.as_object_mut() {
                obj.insert("name".to_string(), json!(new_name));
            }
        }

        if let Some(description) = self.data.get_mut("description") {
            mark_variant_text(description, &identity.prefix, &identity.suffix);
        }

        if let Some(extra) = self.data.get_mut("extra").and_then(Value::as_object_mut) {
            if let Some(label) = extra.get_mut("label") {
                mark_variant_text(label, &identity.prefix, &identity.suffix);
            }
            if let Some(description) = extra.get_mut("description") {
                mark_variant_text(description, &identity.prefix, &identity.suffix);
            }
            if extra.contains_key("shopware-plugin-class") {
                extra.insert(
                    "shopware-plugin-class".to_string(),
                    json!(identity.new_fqcn),
                );
            }
        }

        let old_key = format!("{}\\", identity.original_namespace);
        if let Some(psr4) = self
            .data
            .pointer_mut("/autoload/psr-4")
            .and_then(Value::as_object_mut)
        {
            if let Some(dir) = psr4.shift_remove(&old_key) {
                psr4.insert(format!("{}\\", identity.new_namespace), dir);
            }
        }
    }
}

/// Apply variant markers to a label/description value, which is either a
/// plain string or a `{lang: text}` map.
fn mark_variant_text(value: &mut Value, prefix: &str, suffix: &str) {
    match value {
        Value::String(text) => {
            *text = prepend_variant_text(text, prefix, suffix);
        }
        Value::Object(by_language) => {
            for entry in by_language.values_mut() {
                if let Value::String(text) = entry {
                    *text = prepend_variant_text(text, prefix, suffix);
                }
            }
        }
        _ => {}
    }
}
