//! Service-registry merging.
//!
//! Shopware plugins register their services in
//! `src/Resources/config/services.xml` (a Symfony DI container document:
//! a `<container>` root with one `<services>` collection of `<service>`
//! entries keyed by an `id` attribute equal to an FQCN). When foundation
//! code moves into the target plugin, the matching service definitions
//! must move with it or the container would reference classes that no
//! longer exist under their old namespace.
//!
//! The merge is best-effort by contract: a missing or unparsable registry
//! on either side downgrades to a warning and the injection carries on,
//! because a target can define equivalent services itself. The donor
//! document is parsed read-only and never written back; the target is
//! mutated in memory via clone-and-append and serialized exactly once at
//! the end to avoid formatting drift.

use std::path::Path;
use tracing::{debug, warn};
use xmltree::{Element, EmitterConfig, XMLNode};

use super::resolver::ResolvedClasses;
use crate::utils::fs::safe_write;

/// Conventional registry location inside a plugin tree.
pub const SERVICES_XML_PATH: &str = "src/Resources/config/services.xml";

/// Tag name marking a service as a persistence-layer entity definition.
/// Shopware discovers these through the tag, not through imports, which is
/// why they participate in resolution as soft dependencies.
pub const ENTITY_DEFINITION_TAG: &str = "shopware.entity.definition";

/// Collect the service ids of donor registry entries tagged as entity
/// definitions, restricted to ids under `donor_namespace`.
///
/// A missing or unparsable donor registry yields an empty list plus a
/// recorded warning.
pub fn entity_definition_ids(
    donor_root: &Path,
    donor_namespace: &str,
    warnings: &mut Vec<String>,
) -> Vec<String> {
    let path = donor_root.join(SERVICES_XML_PATH);
    let Some(document) = load_registry(&path, warnings) else {
        return Vec::new();
    };
    let prefix = format!("{donor_namespace}\\");

    service_entries(&document)
        .filter(|service| {
            service.children.iter().any(|node| {
                node.as_element().is_some_and(|el| {
                    el.name == "tag"
                        && el.attributes.get("name").map(String::as_str)
                            == Some(ENTITY_DEFINITION_TAG)
                })
            })
        })
        .filter_map(|service| service.attributes.get("id"))
        .filter(|id| id.starts_with(&prefix))
        .cloned()
        .collect()
}

/// Merge donor service definitions for resolved classes into the target
/// registry, rewriting each entry's `id` from the old namespace to the
/// new one. Returns the number of services injected.
///
/// The donor file is never modified. The target file is rewritten only
/// when at least one entry was appended, with 4-space indentation and no
/// blank lines.
pub fn merge_service_definitions(
    donor_root: &Path,
    target_root: &Path,
    resolved: &ResolvedClasses,
    old_namespace: &str,
    new_namespace: &str,
    warnings: &mut Vec<String>,
) -> usize {
    let donor_path = donor_root.join(SERVICES_XML_PATH);
    let target_path = target_root.join(SERVICES_XML_PATH);

    let Some(donor_doc) = load_registry(&donor_path, warnings) else {
        return 0;
    };
    let Some(mut target_doc) = load_registry(&target_path, warnings) else {
        return 0;
    };

    // Clone the matching donor entries first so the donor document can be
    // dropped before the target is mutated.
    let transplants: Vec<Element> = service_entries(&donor_doc)
        .filter(|service| {
            service
                .attributes
                .get("id")
                .is_some_and(|id| resolved.contains(id))
        })
        .cloned()
        .collect();

    if transplants.is_empty() {
        debug!("no donor services match the resolved set");
        return 0;
    }

    let Some(target_services) = find_services_mut(&mut target_doc) else {
        warnings.push(format!(
            "target {} has no <services> element, skipping service injection",
            target_path.display()
        ));
        return 0;
    };

    let mut injected = 0;
    for mut service in transplants {
        if let Some(id) = service.attributes.get("id").cloned() {
            let new_id = id.replacen(old_namespace, new_namespace, 1);
            debug!("injecting service {new_id}");
            service.attributes.insert("id".to_string(), new_id);
        }
        target_services.children.push(XMLNode::Element(service));
        injected += 1;
    }

    if let Err(e) = write_registry(&target_path, &target_doc) {
        warn!("failed to write merged registry: {e}");
        warnings.push(format!(
            "failed to write {}: {e}",
            target_path.display()
        ));
        return 0;
    }

    injected
}

/// Parse a registry document, downgrading any failure to a warning.
fn load_registry(path: &Path, warnings: &mut Vec<String>) -> Option<Element> {
    if !path.is_file() {
        warnings.push(format!("services.xml not found at {}, skipping", path.display()));
        return None;
    }
    let content = match std::fs::read(path) {
        Ok(content) => content,
        Err(e) => {
            warnings.push(format!("could not read {}: {e}", path.display()));
            return None;
        }
    };
    match Element::parse(content.as_slice()) {
        Ok(document) => Some(document),
        Err(e) => {
            warnings.push(format!("could not parse {}: {e}", path.display()));
            None
        }
    }
}

/// Iterate the `<service>` entries under the document's `<services>`
/// collection.
fn service_entries(document: &Element) -> impl Iterator<Item = &Element> {
    document
        .get_child("services")
        .into_iter()
        .flat_map(|services| services.children.iter())
        .filter_map(XMLNode::as_element)
        .filter(|el| el.name == "service")
}

/// Mutable access to the `<services>` collection element.
fn find_services_mut(document: &mut Element) -> Option<&mut Element> {
    document.get_mut_child("services")
}

/// Serialize with human-readable indentation, stripping the blank lines
/// the pretty-printer can leave behind, and write atomically.
fn write_registry(path: &Path, document: &Element) -> anyhow::Result<()> {
    let config = EmitterConfig::new()
        .perform_indent(true)
        .indent_string("    ");
    let mut buf = Vec::new();
    document
        .write_with_config(&mut buf, config)
        .map_err(|e| anyhow::anyhow!("XML serialization failed: {e}"))?;
    let pretty = String::from_utf8(buf)?;
    let mut cleaned: String = pretty
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n");
    cleaned.push('\n');
    safe_write(path, &cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::injector::resolver::resolve;
    use std::fs;
    use tempfile::tempdir;

    const NS: &str = r"Topdata\TopdataFoundationSW6";
    const NEW_NS: &str = r"Topdata\TopdataConnectorSW6\Foundation";

    fn donor_registry() -> String {
        format!(
            r#"<?xml version="1.0" ?>
<container xmlns="http://symfony.com/schema/dic/services">
    <services>
        <service id="{NS}\Service\A">
            <argument type="service" id="service_container"/>
            <tag name="console.command"/>
        </service>
        <service id="{NS}\Service\Unused">
            <argument>%kernel.debug%</argument>
        </service>
        <service id="{NS}\Core\Content\TopdataReport\TopdataReportDefinition">
            <tag name="shopware.entity.definition" entity="topdata_report"/>
        </service>
    </services>
</container>
"#
        )
    }

    fn target_registry() -> &'static str {
        r#"<?xml version="1.0" ?>
<container xmlns="http://symfony.com/schema/dic/services">
    <services>
        <service id="Topdata\TopdataConnectorSW6\Service\ImportService"/>
    </services>
</container>
"#
    }

    fn setup(temp: &Path) -> (std::path::PathBuf, std::path::PathBuf) {
        let donor = temp.join("donor");
        let target = temp.join("target");
        for (root, content) in [(&donor, donor_registry()), (&target, target_registry().to_string())] {
            let path = root.join(SERVICES_XML_PATH);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        // Donor source for Service\A so it resolves.
        let a = donor.join("src/Service/A.php");
        fs::create_dir_all(a.parent().unwrap()).unwrap();
        fs::write(a, format!("<?php\nnamespace {NS}\\Service;\nclass A {{}}\n")).unwrap();
        // Target references Service\A.
        let t = target.join("src/Plugin.php");
        fs::create_dir_all(t.parent().unwrap()).unwrap();
        fs::write(t, format!("<?php\nuse {NS}\\Service\\A;\n")).unwrap();
        (donor, target)
    }

    #[test]
    fn finds_entity_definition_tags() {
        let temp = tempdir().unwrap();
        let (donor, _) = setup(temp.path());
        let mut warnings = Vec::new();
        let ids = entity_definition_ids(&donor, NS, &mut warnings);
        assert_eq!(
            ids,
            vec![format!("{NS}\\Core\\Content\\TopdataReport\\TopdataReportDefinition")]
        );
        assert!(warnings.is_empty());
    }

    #[test]
    fn merges_matching_services_with_rewritten_ids() {
        let temp = tempdir().unwrap();
        let (donor, target) = setup(temp.path());
        let donor_registry_before =
            fs::read_to_string(donor.join(SERVICES_XML_PATH)).unwrap();

        let mut warnings = Vec::new();
        let resolved = resolve(&target, &donor, NS, &mut warnings);
        let injected =
            merge_service_definitions(&donor, &target, &resolved, NS, NEW_NS, &mut warnings);

        // Service\A (referenced) and the tagged definition, not Unused.
        assert_eq!(injected, 2);

        let merged = fs::read_to_string(target.join(SERVICES_XML_PATH)).unwrap();
        assert!(merged.contains(r"Topdata\TopdataConnectorSW6\Foundation\Service\A"));
        assert!(merged.contains(
            r"Topdata\TopdataConnectorSW6\Foundation\Core\Content\TopdataReport\TopdataReportDefinition"
        ));
        assert!(!merged.contains(r"Service\Unused"));
        // Pre-existing target entries survive.
        assert!(merged.contains(r"Topdata\TopdataConnectorSW6\Service\ImportService"));
        // Child configuration travels verbatim.
        assert!(merged.contains("console.command"));
        assert!(merged.contains("service_container"));
        // No blank lines in the serialized output.
        assert!(merged.lines().all(|line| !line.trim().is_empty()));

        // Well-formed after the merge: it parses again, and contains
        // exactly one entry per injected id.
        let reparsed = Element::parse(merged.as_bytes()).unwrap();
        let count = service_entries(&reparsed)
            .filter(|s| {
                s.attributes
                    .get("id")
                    .is_some_and(|id| id.starts_with(NEW_NS))
            })
            .count();
        assert_eq!(count, 2);

        // Donor registry untouched.
        assert_eq!(
            fs::read_to_string(donor.join(SERVICES_XML_PATH)).unwrap(),
            donor_registry_before
        );
    }

    #[test]
    fn missing_target_registry_is_a_warning() {
        let temp = tempdir().unwrap();
        let (donor, target) = setup(temp.path());
        fs::remove_file(target.join(SERVICES_XML_PATH)).unwrap();

        let mut warnings = Vec::new();
        let resolved = resolve(&target, &donor, NS, &mut warnings);
        warnings.clear();
        let injected =
            merge_service_definitions(&donor, &target, &resolved, NS, NEW_NS, &mut warnings);

        assert_eq!(injected, 0);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("services.xml not found"));
    }

    #[test]
    fn unparsable_donor_registry_is_a_warning() {
        let temp = tempdir().unwrap();
        let (donor, target) = setup(temp.path());
        fs::write(donor.join(SERVICES_XML_PATH), "<container><services>").unwrap();

        let mut warnings = Vec::new();
        let resolved = resolve(&target, &donor, NS, &mut warnings);
        warnings.clear();
        let injected =
            merge_service_definitions(&donor, &target, &resolved, NS, NEW_NS, &mut warnings);
        assert_eq!(injected, 0);
        assert!(warnings.iter().any(|w| w.contains("could not parse")));
    }
}
