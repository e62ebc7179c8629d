//! End-to-end injection scenarios on realistic donor/target trees.

mod common;

use common::{donor_fixture, target_fixture, write_file};
use std::fs;
use swrb::injector::{InjectionOptions, inject};
use swrb::utils::fs::sha256_file;
use tempfile::tempdir;

#[test]
fn injects_closure_and_soft_dependencies() {
    let temp = tempdir().unwrap();
    let donor = donor_fixture(temp.path());
    let target = target_fixture(temp.path());

    let report = inject(&target, &donor, &InjectionOptions::default()).unwrap();

    // LoggerService (referenced), PathHelper (transitive), ThingDefinition
    // (entity-definition tag). UnusedService must stay behind.
    assert_eq!(report.files_copied, 3);
    assert!(target.join("src/Foundation/Service/LoggerService.php").is_file());
    assert!(target.join("src/Foundation/Util/PathHelper.php").is_file());
    assert!(
        target
            .join("src/Foundation/Core/Content/Thing/ThingDefinition.php")
            .is_file()
    );
    assert!(!target.join("src/Foundation/Service/UnusedService.php").exists());

    // Copied code lives under the target's own namespace now.
    let logger = fs::read_to_string(target.join("src/Foundation/Service/LoggerService.php")).unwrap();
    assert!(logger.contains(r"namespace Topdata\TopdataDemoSW6\Foundation\Service;"));
    assert!(logger.contains(r"use Topdata\TopdataDemoSW6\Foundation\Util\PathHelper;"));
    assert!(!logger.contains("TopdataFoundationSW6"));

    // Pre-existing plugin code is rewritten too.
    let plugin_class = fs::read_to_string(target.join("src/TopdataDemoSW6.php")).unwrap();
    assert!(plugin_class.contains(r"use Topdata\TopdataDemoSW6\Foundation\Service\LoggerService;"));
}

#[test]
fn patches_manifest_and_registry() {
    let temp = tempdir().unwrap();
    let donor = donor_fixture(temp.path());
    let target = target_fixture(temp.path());

    let report = inject(&target, &donor, &InjectionOptions::default()).unwrap();

    let composer: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(target.join("composer.json")).unwrap()).unwrap();
    assert!(composer["require"].get("topdata/topdata-foundation-sw6").is_none());
    assert_eq!(composer["require"]["shopware/core"], "~6.6.0");
    assert_eq!(
        composer["autoload"]["psr-4"]["Topdata\\TopdataDemoSW6\\Foundation\\"],
        "src/Foundation/"
    );

    // LoggerService and ThingDefinition have registry entries; PathHelper
    // does not, UnusedService is not part of the closure.
    assert_eq!(report.services_injected, 2);
    let registry =
        fs::read_to_string(target.join("src/Resources/config/services.xml")).unwrap();
    assert!(registry.contains(r"Topdata\TopdataDemoSW6\Foundation\Service\LoggerService"));
    assert!(registry.contains(r"Topdata\TopdataDemoSW6\Foundation\Core\Content\Thing\ThingDefinition"));
    assert!(registry.contains("shopware.entity.definition"));
    assert!(!registry.contains("UnusedService"));
    // The original target entry survives the merge.
    assert!(registry.contains(r"Topdata\TopdataDemoSW6\TopdataDemoSW6"));
}

#[test]
fn donor_tree_is_never_modified() {
    let temp = tempdir().unwrap();
    let donor = donor_fixture(temp.path());
    let target = target_fixture(temp.path());

    let files = [
        "src/Service/LoggerService.php",
        "src/Util/PathHelper.php",
        "src/Resources/config/services.xml",
    ];
    let before: Vec<String> = files
        .iter()
        .map(|rel| sha256_file(&donor.join(rel)).unwrap())
        .collect();

    inject(&target, &donor, &InjectionOptions::default()).unwrap();

    for (rel, checksum) in files.iter().zip(&before) {
        assert_eq!(&sha256_file(&donor.join(rel)).unwrap(), checksum, "{rel} changed");
    }
}

#[test]
fn unresolvable_reference_warns_but_succeeds() {
    let temp = tempdir().unwrap();
    let donor = donor_fixture(temp.path());
    let target = target_fixture(temp.path());
    write_file(
        &target,
        "src/Service/Consumer.php",
        r"<?php declare(strict_types=1);

namespace Topdata\TopdataDemoSW6\Service;

use Topdata\TopdataFoundationSW6\Service\Missing;

class Consumer
{
}
",
    );

    let report = inject(&target, &donor, &InjectionOptions::default()).unwrap();
    assert!(
        report
            .warnings
            .iter()
            .any(|w| w.contains("Missing")),
        "warnings: {:?}",
        report.warnings
    );
    // The dangling import is still relocated so the failure surfaces in
    // the plugin's namespace, not the foundation's.
    let consumer = fs::read_to_string(target.join("src/Service/Consumer.php")).unwrap();
    assert!(consumer.contains(r"use Topdata\TopdataDemoSW6\Foundation\Service\Missing;"));
}

#[test]
fn missing_target_registry_degrades_to_warning() {
    let temp = tempdir().unwrap();
    let donor = donor_fixture(temp.path());
    let target = target_fixture(temp.path());
    fs::remove_file(target.join("src/Resources/config/services.xml")).unwrap();

    let report = inject(&target, &donor, &InjectionOptions::default()).unwrap();
    assert_eq!(report.services_injected, 0);
    assert!(!report.warnings.is_empty());
    // Code injection is unaffected.
    assert!(target.join("src/Foundation/Service/LoggerService.php").is_file());
}

#[test]
fn missing_donor_path_is_fatal() {
    let temp = tempdir().unwrap();
    let target = target_fixture(temp.path());

    let err = inject(
        &target,
        &temp.path().join("no-such-donor"),
        &InjectionOptions::default(),
    )
    .unwrap_err();
    assert!(err.to_string().contains("no-such-donor"));
}

#[test]
fn entity_definitions_inject_without_any_reference() {
    let temp = tempdir().unwrap();
    let donor = donor_fixture(temp.path());
    let target = target_fixture(temp.path());
    // Strip the plugin's only foundation import; the tagged entity
    // definition must still come along.
    write_file(
        &target,
        "src/TopdataDemoSW6.php",
        r"<?php declare(strict_types=1);

namespace Topdata\TopdataDemoSW6;

use Shopware\Core\Framework\Plugin;

class TopdataDemoSW6 extends Plugin
{
}
",
    );

    let report = inject(&target, &donor, &InjectionOptions::default()).unwrap();
    // ThingDefinition plus its PathHelper import, nothing else.
    assert_eq!(report.files_copied, 2);
    assert!(
        target
            .join("src/Foundation/Core/Content/Thing/ThingDefinition.php")
            .is_file()
    );
    assert!(target.join("src/Foundation/Util/PathHelper.php").is_file());
    assert!(!target.join("src/Foundation/Service/LoggerService.php").exists());
}
