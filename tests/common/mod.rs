//! Shared fixture builders for integration tests.
//!
//! The fixtures model the two trees every injection involves: a donor
//! (foundation plugin checkout) and a target (staged plugin build).

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

/// Write `content` to `root/rel`, creating parent directories.
pub fn write_file(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Build a donor tree under `root/foundation`:
///
/// - `Service\LoggerService` imports `Util\PathHelper`
/// - `Util\PathHelper` has no imports
/// - `Service\UnusedService` is registered but referenced by nothing
/// - `Core\Content\Thing\ThingDefinition` is tagged as an entity
///   definition (a soft dependency) and imports `Util\PathHelper`
pub fn donor_fixture(root: &Path) -> PathBuf {
    let donor = root.join("foundation");

    write_file(
        &donor,
        "src/Service/LoggerService.php",
        r"<?php declare(strict_types=1);

namespace Topdata\TopdataFoundationSW6\Service;

use Topdata\TopdataFoundationSW6\Util\PathHelper;

class LoggerService
{
    public function logDir(): string
    {
        return PathHelper::varDir() . '/log';
    }
}
",
    );
    write_file(
        &donor,
        "src/Util/PathHelper.php",
        r"<?php declare(strict_types=1);

namespace Topdata\TopdataFoundationSW6\Util;

class PathHelper
{
    public static function varDir(): string
    {
        return 'var';
    }
}
",
    );
    write_file(
        &donor,
        "src/Service/UnusedService.php",
        r"<?php declare(strict_types=1);

namespace Topdata\TopdataFoundationSW6\Service;

class UnusedService
{
}
",
    );
    write_file(
        &donor,
        "src/Core/Content/Thing/ThingDefinition.php",
        r"<?php declare(strict_types=1);

namespace Topdata\TopdataFoundationSW6\Core\Content\Thing;

use Topdata\TopdataFoundationSW6\Util\PathHelper;

class ThingDefinition
{
}
",
    );
    write_file(
        &donor,
        "src/Resources/config/services.xml",
        r#"<?xml version="1.0" ?>
<container xmlns="http://symfony.com/schema/dic/services"
           xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
           xsi:schemaLocation="http://symfony.com/schema/dic/services http://symfony.com/schema/dic/services/services-1.0.xsd">
    <services>
        <service id="Topdata\TopdataFoundationSW6\Service\LoggerService">
            <argument type="service" id="logger"/>
        </service>
        <service id="Topdata\TopdataFoundationSW6\Service\UnusedService"/>
        <service id="Topdata\TopdataFoundationSW6\Core\Content\Thing\ThingDefinition">
            <tag name="shopware.entity.definition" entity="topdata_thing"/>
        </service>
    </services>
</container>
"#,
    );
    donor
}

/// Build a target tree under `root/target`: a plugin named
/// `TopdataDemoSW6` that imports the donor's `LoggerService` and depends
/// on the foundation package in its manifest.
pub fn target_fixture(root: &Path) -> PathBuf {
    let target = root.join("target");

    write_file(
        &target,
        "composer.json",
        r#"{
    "name": "topdata/topdata-demo-sw6",
    "version": "1.0.0",
    "type": "shopware-platform-plugin",
    "require": {
        "shopware/core": "~6.6.0",
        "topdata/topdata-foundation-sw6": "*"
    },
    "extra": {
        "shopware-plugin-class": "Topdata\\TopdataDemoSW6\\TopdataDemoSW6"
    },
    "autoload": {
        "psr-4": {
            "Topdata\\TopdataDemoSW6\\": "src/"
        }
    }
}
"#,
    );
    write_file(
        &target,
        "src/TopdataDemoSW6.php",
        r"<?php declare(strict_types=1);

namespace Topdata\TopdataDemoSW6;

use Shopware\Core\Framework\Plugin;
use Topdata\TopdataFoundationSW6\Service\LoggerService;

class TopdataDemoSW6 extends Plugin
{
}
",
    );
    write_file(
        &target,
        "src/Resources/config/services.xml",
        r#"<?xml version="1.0" ?>
<container xmlns="http://symfony.com/schema/dic/services"
           xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
           xsi:schemaLocation="http://symfony.com/schema/dic/services http://symfony.com/schema/dic/services/services-1.0.xsd">
    <services>
        <service id="Topdata\TopdataDemoSW6\TopdataDemoSW6"/>
    </services>
</container>
"#,
    );
    target
}
