//! Version management for the release workflow.
//!
//! Plugin versions live in `composer.json` and follow plain `MAJOR.MINOR.PATCH`
//! semantics, optionally written with a leading `v`. Bumping is done through
//! the `semver` crate so malformed versions fail loudly instead of producing
//! a garbage tag.

use crate::composer::ComposerJson;
use crate::core::BuilderError;
use semver::Version;
use std::fmt;

/// The version increment chosen for a release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionBump {
    /// Keep the current version.
    None,
    /// Increment the patch component.
    Patch,
    /// Increment the minor component, resetting patch.
    Minor,
    /// Increment the major component, resetting minor and patch.
    Major,
}

impl VersionBump {
    /// All bump choices in the order they are offered interactively.
    pub const ALL: [Self; 4] = [Self::None, Self::Patch, Self::Minor, Self::Major];

    /// Parse a CLI flag value. Returns `None` for unknown input.
    pub fn from_flag(value: &str) -> Option<Self> {
        match value {
            "none" => Some(Self::None),
            "patch" => Some(Self::Patch),
            "minor" => Some(Self::Minor),
            "major" => Some(Self::Major),
            _ => None,
        }
    }
}

impl fmt::Display for VersionBump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::None => "No version update",
            Self::Patch => "Patch",
            Self::Minor => "Minor",
            Self::Major => "Major",
        };
        write!(f, "{label}")
    }
}

/// Parse a version string, tolerating a leading `v`.
pub fn parse_version(version: &str) -> Result<Version, BuilderError> {
    Ok(Version::parse(version.trim_start_matches('v'))?)
}

/// Apply a bump to a version string, returning the new version without a
/// `v` prefix. [`VersionBump::None`] returns the input unchanged (minus
/// any `v` prefix).
pub fn bump_version(current: &str, bump: VersionBump) -> Result<String, BuilderError> {
    let version = parse_version(current)?;
    let bumped = match bump {
        VersionBump::None => version,
        VersionBump::Patch => Version::new(version.major, version.minor, version.patch + 1),
        VersionBump::Minor => Version::new(version.major, version.minor + 1, 0),
        VersionBump::Major => Version::new(version.major + 1, 0, 0),
    };
    Ok(bumped.to_string())
}

/// Write a new version into the plugin's `composer.json`.
pub fn update_composer_version(composer: &mut ComposerJson, new_version: &str) -> anyhow::Result<()> {
    composer.set_version(new_version);
    composer.save()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bumps_each_component() {
        assert_eq!(bump_version("1.2.3", VersionBump::Patch).unwrap(), "1.2.4");
        assert_eq!(bump_version("1.2.3", VersionBump::Minor).unwrap(), "1.3.0");
        assert_eq!(bump_version("1.2.3", VersionBump::Major).unwrap(), "2.0.0");
        assert_eq!(bump_version("1.2.3", VersionBump::None).unwrap(), "1.2.3");
    }

    #[test]
    fn tolerates_v_prefix() {
        assert_eq!(bump_version("v1.2.3", VersionBump::Patch).unwrap(), "1.2.4");
    }

    #[test]
    fn rejects_garbage() {
        assert!(bump_version("not-a-version", VersionBump::Patch).is_err());
    }

    #[test]
    fn flag_parsing() {
        assert_eq!(VersionBump::from_flag("patch"), Some(VersionBump::Patch));
        assert_eq!(VersionBump::from_flag("none"), Some(VersionBump::None));
        assert_eq!(VersionBump::from_flag("bogus"), None);
    }
}
