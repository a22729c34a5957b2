use semver::Version;

use crate::release::types::ChangeType;

/// Parse a tag name into a semver::Version.
///
/// Accepts the same strings as npm's `semver.valid`: surrounding whitespace
/// and a single lowercase `v` prefix are ignored. `=` and `V` prefixes and
/// partial versions like "1.2" are rejected.
///
/// Examples:
/// - "1.2.3" -> Version(1, 2, 3)
/// - "v1.2.3-rc.1" -> Version(1, 2, 3-rc.1)
/// - "=1.2.3" -> None
pub fn parse_version(version: &str) -> Option<Version> {
    let trimmed = version.trim();
    let trimmed = trimmed.strip_prefix('v').unwrap_or(trimmed);
    Version::parse(trimmed).ok()
}

pub fn is_valid_version(version: &str) -> bool {
    parse_version(version).is_some()
}

/// Classify the difference between two versions.
///
/// Returns [`ChangeType::Unclassified`] if either side is empty or invalid.
/// The result does not depend on which side is newer.
pub fn classify(current: &str, previous: &str) -> ChangeType {
    let (Some(current), Some(previous)) = (parse_version(current), parse_version(previous))
    else {
        return ChangeType::Unclassified;
    };

    if current.major != previous.major {
        ChangeType::Major
    } else if current.minor != previous.minor {
        ChangeType::Minor
    } else if current.patch != previous.patch {
        ChangeType::Patch
    } else {
        ChangeType::None
    }
}
