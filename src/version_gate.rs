// Component B: version gate (spec §4.B).
//
// Only MAJOR.MINOR.PATCH are compared; prerelease suffixes are accepted
// and ignored. Grounded on `rt-updater`, the only crate in this workspace
// that previously depended on `semver`.

use semver::Version;

/// Hardcoded minimum protocol version this hub accepts.
pub const MINIMUM_PROTOCOL_VERSION: Version = Version::new(64, 0, 0);

#[must_use]
pub fn meets_minimum(version: &Version) -> bool {
    (version.major, version.minor, version.patch)
        >= (
            MINIMUM_PROTOCOL_VERSION.major,
            MINIMUM_PROTOCOL_VERSION.minor,
            MINIMUM_PROTOCOL_VERSION.patch,
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_exact_minimum() {
        assert!(meets_minimum(&Version::parse("64.0.0").unwrap()));
    }

    #[test]
    fn accepts_newer_versions() {
        assert!(meets_minimum(&Version::parse("64.1.0").unwrap()));
        assert!(meets_minimum(&Version::parse("65.0.0").unwrap()));
    }

    #[test]
    fn rejects_older_versions() {
        assert!(!meets_minimum(&Version::parse("63.9.9").unwrap()));
    }

    #[test]
    fn ignores_prerelease_suffix_when_comparing() {
        assert!(meets_minimum(&Version::parse("64.0.0-rc1").unwrap()));
        assert!(meets_minimum(&Version::parse("64.0.1-rc1").unwrap()));
    }
}
