//! Schema version gating for cost estimate files

use crate::CostfoldError;
use semver::Version;

/// Oldest document schema this build can combine
pub const MIN_OUTPUT_VERSION: &str = "0.1";

/// Newest document schema this build can combine; also the tag written on output
pub const MAX_OUTPUT_VERSION: &str = "0.1";

/// Parse a schema version, accepting an optional `v` prefix and
/// short forms such as `0.1` (read as `0.1.0`).
pub fn parse_schema_version(version: &str) -> Option<Version> {
    let bare = version.strip_prefix('v').unwrap_or(version);

    // Only the release part may be shortened; pre-release and build
    // suffixes hang off the patch number.
    let split_at = bare.find(['-', '+']).unwrap_or(bare.len());
    let (release, suffix) = bare.split_at(split_at);
    let components = release.split('.').count();
    let padded = match components {
        1 => format!("{}.0.0{}", release, suffix),
        2 => format!("{}.0{}", release, suffix),
        _ => bare.to_string(),
    };

    Version::parse(&padded).ok()
}

/// Check that `version` falls inside the supported range, inclusive.
/// Unparseable versions, including ones with surrounding whitespace, are
/// treated as out of range.
pub fn check_output_version(version: &str) -> bool {
    let (Some(v), Some(min), Some(max)) = (
        parse_schema_version(version),
        parse_schema_version(MIN_OUTPUT_VERSION),
        parse_schema_version(MAX_OUTPUT_VERSION),
    ) else {
        return false;
    };
    // Precedence ignores build metadata, unlike `Ord` on `Version`.
    v.cmp_precedence(&min).is_ge() && v.cmp_precedence(&max).is_le()
}

/// Fail with the batch-aborting error when `version` is out of range.
pub fn ensure_supported(version: &str) -> Result<(), CostfoldError> {
    if check_output_version(version) {
        Ok(())
    } else {
        Err(CostfoldError::UnsupportedVersion {
            version: version.to_string(),
            min: MIN_OUTPUT_VERSION,
            max: MAX_OUTPUT_VERSION,
        })
    }
}
