//! Supported Blender versions and their upstream release tags.
//!
//! Only versions with a known Blender source tag can be generated. Any other
//! version is rejected at construction time with the full supported list.

use crate::error::{PackagerError, Result};
use std::fmt;

/// Supported Blender versions paired with the Blender git tag to check out.
const SUPPORTED_VERSIONS: &[(&str, &str)] = &[
    ("2.78", "v2.78c"),
    ("2.79", "v2.79b"),
    ("2.80", "v2.80"),
    ("2.81", "v2.81a"),
    ("2.82", "v2.82a"),
];

/// A validated Blender version from the supported set.
///
/// # Examples
///
/// ```
/// use fake_bpy_packager::version::BlenderVersion;
///
/// let version: BlenderVersion = "2.79".try_into().expect("supported version");
/// assert_eq!(version.upstream_tag(), "v2.79b");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlenderVersion {
    version: &'static str,
    tag: &'static str,
}

impl BlenderVersion {
    /// Return the version as a string slice (e.g. `2.79`).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        self.version
    }

    /// Return the Blender source tag the generator checks out (e.g. `v2.79b`).
    #[must_use]
    pub const fn upstream_tag(&self) -> &'static str {
        self.tag
    }

    /// Return every supported version in ascending order.
    pub fn all() -> impl Iterator<Item = Self> {
        SUPPORTED_VERSIONS
            .iter()
            .map(|&(version, tag)| Self { version, tag })
    }

    /// Return the supported versions joined by spaces, for diagnostics.
    #[must_use]
    pub fn supported_list() -> String {
        SUPPORTED_VERSIONS
            .iter()
            .map(|(version, _)| *version)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl TryFrom<&str> for BlenderVersion {
    type Error = PackagerError;

    fn try_from(value: &str) -> Result<Self> {
        Self::all()
            .find(|v| v.version == value)
            .ok_or_else(|| PackagerError::UnsupportedVersion {
                value: value.to_owned(),
                supported: Self::supported_list(),
            })
    }
}

impl AsRef<str> for BlenderVersion {
    fn as_ref(&self) -> &str {
        self.version
    }
}

impl fmt::Display for BlenderVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.version)
    }
}
