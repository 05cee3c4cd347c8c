//! Deploy mode selection.
//!
//! `release` builds distributable packages in a throwaway directory;
//! `develop` installs the package in place for local iteration.

use crate::error::{PackagerError, Result};
use std::fmt;
use std::str::FromStr;

/// How the generated module is turned into a Python package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeployMode {
    /// Install the package in development mode inside `release/`.
    Develop,
    /// Build a source distribution and a wheel in a temporary directory.
    Release,
}

impl DeployMode {
    /// Return the mode as it appears on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Develop => "develop",
            Self::Release => "release",
        }
    }
}

impl FromStr for DeployMode {
    type Err = PackagerError;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "develop" => Ok(Self::Develop),
            "release" => Ok(Self::Release),
            other => Err(PackagerError::UnsupportedMode {
                value: other.to_owned(),
            }),
        }
    }
}

impl fmt::Display for DeployMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
