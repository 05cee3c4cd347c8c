//! Tool and path configuration for the packaging pipeline.
//!
//! The pipeline's collaborators (the generator script, packaging metadata,
//! the readme, and the external tools) live at fixed places in a checkout.
//! `PackagerConfig` records those places. Values are read from an optional
//! `fake_bpy_packager.toml` in the invocation directory and fall back to the
//! layout of the upstream repository when the file or a key is absent.

use crate::error::{PackagerError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;

/// Name of the optional configuration file looked up in the invocation directory.
pub const CONFIG_FILE_NAME: &str = "fake_bpy_packager.toml";

/// Generator script invoked for every build.
pub const GENERATOR_SCRIPT: &str = "gen_module.sh";

/// Packaging metadata copied next to the generated module.
pub const PACKAGING_FILES: &[&str] = &["setup.py", "MANIFEST.in"];

/// Locations of the scripts and tools the pipeline shells out to.
///
/// # Examples
///
/// ```
/// use fake_bpy_packager::config::PackagerConfig;
///
/// let config: PackagerConfig = toml::from_str("python = \"python3.8\"").expect("valid toml");
/// assert_eq!(config.python, "python3.8");
/// assert_eq!(config.pandoc, "pandoc");
/// ```
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PackagerConfig {
    /// Directory holding `gen_module.sh`, `setup.py`, and `MANIFEST.in`.
    pub script_dir: Utf8PathBuf,
    /// Markdown readme converted to `README.rst`.
    pub readme: Utf8PathBuf,
    /// Shell used to run the generator script.
    pub shell: String,
    /// Python interpreter that runs `setup.py`.
    pub python: String,
    /// Document converter used for the readme.
    pub pandoc: String,
}

impl Default for PackagerConfig {
    fn default() -> Self {
        Self {
            script_dir: Utf8PathBuf::from("src"),
            readme: Utf8PathBuf::from("README.md"),
            shell: "bash".to_owned(),
            python: "python3".to_owned(),
            pandoc: "pandoc".to_owned(),
        }
    }
}

impl PackagerConfig {
    /// Load the configuration for an invocation rooted at `root`.
    ///
    /// Reads `root/fake_bpy_packager.toml` when it exists and returns the
    /// defaults otherwise. Relative paths are resolved against `root`.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::InvalidConfig`] if the file exists but cannot
    /// be read or parsed.
    pub fn load(root: &Utf8Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE_NAME);
        let config = if path.is_file() {
            let contents =
                std::fs::read_to_string(&path).map_err(|e| PackagerError::InvalidConfig {
                    path: path.clone(),
                    reason: e.to_string(),
                })?;
            Self::parse(&path, &contents)?
        } else {
            log::debug!("no {CONFIG_FILE_NAME} in {root}; using defaults");
            Self::default()
        };
        Ok(config.resolved_against(root))
    }

    /// Parse configuration text read from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::InvalidConfig`] on TOML syntax errors or
    /// unknown keys.
    pub fn parse(path: &Utf8Path, contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| PackagerError::InvalidConfig {
            path: path.to_owned(),
            reason: e.message().to_owned(),
        })
    }

    /// Return a copy with relative paths anchored at `root`.
    #[must_use]
    pub fn resolved_against(mut self, root: &Utf8Path) -> Self {
        if self.script_dir.is_relative() {
            self.script_dir = root.join(&self.script_dir);
        }
        if self.readme.is_relative() {
            self.readme = root.join(&self.readme);
        }
        self
    }

    /// Path to the generator script.
    #[must_use]
    pub fn generator_script(&self) -> Utf8PathBuf {
        self.script_dir.join(GENERATOR_SCRIPT)
    }

    /// Paths to the packaging metadata files copied into the build directory.
    pub fn packaging_files(&self) -> impl Iterator<Item = Utf8PathBuf> + '_ {
        PACKAGING_FILES
            .iter()
            .map(move |name| self.script_dir.join(name))
    }
}
