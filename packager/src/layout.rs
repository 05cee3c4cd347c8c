//! Directory and file naming for a pipeline run.
//!
//! All paths are derived from the invocation directory, the Blender version,
//! and the release label. Nothing here touches the filesystem except
//! [`PipelineLayout::ensure_temp_dir_absent`], which only probes.

use crate::error::{PackagerError, Result};
use crate::release_label::ReleaseLabel;
use crate::version::BlenderVersion;
use camino::{Utf8Path, Utf8PathBuf};

/// Directory receiving the zipped raw generator output.
pub const RAW_MODULES_DIR: &str = "raw_modules";

/// Directory receiving the built distributions.
pub const RELEASE_DIR: &str = "release";

/// Directory name the generator writes into, relative to its working directory.
pub const GENERATED_DIR: &str = "out";

/// Directory `setup.py` writes distributions into.
pub const DIST_DIR: &str = "dist";

/// Prefix shared by raw-module archive names and their root directory.
const ARCHIVE_PREFIX: &str = "fake_bpy_modules";

/// Every path a single pipeline run reads or writes.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use fake_bpy_packager::layout::PipelineLayout;
/// use fake_bpy_packager::release_label::ReleaseLabel;
/// use fake_bpy_packager::version::BlenderVersion;
///
/// let version = BlenderVersion::try_from("2.79").expect("supported");
/// let label = ReleaseLabel::try_from("20200101").expect("valid");
/// let layout = PipelineLayout::new(Utf8Path::new("/work"), version, &label);
///
/// assert_eq!(layout.archive_file_name(), "fake_bpy_modules_2.79-20200101.zip");
/// assert_eq!(layout.temp_dir(), Utf8Path::new("/work/tmp-2.79"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineLayout {
    root: Utf8PathBuf,
    version: BlenderVersion,
    archive_stem: String,
}

impl PipelineLayout {
    /// Derive the layout for `version` and `label` rooted at `root`.
    #[must_use]
    pub fn new(root: &Utf8Path, version: BlenderVersion, label: &ReleaseLabel) -> Self {
        Self {
            root: root.to_owned(),
            version,
            archive_stem: format!("{ARCHIVE_PREFIX}_{version}-{label}"),
        }
    }

    /// The Blender version this layout was derived for.
    #[must_use]
    pub const fn version(&self) -> BlenderVersion {
        self.version
    }

    /// Per-version temporary working directory (`tmp-<version>`).
    #[must_use]
    pub fn temp_dir(&self) -> Utf8PathBuf {
        self.root.join(format!("tmp-{}", self.version))
    }

    /// `raw_modules/` under the root.
    #[must_use]
    pub fn raw_modules_dir(&self) -> Utf8PathBuf {
        self.root.join(RAW_MODULES_DIR)
    }

    /// `release/` under the root.
    #[must_use]
    pub fn release_dir(&self) -> Utf8PathBuf {
        self.root.join(RELEASE_DIR)
    }

    /// `release/<version>/`, the parent of the moved `dist/` directory.
    #[must_use]
    pub fn version_release_dir(&self) -> Utf8PathBuf {
        self.release_dir().join(self.version.as_str())
    }

    /// Name of the top-level directory inside the raw-module archive.
    #[must_use]
    pub fn archive_root_name(&self) -> &str {
        &self.archive_stem
    }

    /// File name of the raw-module archive.
    #[must_use]
    pub fn archive_file_name(&self) -> String {
        format!("{}.zip", self.archive_stem)
    }

    /// Final location of the raw-module archive.
    #[must_use]
    pub fn archive_path(&self) -> Utf8PathBuf {
        self.raw_modules_dir().join(self.archive_file_name())
    }

    /// Fail if the temporary directory left by an earlier run still exists.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::TempDirExists`] when anything exists at
    /// [`Self::temp_dir`].
    pub fn ensure_temp_dir_absent(&self) -> Result<()> {
        let path = self.temp_dir();
        if path.exists() {
            return Err(PackagerError::TempDirExists { path });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn layout() -> PipelineLayout {
        PipelineLayout::new(
            Utf8Path::new("/work"),
            BlenderVersion::try_from("2.80").expect("supported"),
            &ReleaseLabel::try_from("20200101").expect("valid"),
        )
    }

    #[rstest]
    fn directories_hang_off_root(layout: PipelineLayout) {
        assert_eq!(layout.raw_modules_dir(), Utf8PathBuf::from("/work/raw_modules"));
        assert_eq!(layout.release_dir(), Utf8PathBuf::from("/work/release"));
        assert_eq!(
            layout.version_release_dir(),
            Utf8PathBuf::from("/work/release/2.80")
        );
    }

    #[rstest]
    fn temp_dir_is_keyed_by_version(layout: PipelineLayout) {
        assert_eq!(layout.temp_dir(), Utf8PathBuf::from("/work/tmp-2.80"));
    }

    #[rstest]
    fn archive_lands_in_raw_modules(layout: PipelineLayout) {
        assert_eq!(layout.archive_root_name(), "fake_bpy_modules_2.80-20200101");
        assert_eq!(
            layout.archive_path(),
            Utf8PathBuf::from("/work/raw_modules/fake_bpy_modules_2.80-20200101.zip")
        );
    }

    #[test]
    fn different_versions_get_different_temp_dirs() {
        let label = ReleaseLabel::try_from("x").expect("valid");
        let a = PipelineLayout::new(
            Utf8Path::new("/work"),
            BlenderVersion::try_from("2.79").expect("supported"),
            &label,
        );
        let b = PipelineLayout::new(
            Utf8Path::new("/work"),
            BlenderVersion::try_from("2.81").expect("supported"),
            &label,
        );
        assert_ne!(a.temp_dir(), b.temp_dir());
    }

    #[test]
    fn ensure_temp_dir_absent_detects_leftovers() {
        let dir = tempfile::tempdir().expect("temp dir");
        let root = Utf8Path::from_path(dir.path()).expect("utf8 temp dir");
        let layout = PipelineLayout::new(
            root,
            BlenderVersion::try_from("2.79").expect("supported"),
            &ReleaseLabel::try_from("20200101").expect("valid"),
        );

        layout.ensure_temp_dir_absent().expect("nothing there yet");

        std::fs::create_dir(layout.temp_dir()).expect("create leftover");
        let err = layout.ensure_temp_dir_absent().expect_err("leftover detected");
        assert!(matches!(err, PackagerError::TempDirExists { path } if path == layout.temp_dir()));
    }
}
