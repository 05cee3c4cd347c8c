//! Laying out a build directory for `setup.py`.
//!
//! After the generator has run, the working directory is turned into a Python
//! project: the generated modules are promoted out of `out/`, packaging
//! metadata is copied in, and the readme is converted to reStructuredText.
//! Once `setup.py` has produced `dist/`, the stager moves it into the release
//! tree.

use crate::config::PackagerConfig;
use crate::error::{PackagerError, Result};
use crate::exec::{CommandExecutor, run_checked};
use crate::layout::{DIST_DIR, GENERATED_DIR};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

/// Name of the converted readme `setup.py` reads as its long description.
pub const README_RST: &str = "README.rst";

/// Prepares one working directory for packaging.
#[derive(Debug, Clone)]
pub struct Stager {
    work_dir: Utf8PathBuf,
}

impl Stager {
    /// Create a stager operating on `work_dir`.
    #[must_use]
    pub fn new(work_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
        }
    }

    /// Path of the generator output inside the working directory.
    #[must_use]
    pub fn generated_dir(&self) -> Utf8PathBuf {
        self.work_dir.join(GENERATED_DIR)
    }

    /// Move every entry of `out/` up into the working directory and delete
    /// the emptied `out/`.
    ///
    /// Returns the number of promoted entries.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::MissingInput`] if the generator produced no
    /// `out/` directory, [`PackagerError::DestinationExists`] if an entry
    /// would overwrite something already in the working directory, or an I/O
    /// error.
    pub fn promote_generated(&self) -> Result<usize> {
        let generated = self.generated_dir();
        if !generated.is_dir() {
            return Err(PackagerError::MissingInput { path: generated });
        }

        let mut promoted = 0;
        for entry in generated.read_dir_utf8()? {
            let entry = entry?;
            let dest = self.work_dir.join(entry.file_name());
            move_path(entry.path(), &dest)?;
            promoted += 1;
        }

        fs::remove_dir(&generated)?;
        log::debug!("promoted {promoted} entries out of {generated}");
        Ok(promoted)
    }

    /// Copy `setup.py` and `MANIFEST.in` from the script directory.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::MissingInput`] for a missing metadata file,
    /// or an I/O error if the copy fails.
    pub fn copy_packaging_files(&self, config: &PackagerConfig) -> Result<()> {
        for source in config.packaging_files() {
            let Some(name) = source.file_name() else {
                return Err(PackagerError::MissingInput { path: source });
            };
            if !source.is_file() {
                return Err(PackagerError::MissingInput { path: source });
            }
            let dest = self.work_dir.join(name);
            fs::copy(&source, &dest)?;
            log::debug!("copied {source} to {dest}");
        }
        Ok(())
    }

    /// Convert the project readme to `README.rst` with pandoc.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::MissingInput`] if the readme does not exist,
    /// or [`PackagerError::CommandFailed`] if pandoc fails.
    pub fn convert_readme(
        &self,
        executor: &dyn CommandExecutor,
        config: &PackagerConfig,
    ) -> Result<()> {
        if !config.readme.is_file() {
            return Err(PackagerError::MissingInput {
                path: config.readme.clone(),
            });
        }
        run_checked(
            executor,
            &config.pandoc,
            &[
                "-f",
                "markdown",
                "-t",
                "rst",
                "-o",
                README_RST,
                config.readme.as_str(),
            ],
            &self.work_dir,
        )
    }

    /// Move `dist/` into `release_dir`, yielding `release_dir/dist`.
    ///
    /// `release_dir` is created if needed.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::MissingInput`] if `setup.py` produced no
    /// `dist/`, [`PackagerError::DestinationExists`] if the release already
    /// holds a `dist/`, or an I/O error.
    pub fn publish_dist(&self, release_dir: &Utf8Path) -> Result<Utf8PathBuf> {
        let dist = self.work_dir.join(DIST_DIR);
        if !dist.is_dir() {
            return Err(PackagerError::MissingInput { path: dist });
        }
        fs::create_dir_all(release_dir)?;
        let dest = release_dir.join(DIST_DIR);
        move_path(&dist, &dest)?;
        Ok(dest)
    }
}

/// Rename `from` to `to`, refusing to replace an existing path.
///
/// # Errors
///
/// Returns [`PackagerError::DestinationExists`] when `to` exists, or the
/// underlying I/O error from the rename.
pub fn move_path(from: &Utf8Path, to: &Utf8Path) -> Result<()> {
    if to.exists() {
        return Err(PackagerError::DestinationExists { path: to.to_owned() });
    }
    fs::rename(from, to)?;
    log::debug!("moved {from} to {to}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{ExpectedCall, StubExecutor, exit_status};
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    struct Workspace {
        _dir: TempDir,
        root: Utf8PathBuf,
    }

    #[fixture]
    fn workspace() -> Workspace {
        let dir = tempfile::tempdir().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf8 temp dir");
        Workspace { _dir: dir, root }
    }

    #[rstest]
    fn promote_moves_entries_and_removes_out(workspace: Workspace) {
        let work = workspace.root.join("tmp-2.79");
        fs::create_dir_all(work.join("out/bpy")).expect("mkdir");
        fs::write(work.join("out/bpy/__init__.py"), "").expect("write");
        fs::write(work.join("out/bgl.py"), "").expect("write");

        let stager = Stager::new(&work);
        let promoted = stager.promote_generated().expect("promote succeeds");

        assert_eq!(promoted, 2);
        assert!(work.join("bpy/__init__.py").is_file());
        assert!(work.join("bgl.py").is_file());
        assert!(!work.join("out").exists());
    }

    #[rstest]
    fn promote_requires_generator_output(workspace: Workspace) {
        let err = Stager::new(&workspace.root)
            .promote_generated()
            .expect_err("no out dir");
        assert!(matches!(err, PackagerError::MissingInput { path } if path.ends_with("out")));
    }

    #[rstest]
    fn promote_refuses_to_clobber(workspace: Workspace) {
        let work = &workspace.root;
        fs::create_dir_all(work.join("out")).expect("mkdir");
        fs::write(work.join("out/bgl.py"), "new").expect("write");
        fs::write(work.join("bgl.py"), "old").expect("write");

        let err = Stager::new(work).promote_generated().expect_err("clobber");
        assert!(matches!(err, PackagerError::DestinationExists { .. }));
        assert_eq!(fs::read_to_string(work.join("bgl.py")).expect("read"), "old");
    }

    #[rstest]
    fn packaging_files_are_copied(workspace: Workspace) {
        let root = &workspace.root;
        fs::create_dir_all(root.join("src")).expect("mkdir");
        fs::write(root.join("src/setup.py"), "setup()").expect("write");
        fs::write(root.join("src/MANIFEST.in"), "include README.rst").expect("write");
        let work = root.join("tmp-2.80");
        fs::create_dir(&work).expect("mkdir");
        let config = PackagerConfig::default().resolved_against(root);

        Stager::new(&work)
            .copy_packaging_files(&config)
            .expect("copy succeeds");

        assert_eq!(fs::read_to_string(work.join("setup.py")).expect("read"), "setup()");
        assert!(work.join("MANIFEST.in").is_file());
    }

    #[rstest]
    fn missing_manifest_is_reported(workspace: Workspace) {
        let root = &workspace.root;
        fs::create_dir_all(root.join("src")).expect("mkdir");
        fs::write(root.join("src/setup.py"), "setup()").expect("write");
        let config = PackagerConfig::default().resolved_against(root);

        let err = Stager::new(root)
            .copy_packaging_files(&config)
            .expect_err("manifest missing");
        assert!(
            matches!(err, PackagerError::MissingInput { path } if path.as_str().ends_with("MANIFEST.in"))
        );
    }

    #[rstest]
    fn readme_is_converted_in_work_dir(workspace: Workspace) {
        let root = &workspace.root;
        fs::write(root.join("README.md"), "# fake-bpy-module").expect("write");
        let config = PackagerConfig::default().resolved_against(root);
        let work = root.join("tmp-2.82");
        let readme = root.join("README.md");
        let executor = StubExecutor::new(vec![ExpectedCall::new(
            "pandoc",
            vec!["-f", "markdown", "-t", "rst", "-o", "README.rst", readme.as_str()],
            work.clone(),
            Ok(exit_status(0)),
        )]);

        Stager::new(&work)
            .convert_readme(&executor, &config)
            .expect("pandoc succeeds");
        executor.assert_finished();
    }

    #[rstest]
    fn missing_readme_skips_pandoc(workspace: Workspace) {
        let config = PackagerConfig::default().resolved_against(&workspace.root);
        let executor = StubExecutor::new(vec![]);

        let err = Stager::new(&workspace.root)
            .convert_readme(&executor, &config)
            .expect_err("readme missing");
        assert!(matches!(err, PackagerError::MissingInput { .. }));
    }

    #[rstest]
    fn dist_moves_under_version_release_dir(workspace: Workspace) {
        let root = &workspace.root;
        let work = root.join("tmp-2.79");
        fs::create_dir_all(work.join("dist")).expect("mkdir");
        fs::write(work.join("dist/fake_bpy_module_2.79-20200101.tar.gz"), "").expect("write");

        let dest = Stager::new(&work)
            .publish_dist(&root.join("release/2.79"))
            .expect("publish succeeds");

        assert_eq!(dest, root.join("release/2.79/dist"));
        assert!(dest.join("fake_bpy_module_2.79-20200101.tar.gz").is_file());
        assert!(!work.join("dist").exists());
    }

    #[rstest]
    fn existing_release_dist_is_an_error(workspace: Workspace) {
        let root = &workspace.root;
        let work = root.join("tmp-2.79");
        fs::create_dir_all(work.join("dist")).expect("mkdir");
        fs::create_dir_all(root.join("release/2.79/dist")).expect("mkdir");

        let err = Stager::new(&work)
            .publish_dist(&root.join("release/2.79"))
            .expect_err("destination exists");
        assert!(matches!(err, PackagerError::DestinationExists { .. }));
        assert!(work.join("dist").is_dir(), "source left in place");
    }
}
