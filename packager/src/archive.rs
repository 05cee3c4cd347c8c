//! Zip archives of the raw generator output.
//!
//! The generated module tree is zipped under a single top-level directory
//! named after the version and release label, so unpacking the archive never
//! scatters files into the current directory.

use crate::error::{PackagerError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use std::io;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Summary of a written zip archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZipSummary {
    /// Path of the archive on disk.
    pub path: Utf8PathBuf,
    /// Number of file entries (directories excluded).
    pub files: usize,
}

/// Zip `source_dir` into `output_path`, rooting every entry at `root_name/`.
///
/// Entries are written in sorted walk order with `/` separators. Directory
/// entries are included so empty packages survive the round trip.
///
/// # Errors
///
/// Returns [`PackagerError::MissingInput`] if `source_dir` is not a
/// directory, [`PackagerError::Archive`] if the zip writer fails, or
/// [`PackagerError::Io`] if a source file cannot be read.
pub fn zip_directory(
    source_dir: &Utf8Path,
    root_name: &str,
    output_path: &Utf8Path,
) -> Result<ZipSummary> {
    if !source_dir.is_dir() {
        return Err(PackagerError::MissingInput {
            path: source_dir.to_owned(),
        });
    }

    let archive_err = |source| PackagerError::Archive {
        path: output_path.to_owned(),
        source,
    };

    let output_file = fs::File::create(output_path)?;
    let mut writer = ZipWriter::new(output_file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut files = 0;

    for entry in WalkDir::new(source_dir).sort_by_file_name() {
        let entry = entry.map_err(io::Error::from)?;
        let relative = entry
            .path()
            .strip_prefix(source_dir)
            .map_err(|_| PackagerError::NonUtf8Path(entry.path().to_path_buf()))?;
        let relative = Utf8Path::from_path(relative)
            .ok_or_else(|| PackagerError::NonUtf8Path(entry.path().to_path_buf()))?;
        let name = entry_name(root_name, relative);

        if entry.file_type().is_dir() {
            writer
                .add_directory(format!("{name}/"), options)
                .map_err(archive_err)?;
        } else {
            writer.start_file(name, options).map_err(archive_err)?;
            let mut source = fs::File::open(entry.path())?;
            io::copy(&mut source, &mut writer)?;
            files += 1;
        }
    }

    writer.finish().map_err(archive_err)?;
    log::debug!("wrote {files} file(s) from {source_dir} to {output_path}");

    Ok(ZipSummary {
        path: output_path.to_owned(),
        files,
    })
}

/// Build the archive entry name for `relative` under `root_name`.
fn entry_name(root_name: &str, relative: &Utf8Path) -> String {
    let mut name = root_name.to_owned();
    for component in relative.components() {
        name.push('/');
        name.push_str(component.as_str());
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn utf8(path: &std::path::Path) -> &Utf8Path {
        Utf8Path::from_path(path).expect("utf8 temp path")
    }

    fn entry_names(path: &Utf8Path) -> Vec<String> {
        let file = fs::File::open(path).expect("open archive");
        let archive = zip::ZipArchive::new(file).expect("read archive");
        archive.file_names().map(str::to_owned).collect()
    }

    #[test]
    fn entries_are_rooted_under_archive_name() {
        let dir = tempfile::tempdir().expect("temp dir");
        let root = utf8(dir.path());
        let source = root.join("out");
        fs::create_dir_all(source.join("bpy/types")).expect("mkdir");
        fs::write(source.join("bpy/__init__.py"), "import bpy.types\n").expect("write");
        fs::write(source.join("bpy/types/__init__.py"), "class Object: ...\n").expect("write");
        fs::write(source.join("mathutils.py"), "class Vector: ...\n").expect("write");

        let output = root.join("modules.zip");
        let summary = zip_directory(&source, "fake_bpy_modules_2.79-20200101", &output)
            .expect("zip succeeds");

        assert_eq!(summary.files, 3);
        assert_eq!(summary.path, output);
        let mut names = entry_names(&output);
        names.sort();
        assert_eq!(
            names,
            vec![
                "fake_bpy_modules_2.79-20200101/",
                "fake_bpy_modules_2.79-20200101/bpy/",
                "fake_bpy_modules_2.79-20200101/bpy/__init__.py",
                "fake_bpy_modules_2.79-20200101/bpy/types/",
                "fake_bpy_modules_2.79-20200101/bpy/types/__init__.py",
                "fake_bpy_modules_2.79-20200101/mathutils.py",
            ]
        );
    }

    #[test]
    fn file_contents_survive() {
        let dir = tempfile::tempdir().expect("temp dir");
        let root = utf8(dir.path());
        let source = root.join("out");
        fs::create_dir_all(&source).expect("mkdir");
        fs::write(source.join("bgl.py"), "GL_BLEND = 3042\n").expect("write");

        let output = root.join("modules.zip");
        zip_directory(&source, "root", &output).expect("zip succeeds");

        let file = fs::File::open(&output).expect("open archive");
        let mut archive = zip::ZipArchive::new(file).expect("read archive");
        let mut entry = archive.by_name("root/bgl.py").expect("entry present");
        let mut contents = String::new();
        entry.read_to_string(&mut contents).expect("read entry");
        assert_eq!(contents, "GL_BLEND = 3042\n");
    }

    #[test]
    fn missing_source_is_reported() {
        let dir = tempfile::tempdir().expect("temp dir");
        let root = utf8(dir.path());
        let err = zip_directory(&root.join("absent"), "root", &root.join("x.zip"))
            .expect_err("missing source");
        assert!(matches!(err, PackagerError::MissingInput { .. }));
        assert!(!root.join("x.zip").exists(), "no archive is created");
    }

    #[test]
    fn entry_name_joins_components_with_slashes() {
        assert_eq!(entry_name("root", Utf8Path::new("")), "root");
        assert_eq!(entry_name("root", Utf8Path::new("a/b.py")), "root/a/b.py");
    }
}
