//! Gzip tarballs of the per-version outputs.
//!
//! After every version has been built, `raw_modules/` and `release/` are each
//! packed into a `<dir>.tar.gz` next to them for upload as build artefacts.

use crate::error::{PackagerError, Result};
use crate::layout::{RAW_MODULES_DIR, RELEASE_DIR};
use camino::{Utf8Path, Utf8PathBuf};
use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs;

/// Pack `source_dir` into `output_path` as a gzip-compressed tar.
///
/// Entries are rooted under the directory's own name, so `raw_modules/`
/// unpacks back into `raw_modules/`.
///
/// # Errors
///
/// Returns [`PackagerError::MissingInput`] if `source_dir` is not a
/// directory, or an I/O error if reading or writing fails.
pub fn create_tarball(source_dir: &Utf8Path, output_path: &Utf8Path) -> Result<()> {
    if !source_dir.is_dir() {
        return Err(PackagerError::MissingInput {
            path: source_dir.to_owned(),
        });
    }
    let Some(root_name) = source_dir.file_name() else {
        return Err(PackagerError::MissingInput {
            path: source_dir.to_owned(),
        });
    };

    let output_file = fs::File::create(output_path)?;
    let encoder = GzEncoder::new(output_file, Compression::default());
    let mut archive = tar::Builder::new(encoder);
    archive.append_dir_all(root_name, source_dir)?;
    archive.into_inner()?.finish()?;

    log::info!("packed {source_dir} into {output_path}");
    Ok(())
}

/// Pack `raw_modules/` and `release/` under `root` into tarballs in `root`.
///
/// Returns the two tarball paths in that order.
///
/// # Errors
///
/// Returns the first error from [`create_tarball`].
pub fn aggregate_outputs(root: &Utf8Path) -> Result<Vec<Utf8PathBuf>> {
    [RAW_MODULES_DIR, RELEASE_DIR]
        .into_iter()
        .map(|name| {
            let output = root.join(format!("{name}.tar.gz"));
            create_tarball(&root.join(name), &output)?;
            Ok(output)
        })
        .collect()
}
