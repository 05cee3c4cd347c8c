//! User-facing progress and summary lines.
//!
//! Progress is written to an injected writer (stderr in the binaries) rather
//! than through print macros, so the text can be asserted in tests.

use crate::mode::DeployMode;
use crate::version::BlenderVersion;
use camino::Utf8Path;
use std::fmt;
use std::io::Write;

/// Write one line to `stderr`, ignoring write failures.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort output; nothing sensible to do on failure.
    }
}

/// Banner printed before a pipeline run starts.
#[must_use]
pub fn start_message(mode: DeployMode, version: BlenderVersion) -> String {
    format!("Packaging fake bpy module for Blender {version} ({mode})...")
}

/// Summary printed after a release build.
///
/// ```
/// use camino::Utf8Path;
/// use fake_bpy_packager::output::release_success_message;
/// use fake_bpy_packager::version::BlenderVersion;
///
/// let version = BlenderVersion::try_from("2.80").expect("supported");
/// let message = release_success_message(version, Utf8Path::new("release/2.80/dist"));
/// assert_eq!(message, "Released fake bpy module for Blender 2.80 to release/2.80/dist");
/// ```
#[must_use]
pub fn release_success_message(version: BlenderVersion, dist_dir: &Utf8Path) -> String {
    format!("Released fake bpy module for Blender {version} to {dist_dir}")
}

/// Summary printed after a development install.
#[must_use]
pub fn develop_success_message(version: BlenderVersion, work_dir: &Utf8Path) -> String {
    format!("Installed fake bpy module for Blender {version} in development mode from {work_dir}")
}

/// Summary printed by the batch driver.
#[must_use]
pub fn batch_success_message(count: usize) -> String {
    let plural = if count == 1 { "version" } else { "versions" };
    format!("Packaged {count} Blender {plural}")
}
