//! CLI argument definitions for the packager binaries.
//!
//! Clap handles the argument count and help text; the values themselves are
//! validated into an [`Invocation`] afterwards so the error messages and exit
//! codes match the rest of the pipeline.

use crate::error::{PackagerError, Result};
use crate::mode::DeployMode;
use crate::version::BlenderVersion;
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use clap::error::ErrorKind;
use std::ffi::OsString;

/// Build and package the fake bpy module for one Blender version.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "fake-bpy-packager")]
#[command(version, about)]
#[command(after_help = concat!(
    "SUPPORTED VERSIONS:\n",
    "  2.78 2.79 2.80 2.81 2.82\n\n",
    "ENVIRONMENT:\n",
    "  RELEASE_VERSION   Label embedded in archive names [default: today, YYYYMMDD]\n",
    "  RUST_LOG          Log verbosity (e.g. info, debug)\n\n",
    "EXAMPLES:\n",
    "  Build release distributions for Blender 2.79:\n",
    "    $ fake-bpy-packager release 2.79 ~/src/blender ~/blender-2.79b\n\n",
    "  Install a development build for Blender 2.80:\n",
    "    $ fake-bpy-packager develop 2.80 ~/src/blender ~/blender-2.80",
))]
pub struct Cli {
    /// Deploy mode: `develop` or `release`.
    #[arg(value_name = "MODE")]
    pub mode: String,

    /// Blender version to generate modules for.
    #[arg(value_name = "VERSION")]
    pub blender_version: String,

    /// Blender source checkout handed to the generator.
    #[arg(value_name = "SOURCE_DIR")]
    pub source_dir: Utf8PathBuf,

    /// Blender installation handed to the generator.
    #[arg(value_name = "BLENDER_DIR")]
    pub blender_dir: Utf8PathBuf,

    /// Suppress progress output.
    #[arg(short, long)]
    pub quiet: bool,
}

/// Build and package the fake bpy module for several Blender versions.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "fake-bpy-build-all")]
#[command(about)]
pub struct BuildAllCli {
    /// Blender source checkout handed to the generator.
    #[arg(value_name = "SOURCE_DIR")]
    pub source_dir: Utf8PathBuf,

    /// Blender installation handed to the generator.
    #[arg(value_name = "BLENDER_DIR")]
    pub blender_dir: Utf8PathBuf,

    /// Version to build (repeatable) [default: every supported version].
    #[arg(long = "version", value_name = "VERSION")]
    pub versions: Vec<String>,

    /// Skip packing `raw_modules/` and `release/` into tarballs.
    #[arg(long)]
    pub no_aggregate: bool,

    /// Suppress progress output.
    #[arg(short, long)]
    pub quiet: bool,
}

/// A validated single-version invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Requested build flavour.
    pub mode: DeployMode,
    /// Requested Blender version.
    pub version: BlenderVersion,
    /// Absolute source checkout path.
    pub source_dir: Utf8PathBuf,
    /// Absolute Blender installation path.
    pub blender_dir: Utf8PathBuf,
    /// Suppress progress output.
    pub quiet: bool,
}

/// A validated batch invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchInvocation {
    /// Versions to build, in order.
    pub versions: Vec<BlenderVersion>,
    /// Absolute source checkout path.
    pub source_dir: Utf8PathBuf,
    /// Absolute Blender installation path.
    pub blender_dir: Utf8PathBuf,
    /// Whether to pack the outputs into tarballs afterwards.
    pub aggregate: bool,
    /// Suppress progress output.
    pub quiet: bool,
}

impl Cli {
    /// Validate the raw arguments, resolving relative paths against `cwd`.
    ///
    /// The mode is checked before the version.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::UnsupportedMode`] or
    /// [`PackagerError::UnsupportedVersion`].
    pub fn validate(&self, cwd: &Utf8Path) -> Result<Invocation> {
        let mode = self.mode.parse::<DeployMode>()?;
        let version = BlenderVersion::try_from(self.blender_version.as_str())?;
        Ok(Invocation {
            mode,
            version,
            source_dir: absolute(cwd, &self.source_dir),
            blender_dir: absolute(cwd, &self.blender_dir),
            quiet: self.quiet,
        })
    }
}

impl BuildAllCli {
    /// Validate the raw arguments, resolving relative paths against `cwd`.
    ///
    /// An empty version list selects every supported version. Duplicates are
    /// dropped, keeping the first occurrence.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::UnsupportedVersion`] for the first unknown
    /// version.
    pub fn validate(&self, cwd: &Utf8Path) -> Result<BatchInvocation> {
        let versions = if self.versions.is_empty() {
            BlenderVersion::all().collect()
        } else {
            let mut versions: Vec<BlenderVersion> = Vec::with_capacity(self.versions.len());
            for raw in &self.versions {
                let version = BlenderVersion::try_from(raw.as_str())?;
                if !versions.contains(&version) {
                    versions.push(version);
                }
            }
            versions
        };
        Ok(BatchInvocation {
            versions,
            source_dir: absolute(cwd, &self.source_dir),
            blender_dir: absolute(cwd, &self.blender_dir),
            aggregate: !self.no_aggregate,
            quiet: self.quiet,
        })
    }
}

/// Parse command-line arguments for a binary.
///
/// Help and version requests are returned as `Ok(Err(_))` so the caller can
/// let clap print them and exit successfully. Every other parse failure,
/// including a wrong number of positional arguments, becomes
/// [`PackagerError::InvalidInvocation`].
///
/// # Errors
///
/// Returns [`PackagerError::InvalidInvocation`] carrying clap's rendered
/// diagnostic and usage text.
pub fn parse_args<P, I, T>(args: I) -> Result<std::result::Result<P, clap::Error>>
where
    P: Parser,
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match P::try_parse_from(args) {
        Ok(parsed) => Ok(Ok(parsed)),
        Err(err) if is_informational(&err) => Ok(Err(err)),
        Err(err) => Err(PackagerError::InvalidInvocation {
            message: err.render().to_string().trim_end().to_owned(),
        }),
    }
}

fn is_informational(err: &clap::Error) -> bool {
    matches!(
        err.kind(),
        ErrorKind::DisplayHelp
            | ErrorKind::DisplayVersion
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
    )
}

fn absolute(cwd: &Utf8Path, path: &Utf8Path) -> Utf8PathBuf {
    if path.is_absolute() {
        path.to_owned()
    } else {
        cwd.join(path)
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
