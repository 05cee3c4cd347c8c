//! Invocation of the external stub generator.
//!
//! The generator (`gen_module.sh`) is an opaque subprocess that writes the
//! fake module tree into an `out/` directory relative to its working
//! directory. Release builds pass the Blender version as an extra argument;
//! development builds do not.

use crate::config::PackagerConfig;
use crate::error::Result;
use crate::exec::{CommandExecutor, run_checked};
use crate::layout::GENERATED_DIR;
use crate::mode::DeployMode;
use crate::version::BlenderVersion;
use camino::Utf8Path;

/// Inputs forwarded to the generator script.
#[derive(Debug, Clone, Copy)]
pub struct GeneratorRequest<'a> {
    /// Build flavour, which decides the argument list.
    pub mode: DeployMode,
    /// Blender version being generated.
    pub version: BlenderVersion,
    /// Absolute path to the generator's source checkout.
    pub source_dir: &'a Utf8Path,
    /// Absolute path to the Blender installation.
    pub blender_dir: &'a Utf8Path,
}

impl GeneratorRequest<'_> {
    /// Arguments passed after the script path.
    ///
    /// ```
    /// use camino::Utf8Path;
    /// use fake_bpy_packager::generator::GeneratorRequest;
    /// use fake_bpy_packager::mode::DeployMode;
    /// use fake_bpy_packager::version::BlenderVersion;
    ///
    /// let request = GeneratorRequest {
    ///     mode: DeployMode::Release,
    ///     version: BlenderVersion::try_from("2.79").expect("supported"),
    ///     source_dir: Utf8Path::new("/src/blender"),
    ///     blender_dir: Utf8Path::new("/opt/blender"),
    /// };
    /// assert_eq!(
    ///     request.arguments(),
    ///     ["/src/blender", "/opt/blender", "v2.79b", "2.79", "out"]
    /// );
    /// ```
    #[must_use]
    pub fn arguments(&self) -> Vec<&str> {
        let mut args = vec![
            self.source_dir.as_str(),
            self.blender_dir.as_str(),
            self.version.upstream_tag(),
        ];
        if self.mode == DeployMode::Release {
            args.push(self.version.as_str());
        }
        args.push(GENERATED_DIR);
        args
    }
}

/// Run the generator inside `cwd`.
///
/// # Errors
///
/// Returns [`crate::error::PackagerError::CommandFailed`] with the script's
/// exit code if generation fails.
pub fn run_generator(
    executor: &dyn CommandExecutor,
    config: &PackagerConfig,
    request: &GeneratorRequest<'_>,
    cwd: &Utf8Path,
) -> Result<()> {
    let script = config.generator_script();
    let mut args = vec![script.as_str()];
    args.extend(request.arguments());
    run_checked(executor, &config.shell, &args, cwd)
}
