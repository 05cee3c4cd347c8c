//! `setup.py` invocations.

use crate::config::PackagerConfig;
use crate::error::Result;
use crate::exec::{CommandExecutor, run_checked};
use camino::Utf8Path;

const SETUP_SCRIPT: &str = "setup.py";

/// A `setup.py` command the pipeline runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupCommand {
    /// Build a source distribution into `dist/`.
    Sdist,
    /// Build a wheel into `dist/`.
    BdistWheel,
    /// Install the package in development mode.
    Develop,
}

impl SetupCommand {
    /// Commands run for a release build, in order.
    pub const RELEASE: [Self; 2] = [Self::Sdist, Self::BdistWheel];

    /// The `setup.py` subcommand name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sdist => "sdist",
            Self::BdistWheel => "bdist_wheel",
            Self::Develop => "develop",
        }
    }
}

/// Run `python setup.py <command>` inside `work_dir`.
///
/// # Errors
///
/// Returns [`crate::error::PackagerError::CommandFailed`] carrying the
/// interpreter's exit code on failure.
pub fn run_setup(
    executor: &dyn CommandExecutor,
    config: &PackagerConfig,
    command: SetupCommand,
    work_dir: &Utf8Path,
) -> Result<()> {
    run_checked(
        executor,
        &config.python,
        &[SETUP_SCRIPT, command.as_str()],
        work_dir,
    )
}
