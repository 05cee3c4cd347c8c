//! External command execution.
//!
//! Every collaborator the pipeline shells out to (the generator script,
//! `pandoc`, and `setup.py`) runs through [`CommandExecutor`], so tests can
//! substitute a stub and the pipeline never changes the process working
//! directory.

use crate::error::{PackagerError, Result};
use camino::Utf8Path;
use std::process::{Command, ExitStatus};

/// Abstraction for running external commands.
pub trait CommandExecutor {
    /// Runs `cmd` with `args` inside `cwd` and returns its exit status.
    ///
    /// Standard output and standard error are inherited so tool progress
    /// reaches the operator directly.
    ///
    /// # Errors
    ///
    /// Returns any I/O errors encountered while spawning or waiting for the
    /// command.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use camino::Utf8Path;
    /// use fake_bpy_packager::exec::{CommandExecutor, SystemCommandExecutor};
    ///
    /// let executor = SystemCommandExecutor;
    /// let status = executor.run("python3", &["--version"], Utf8Path::new("."))?;
    /// assert!(status.success());
    /// # Ok::<(), fake_bpy_packager::error::PackagerError>(())
    /// ```
    fn run(&self, cmd: &str, args: &[&str], cwd: &Utf8Path) -> Result<ExitStatus>;
}

/// Executes commands on the host system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandExecutor;

impl CommandExecutor for SystemCommandExecutor {
    fn run(&self, cmd: &str, args: &[&str], cwd: &Utf8Path) -> Result<ExitStatus> {
        Command::new(cmd)
            .args(args)
            .current_dir(cwd.as_std_path())
            .status()
            .map_err(PackagerError::from)
    }
}

/// Runs a command and converts an unsuccessful exit into an error.
///
/// # Errors
///
/// Returns [`PackagerError::CommandFailed`] carrying the command's exit code
/// when it does not succeed, or the executor's own error if it could not be
/// started.
pub fn run_checked(
    executor: &dyn CommandExecutor,
    cmd: &str,
    args: &[&str],
    cwd: &Utf8Path,
) -> Result<()> {
    log::debug!("running `{cmd} {}` in {cwd}", args.join(" "));
    let status = executor.run(cmd, args, cwd)?;

    if status.success() {
        return Ok(());
    }

    log::debug!("`{cmd}` exited with {status}");
    Err(PackagerError::CommandFailed {
        program: cmd.to_owned(),
        code: status.code(),
    })
}
