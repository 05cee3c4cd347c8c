//! Shared test utilities for the packager crate.

use crate::error::{PackagerError, Result};
use crate::exec::CommandExecutor;
use camino::{Utf8Path, Utf8PathBuf};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::process::ExitStatus;

/// Creates an `ExitStatus` from an exit code (Unix implementation).
#[cfg(unix)]
#[must_use]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;

    ExitStatus::from_raw(code << 8)
}

/// Creates an `ExitStatus` from an exit code (Windows implementation).
#[cfg(windows)]
#[must_use]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;

    #[expect(clippy::cast_sign_loss, reason = "test exit codes are non-negative")]
    ExitStatus::from_raw(code as u32)
}

/// Represents an expected command invocation for testing.
#[derive(Debug)]
pub struct ExpectedCall {
    /// The command to execute (e.g., "python3").
    pub cmd: String,
    /// The arguments to pass to the command.
    pub args: Vec<String>,
    /// The working directory the command must run in.
    pub cwd: Utf8PathBuf,
    /// The result to return when this command is invoked.
    pub result: Result<ExitStatus>,
}

impl ExpectedCall {
    /// Creates an expected call from borrowed parts.
    #[must_use]
    pub fn new(
        cmd: &str,
        args: Vec<&str>,
        cwd: impl Into<Utf8PathBuf>,
        result: Result<ExitStatus>,
    ) -> Self {
        Self {
            cmd: cmd.to_owned(),
            args: args.into_iter().map(str::to_owned).collect(),
            cwd: cwd.into(),
            result,
        }
    }
}

/// A stub implementation of `CommandExecutor` for testing.
///
/// Records expected command invocations and returns predefined results,
/// allowing tests to verify command execution without side effects.
/// Mismatched invocations are reported as [`PackagerError::StubMismatch`].
#[derive(Debug)]
pub struct StubExecutor {
    expected: RefCell<VecDeque<ExpectedCall>>,
}

impl StubExecutor {
    /// Creates a new `StubExecutor` with the given expected calls.
    #[must_use]
    pub fn new(expected: Vec<ExpectedCall>) -> Self {
        Self {
            expected: RefCell::new(expected.into()),
        }
    }

    /// Asserts that all expected command invocations have been consumed.
    ///
    /// # Panics
    ///
    /// Panics if there are remaining expected calls that were not invoked.
    pub fn assert_finished(&self) {
        assert!(
            self.expected.borrow().is_empty(),
            "expected no further command invocations"
        );
    }
}

impl CommandExecutor for StubExecutor {
    fn run(&self, cmd: &str, args: &[&str], cwd: &Utf8Path) -> Result<ExitStatus> {
        let mut expected = self.expected.borrow_mut();
        let Some(call) = expected.pop_front() else {
            return Err(PackagerError::StubMismatch {
                message: format!("unexpected invocation of `{cmd} {}`", args.join(" ")),
            });
        };

        if call.cmd != cmd || call.args != args || call.cwd.as_path() != cwd {
            return Err(PackagerError::StubMismatch {
                message: format!(
                    "expected `{} {}` in {}, got `{cmd} {}` in {cwd}",
                    call.cmd,
                    call.args.join(" "),
                    call.cwd,
                    args.join(" ")
                ),
            });
        }

        call.result
    }
}

/// One command invocation observed by [`FakeTools`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// Program name.
    pub cmd: String,
    /// Arguments in order.
    pub args: Vec<String>,
    /// Working directory.
    pub cwd: Utf8PathBuf,
}

/// Executor that imitates the generator, pandoc, and `setup.py`.
///
/// Every call is recorded. The generator writes a small module tree into
/// `out/`, pandoc writes `README.rst`, and `setup.py sdist`/`bdist_wheel`
/// drop a file into `dist/`. A failure can be injected for any call whose
/// program or arguments contain a given word.
#[derive(Debug, Default)]
pub struct FakeTools {
    calls: RefCell<Vec<RecordedCall>>,
    failure: Option<(String, i32)>,
}

impl FakeTools {
    /// Tools that always succeed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tools that exit with `code` on the first call mentioning `word`.
    #[must_use]
    pub fn failing_at(word: &str, code: i32) -> Self {
        Self {
            calls: RefCell::default(),
            failure: Some((word.to_owned(), code)),
        }
    }

    /// Calls observed so far.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.borrow().clone()
    }

    fn should_fail(&self, cmd: &str, args: &[&str]) -> Option<i32> {
        let (word, code) = self.failure.as_ref()?;
        let mentioned = cmd.contains(word.as_str()) || args.iter().any(|a| a.contains(word.as_str()));
        mentioned.then_some(*code)
    }
}

impl CommandExecutor for FakeTools {
    fn run(&self, cmd: &str, args: &[&str], cwd: &Utf8Path) -> Result<ExitStatus> {
        self.calls.borrow_mut().push(RecordedCall {
            cmd: cmd.to_owned(),
            args: args.iter().map(|a| (*a).to_owned()).collect(),
            cwd: cwd.to_owned(),
        });

        if let Some(code) = self.should_fail(cmd, args) {
            return Ok(exit_status(code));
        }

        match args {
            [script, .., out] if script.ends_with(crate::config::GENERATOR_SCRIPT) => {
                let out = cwd.join(out);
                std::fs::create_dir_all(out.join("bpy"))?;
                std::fs::write(out.join("bpy/__init__.py"), "from . import types\n")?;
                std::fs::write(out.join("mathutils.py"), "class Vector: ...\n")?;
            }
            ["setup.py", "sdist"] => write_dist(cwd, "fake-bpy-module.tar.gz")?,
            ["setup.py", "bdist_wheel"] => write_dist(cwd, "fake_bpy_module-py3-none-any.whl")?,
            [.., "-o", output, _] => std::fs::write(cwd.join(output), "fake-bpy-module\n")?,
            _ => {}
        }
        Ok(exit_status(0))
    }
}

fn write_dist(cwd: &Utf8Path, name: &str) -> Result<()> {
    let dist = cwd.join(crate::layout::DIST_DIR);
    std::fs::create_dir_all(&dist)?;
    std::fs::write(dist.join(name), name)?;
    Ok(())
}
