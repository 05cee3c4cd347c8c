//! Error types for the fake bpy module packager.
//!
//! Errors fall into two groups. Bad invocations (wrong arguments, unsupported
//! mode or version, a leftover temporary directory) are detected before the
//! pipeline touches the filesystem and always exit with code 1. Subprocess
//! failures carry the exit code of the failing tool so the caller can
//! propagate it unchanged.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Exit code used for every failure that is not a subprocess exit code.
pub const FAILURE_EXIT_CODE: i32 = 1;

/// Errors that can occur while validating or running the pipeline.
#[derive(Debug, Error)]
pub enum PackagerError {
    /// The command line could not be parsed (wrong argument count, unknown flag).
    #[error("{message}")]
    InvalidInvocation {
        /// Usage text or parser diagnostic to show the user.
        message: String,
    },

    /// The deploy mode is neither `develop` nor `release`.
    #[error("{value} is not supported; supported modes: develop or release")]
    UnsupportedMode {
        /// The rejected mode string.
        value: String,
    },

    /// The requested Blender version is not in the supported set.
    #[error("{value} is not supported; supported versions: {supported}")]
    UnsupportedVersion {
        /// The rejected version string.
        value: String,
        /// Space-separated list of accepted versions.
        supported: String,
    },

    /// The release label cannot be used inside an archive filename.
    #[error("invalid release label \"{value}\": {reason}")]
    InvalidReleaseLabel {
        /// The rejected label.
        value: String,
        /// Description of the validation failure.
        reason: String,
    },

    /// The temporary working directory left by an earlier run still exists.
    #[error("{path} already exists; remove it before running again")]
    TempDirExists {
        /// Path of the existing temporary directory.
        path: Utf8PathBuf,
    },

    /// The packager configuration file could not be read or parsed.
    #[error("invalid configuration at {path}: {reason}")]
    InvalidConfig {
        /// Path to the configuration file.
        path: Utf8PathBuf,
        /// Description of the parse failure.
        reason: String,
    },

    /// An external command exited unsuccessfully.
    #[error("{program} failed with {}", describe_code(.code))]
    CommandFailed {
        /// The program that was run (e.g. `python3`).
        program: String,
        /// The exit code, or `None` when the process was killed by a signal.
        code: Option<i32>,
    },

    /// A file or directory the pipeline needs to read does not exist.
    #[error("required input {path} does not exist")]
    MissingInput {
        /// Path that was expected to exist.
        path: Utf8PathBuf,
    },

    /// A move would overwrite an existing file or directory.
    #[error("refusing to overwrite existing {path}")]
    DestinationExists {
        /// Path that already exists.
        path: Utf8PathBuf,
    },

    /// Writing a zip archive failed.
    #[error("failed to write zip archive {path}: {source}")]
    Archive {
        /// Path of the archive being written.
        path: Utf8PathBuf,
        /// The underlying zip error.
        #[source]
        source: zip::result::ZipError,
    },

    /// A path is not valid UTF-8.
    #[error("path is not valid UTF-8: {0}")]
    NonUtf8Path(std::path::PathBuf),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Test stub received an unexpected or mismatched command invocation.
    #[cfg(any(test, feature = "test-support"))]
    #[error("stub mismatch: {message}")]
    StubMismatch {
        /// Description of what was expected versus what was received.
        message: String,
    },
}

impl PackagerError {
    /// Return the process exit code this error maps to.
    ///
    /// Subprocess failures keep the subprocess's own exit code; everything
    /// else, including a subprocess killed by a signal, exits with 1.
    ///
    /// # Examples
    ///
    /// ```
    /// use fake_bpy_packager::error::PackagerError;
    ///
    /// let err = PackagerError::CommandFailed { program: "pandoc".to_owned(), code: Some(64) };
    /// assert_eq!(err.exit_code(), 64);
    ///
    /// let err = PackagerError::UnsupportedMode { value: "deploy".to_owned() };
    /// assert_eq!(err.exit_code(), 1);
    /// ```
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::CommandFailed {
                code: Some(code), ..
            } if *code != 0 => *code,
            _ => FAILURE_EXIT_CODE,
        }
    }

    /// Whether this error was raised before the pipeline started.
    #[must_use]
    pub fn is_bad_invocation(&self) -> bool {
        matches!(
            self,
            Self::InvalidInvocation { .. }
                | Self::UnsupportedMode { .. }
                | Self::UnsupportedVersion { .. }
                | Self::InvalidReleaseLabel { .. }
                | Self::TempDirExists { .. }
                | Self::InvalidConfig { .. }
        )
    }
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "a signal".to_owned(),
    }
}

/// Result type alias using [`PackagerError`].
pub type Result<T> = std::result::Result<T, PackagerError>;
