//! Fake bpy module packager library.
//!
//! This crate drives the release pipeline of the fake bpy module: it
//! validates an invocation, runs the external stub generator for one Blender
//! version, archives the raw output, lays out a Python project, and invokes
//! `setup.py` to build distributions or a development install. It is used by
//! the `fake-bpy-packager` and `fake-bpy-build-all` binaries and can be driven
//! programmatically with a stub [`exec::CommandExecutor`] in tests.
//!
//! # Modules
//!
//! - [`aggregate`] - Gzip tarballs of the per-version outputs
//! - [`app`] - Entry flows shared by the binaries
//! - [`archive`] - Zip archives of raw generator output
//! - [`cli`] - Command-line argument definitions and validation
//! - [`config`] - Tool and path configuration
//! - [`error`] - Error types and exit-code mapping
//! - [`exec`] - External command execution
//! - [`generator`] - Stub generator invocation
//! - [`layout`] - Directory and file naming for a run
//! - [`mode`] - Develop and release modes
//! - [`output`] - Progress and summary lines
//! - [`packaging`] - `setup.py` invocations
//! - [`pipeline`] - Release and develop orchestration
//! - [`release_label`] - Date or environment-derived release label
//! - [`staging`] - Build directory preparation
//! - [`version`] - Supported Blender versions

pub mod aggregate;
pub mod app;
pub mod archive;
pub mod cli;
pub mod config;
pub mod error;
pub mod exec;
pub mod generator;
pub mod layout;
pub mod mode;
pub mod output;
pub mod packaging;
pub mod pipeline;
pub mod release_label;
pub mod staging;
pub mod version;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
