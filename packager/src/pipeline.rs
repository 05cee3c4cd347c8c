//! Release and develop pipeline orchestration.
//!
//! The runner executes one build strictly in sequence. Any failure aborts the
//! run without rolling anything back; a release build leaves its temporary
//! directory in place so the generator output can be inspected.

use crate::archive::zip_directory;
use crate::config::PackagerConfig;
use crate::error::Result;
use crate::exec::CommandExecutor;
use crate::generator::{GeneratorRequest, run_generator};
use crate::layout::PipelineLayout;
use crate::mode::DeployMode;
use crate::output::{
    develop_success_message, release_success_message, start_message, write_stderr_line,
};
use crate::packaging::{SetupCommand, run_setup};
use crate::staging::Stager;
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use std::io::Write;

/// Everything one pipeline run needs.
pub struct PipelineContext<'a> {
    /// Runs the generator, pandoc, and `setup.py`.
    pub executor: &'a dyn CommandExecutor,
    /// Locations of scripts and tools.
    pub config: &'a PackagerConfig,
    /// Paths derived from the invocation directory, version, and label.
    pub layout: &'a PipelineLayout,
    /// Absolute path to the generator's source checkout.
    pub source_dir: &'a Utf8Path,
    /// Absolute path to the Blender installation.
    pub blender_dir: &'a Utf8Path,
    /// Suppress progress output.
    pub quiet: bool,
}

/// Artefacts produced by a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutcome {
    /// The raw-module zip in `raw_modules/`.
    pub archive: Utf8PathBuf,
    /// `release/<version>/dist` for release builds; `None` for develop.
    pub dist: Option<Utf8PathBuf>,
}

/// Run the pipeline for `mode`.
///
/// # Errors
///
/// Returns the first error raised by any step. Subprocess failures carry the
/// subprocess's exit code.
pub fn run_pipeline(
    context: &PipelineContext<'_>,
    mode: DeployMode,
    stderr: &mut dyn Write,
) -> Result<PipelineOutcome> {
    progress(context, stderr, start_message(mode, context.layout.version()));
    match mode {
        DeployMode::Release => run_release(context, stderr),
        DeployMode::Develop => run_develop(context, stderr),
    }
}

fn run_release(context: &PipelineContext<'_>, stderr: &mut dyn Write) -> Result<PipelineOutcome> {
    let layout = context.layout;
    create_output_dirs(layout)?;

    let temp_dir = layout.temp_dir();
    layout.ensure_temp_dir_absent()?;
    fs::create_dir(&temp_dir)?;
    log::info!("created working directory {temp_dir}");

    let result = release_in(context, &temp_dir, stderr);
    if result.is_err() {
        log::warn!("leaving {temp_dir} in place for inspection");
    }
    let outcome = result?;

    fs::remove_dir_all(&temp_dir)?;
    log::info!("removed working directory {temp_dir}");
    if let Some(dist) = &outcome.dist {
        progress(context, stderr, release_success_message(layout.version(), dist));
    }
    Ok(outcome)
}

fn release_in(
    context: &PipelineContext<'_>,
    work_dir: &Utf8Path,
    stderr: &mut dyn Write,
) -> Result<PipelineOutcome> {
    let archive = generate_and_stage(context, DeployMode::Release, work_dir, stderr)?;
    let stager = Stager::new(work_dir);

    for command in SetupCommand::RELEASE {
        progress(context, stderr, format!("Running setup.py {}...", command.as_str()));
        run_setup(context.executor, context.config, command, work_dir)?;
    }

    let dist = stager.publish_dist(&context.layout.version_release_dir())?;
    log::info!("published distributions to {dist}");
    Ok(PipelineOutcome {
        archive,
        dist: Some(dist),
    })
}

fn run_develop(context: &PipelineContext<'_>, stderr: &mut dyn Write) -> Result<PipelineOutcome> {
    let layout = context.layout;
    create_output_dirs(layout)?;

    let work_dir = layout.release_dir();
    let archive = generate_and_stage(context, DeployMode::Develop, &work_dir, stderr)?;

    progress(context, stderr, "Running setup.py develop...");
    run_setup(
        context.executor,
        context.config,
        SetupCommand::Develop,
        &work_dir,
    )?;

    progress(
        context,
        stderr,
        develop_success_message(layout.version(), &work_dir),
    );
    Ok(PipelineOutcome {
        archive,
        dist: None,
    })
}

/// Generate, archive, and lay out a Python project in `work_dir`.
///
/// Returns the final archive path.
fn generate_and_stage(
    context: &PipelineContext<'_>,
    mode: DeployMode,
    work_dir: &Utf8Path,
    stderr: &mut dyn Write,
) -> Result<Utf8PathBuf> {
    let layout = context.layout;
    let request = GeneratorRequest {
        mode,
        version: layout.version(),
        source_dir: context.source_dir,
        blender_dir: context.blender_dir,
    };

    progress(context, stderr, "Generating modules...");
    run_generator(context.executor, context.config, &request, work_dir)?;

    let stager = Stager::new(work_dir);
    progress(context, stderr, format!("Archiving {}...", layout.archive_file_name()));
    let local_archive = work_dir.join(layout.archive_file_name());
    let summary = zip_directory(
        &stager.generated_dir(),
        layout.archive_root_name(),
        &local_archive,
    )?;
    let archive = layout.archive_path();
    fs::rename(&summary.path, &archive)?;
    log::info!("archived {} file(s) to {archive}", summary.files);

    stager.promote_generated()?;
    stager.copy_packaging_files(context.config)?;
    progress(context, stderr, "Converting README to reStructuredText...");
    stager.convert_readme(context.executor, context.config)?;
    Ok(archive)
}

fn create_output_dirs(layout: &PipelineLayout) -> Result<()> {
    fs::create_dir_all(layout.raw_modules_dir())?;
    fs::create_dir_all(layout.release_dir())?;
    Ok(())
}

fn progress(context: &PipelineContext<'_>, stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if !context.quiet {
        write_stderr_line(stderr, message);
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
