//! Entry flows shared by the packager binaries.
//!
//! The binaries parse arguments and read the environment; everything after
//! that lives here so it can run against a stub executor in tests.

use crate::aggregate::aggregate_outputs;
use crate::cli::{BatchInvocation, Invocation};
use crate::config::PackagerConfig;
use crate::error::Result;
use crate::exec::CommandExecutor;
use crate::layout::PipelineLayout;
use crate::mode::DeployMode;
use crate::output::{batch_success_message, write_stderr_line};
use crate::pipeline::{PipelineContext, PipelineOutcome, run_pipeline};
use crate::release_label::ReleaseLabel;
use camino::{Utf8Path, Utf8PathBuf};
use std::io::Write;

/// Package one Blender version rooted at `root`.
///
/// Fails before running anything if the version's temporary directory is
/// still present, then loads the configuration and runs the pipeline.
///
/// # Errors
///
/// Returns [`crate::error::PackagerError::TempDirExists`],
/// [`crate::error::PackagerError::InvalidConfig`], or the first pipeline
/// failure.
pub fn package(
    invocation: &Invocation,
    root: &Utf8Path,
    label: &ReleaseLabel,
    executor: &dyn CommandExecutor,
    stderr: &mut dyn Write,
) -> Result<PipelineOutcome> {
    let layout = PipelineLayout::new(root, invocation.version, label);
    layout.ensure_temp_dir_absent()?;
    let config = PackagerConfig::load(root)?;

    let context = PipelineContext {
        executor,
        config: &config,
        layout: &layout,
        source_dir: &invocation.source_dir,
        blender_dir: &invocation.blender_dir,
        quiet: invocation.quiet,
    };
    run_pipeline(&context, invocation.mode, stderr)
}

/// Release every version in `batch`, then optionally aggregate the outputs.
///
/// Stops at the first failing version. Returns the tarball paths when
/// aggregation ran.
///
/// # Errors
///
/// Returns the first error from [`package`] or from aggregation.
pub fn build_all(
    batch: &BatchInvocation,
    root: &Utf8Path,
    label: &ReleaseLabel,
    executor: &dyn CommandExecutor,
    stderr: &mut dyn Write,
) -> Result<Vec<Utf8PathBuf>> {
    for version in &batch.versions {
        let invocation = Invocation {
            mode: DeployMode::Release,
            version: *version,
            source_dir: batch.source_dir.clone(),
            blender_dir: batch.blender_dir.clone(),
            quiet: batch.quiet,
        };
        package(&invocation, root, label, executor, stderr)?;
    }

    let tarballs = if batch.aggregate {
        aggregate_outputs(root)?
    } else {
        Vec::new()
    };

    if !batch.quiet {
        write_stderr_line(stderr, batch_success_message(batch.versions.len()));
        for tarball in &tarballs {
            write_stderr_line(stderr, format!("  - {tarball}"));
        }
    }
    Ok(tarballs)
}

/// The directory the process was started in.
///
/// # Errors
///
/// Returns an I/O error if it cannot be read, or
/// [`crate::error::PackagerError::NonUtf8Path`] if it is not UTF-8.
pub fn invocation_dir() -> Result<Utf8PathBuf> {
    let cwd = std::env::current_dir()?;
    Utf8PathBuf::from_path_buf(cwd).map_err(crate::error::PackagerError::NonUtf8Path)
}

/// Report `result` on `stderr` and map it to a process exit code.
#[must_use]
pub fn exit_code_for_run_result<T>(result: Result<T>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(_) => 0,
        Err(err) => {
            if err.is_bad_invocation() {
                log::debug!("rejected invocation: {err}");
            } else {
                log::debug!("run failed: {err}");
            }
            write_stderr_line(stderr, &err);
            err.exit_code()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PackagerError;
    use crate::test_utils::FakeTools;
    use crate::version::BlenderVersion;
    use rstest::{fixture, rstest};
    use std::fs;
    use tempfile::TempDir;

    struct Checkout {
        _dir: TempDir,
        root: Utf8PathBuf,
    }

    #[fixture]
    fn checkout() -> Checkout {
        let dir = tempfile::tempdir().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf8 temp dir");
        fs::create_dir_all(root.join("src")).expect("mkdir");
        for name in ["gen_module.sh", "setup.py", "MANIFEST.in"] {
            fs::write(root.join("src").join(name), "").expect("write");
        }
        fs::write(root.join("README.md"), "# readme\n").expect("write");
        Checkout { _dir: dir, root }
    }

    fn label() -> ReleaseLabel {
        ReleaseLabel::try_from("20200101").expect("valid")
    }

    fn batch(root: &Utf8Path, versions: &[&str], aggregate: bool) -> BatchInvocation {
        BatchInvocation {
            versions: versions
                .iter()
                .map(|v| BlenderVersion::try_from(*v).expect("supported"))
                .collect(),
            source_dir: root.join("blender-src"),
            blender_dir: root.join("blender"),
            aggregate,
            quiet: true,
        }
    }

    #[rstest]
    fn package_refuses_leftover_temp_dir_in_develop_mode(checkout: Checkout) {
        fs::create_dir(checkout.root.join("tmp-2.80")).expect("leftover");
        let invocation = Invocation {
            mode: DeployMode::Develop,
            version: BlenderVersion::try_from("2.80").expect("supported"),
            source_dir: Utf8PathBuf::from("/s"),
            blender_dir: Utf8PathBuf::from("/b"),
            quiet: true,
        };
        let tools = FakeTools::new();

        let err = package(&invocation, &checkout.root, &label(), &tools, &mut Vec::new())
            .expect_err("leftover temp dir");
        assert!(matches!(err, PackagerError::TempDirExists { .. }));
        assert!(tools.calls().is_empty());
        assert!(!checkout.root.join("raw_modules").exists());
    }

    #[rstest]
    fn package_rejects_bad_config_before_running_tools(checkout: Checkout) {
        fs::write(checkout.root.join("fake_bpy_packager.toml"), "zip = true\n").expect("write");
        let invocation = Invocation {
            mode: DeployMode::Release,
            version: BlenderVersion::try_from("2.79").expect("supported"),
            source_dir: Utf8PathBuf::from("/s"),
            blender_dir: Utf8PathBuf::from("/b"),
            quiet: true,
        };
        let tools = FakeTools::new();

        let err = package(&invocation, &checkout.root, &label(), &tools, &mut Vec::new())
            .expect_err("bad config");
        assert!(matches!(err, PackagerError::InvalidConfig { .. }));
        assert!(tools.calls().is_empty());
    }

    #[rstest]
    fn build_all_releases_each_version_and_aggregates(checkout: Checkout) {
        let tools = FakeTools::new();
        let batch = batch(&checkout.root, &["2.79", "2.80"], true);

        let tarballs = build_all(&batch, &checkout.root, &label(), &tools, &mut Vec::new())
            .expect("batch succeeds");

        let root = &checkout.root;
        assert!(root.join("raw_modules/fake_bpy_modules_2.79-20200101.zip").is_file());
        assert!(root.join("raw_modules/fake_bpy_modules_2.80-20200101.zip").is_file());
        assert!(root.join("release/2.79/dist").is_dir());
        assert!(root.join("release/2.80/dist").is_dir());
        assert_eq!(
            tarballs,
            vec![root.join("raw_modules.tar.gz"), root.join("release.tar.gz")]
        );
        assert!(tarballs.iter().all(|t| t.is_file()));
    }

    #[rstest]
    fn build_all_stops_at_first_failure(checkout: Checkout) {
        let tools = FakeTools::failing_at("2.80", 7);
        let batch = batch(&checkout.root, &["2.79", "2.80", "2.81"], true);

        let err = build_all(&batch, &checkout.root, &label(), &tools, &mut Vec::new())
            .expect_err("2.80 fails");

        assert_eq!(err.exit_code(), 7);
        assert!(checkout.root.join("release/2.79/dist").is_dir());
        assert!(!checkout.root.join("tmp-2.81").exists(), "2.81 never started");
        assert!(!checkout.root.join("raw_modules.tar.gz").exists());
    }

    #[rstest]
    fn build_all_can_skip_aggregation(checkout: Checkout) {
        let batch = batch(&checkout.root, &["2.82"], false);
        let mut stderr = Vec::new();
        let batch = BatchInvocation {
            quiet: false,
            ..batch
        };

        let tarballs = build_all(&batch, &checkout.root, &label(), &FakeTools::new(), &mut stderr)
            .expect("batch succeeds");

        assert!(tarballs.is_empty());
        assert!(!checkout.root.join("release.tar.gz").exists());
        let output = String::from_utf8(stderr).expect("utf8");
        assert!(output.contains("Packaged 1 Blender version"));
    }

    #[test]
    fn exit_code_for_run_result_returns_zero_on_success() {
        let mut stderr = Vec::new();
        assert_eq!(exit_code_for_run_result(Ok(()), &mut stderr), 0);
        assert!(stderr.is_empty());
    }

    #[rstest]
    #[case::validation(PackagerError::UnsupportedMode { value: "deploy".to_owned() }, 1, "deploy is not supported")]
    #[case::subprocess(PackagerError::CommandFailed { program: "python3".to_owned(), code: Some(2) }, 2, "python3 failed")]
    #[case::signal(PackagerError::CommandFailed { program: "bash".to_owned(), code: None }, 1, "bash failed")]
    fn exit_code_for_run_result_reports_error(
        #[case] err: PackagerError,
        #[case] expected_code: i32,
        #[case] expected_text: &str,
    ) {
        let mut stderr = Vec::new();
        let code = exit_code_for_run_result::<()>(Err(err), &mut stderr);
        assert_eq!(code, expected_code);
        let text = String::from_utf8(stderr).expect("stderr was not UTF-8");
        assert_eq!(text.matches(expected_text).count(), 1, "{text}");
        assert!(text.ends_with('\n'), "{text}");
    }
}
