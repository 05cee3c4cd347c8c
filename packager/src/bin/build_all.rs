//! Batch driver that releases every supported Blender version.
//!
//! Runs the release pipeline once per version with a shared release label,
//! then packs `raw_modules/` and `release/` into tarballs.

use fake_bpy_packager::app::{build_all, exit_code_for_run_result, invocation_dir};
use fake_bpy_packager::cli::{BuildAllCli, parse_args};
use fake_bpy_packager::error::Result;
use fake_bpy_packager::exec::SystemCommandExecutor;
use fake_bpy_packager::release_label::ReleaseLabel;
use std::io::Write;

fn main() {
    env_logger::init();
    let mut stderr = std::io::stderr();
    let cli = match parse_args::<BuildAllCli, _, _>(std::env::args_os()) {
        Ok(Ok(cli)) => cli,
        Ok(Err(informational)) => informational.exit(),
        Err(err) => std::process::exit(exit_code_for_run_result::<()>(Err(err), &mut stderr)),
    };
    let exit_code = exit_code_for_run_result(run(&cli, &mut stderr), &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &BuildAllCli, stderr: &mut dyn Write) -> Result<()> {
    let root = invocation_dir()?;
    let batch = cli.validate(&root)?;
    let label = ReleaseLabel::from_env()?;
    log::info!(
        "releasing {} Blender version(s) with label {label}",
        batch.versions.len()
    );
    build_all(&batch, &root, &label, &SystemCommandExecutor, stderr)?;
    Ok(())
}
