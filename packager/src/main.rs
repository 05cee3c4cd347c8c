//! Fake bpy module packager CLI entrypoint.
//!
//! Packages the fake bpy module for a single Blender version, either as
//! release distributions or as a development install.

use fake_bpy_packager::app::{exit_code_for_run_result, invocation_dir, package};
use fake_bpy_packager::cli::{Cli, parse_args};
use fake_bpy_packager::error::Result;
use fake_bpy_packager::exec::SystemCommandExecutor;
use fake_bpy_packager::release_label::ReleaseLabel;
use std::io::Write;

fn main() {
    env_logger::init();
    let mut stderr = std::io::stderr();
    let cli = match parse_args::<Cli, _, _>(std::env::args_os()) {
        Ok(Ok(cli)) => cli,
        Ok(Err(informational)) => informational.exit(),
        Err(err) => std::process::exit(exit_code_for_run_result::<()>(Err(err), &mut stderr)),
    };
    let exit_code = exit_code_for_run_result(run(&cli, &mut stderr), &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &Cli, stderr: &mut dyn Write) -> Result<()> {
    let root = invocation_dir()?;
    let invocation = cli.validate(&root)?;
    let label = ReleaseLabel::from_env()?;
    log::info!(
        "packaging Blender {} in {} mode with label {label}",
        invocation.version,
        invocation.mode
    );
    package(&invocation, &root, &label, &SystemCommandExecutor, stderr)?;
    Ok(())
}
