use std::path::Path;
use anyhow::{Context, Result};
use bd::alias::SymlinkSupport;
use bd::builder::GoInstall;
use bd::installer::{clean_bin_dir, install_binaries};
use bd::manifest::{Manifest, MANIFEST_FILE_NAME};
use bd::runner::exec_binary;
use crate::cli::{BdCommand, CLI};

/// Runs a parsed command line and returns the process exit code.
pub fn execute(cli: CLI) -> Result<i32> {
    let cwd = std::env::current_dir().context("Failed to resolve BinDir")?;
    let manifest = Manifest::load_from_dir(&cwd)
        .with_context(|| format!("Failed to load {MANIFEST_FILE_NAME}"))?;
    let bin_dir = manifest.resolve_bin_dir(&cwd);
    tracing::debug!(
        bin_dir = %bin_dir.display(),
        binaries = manifest.binaries.len(),
        "loaded manifest"
    );

    match cli.command {
        BdCommand::Install { clean } => {
            execute_install(&manifest, &bin_dir, clean)?;
            Ok(0)
        }
        BdCommand::Exec { name, args } => {
            Ok(exec_binary(&manifest, &bin_dir, &name, &args)?)
        }
    }
}

pub fn execute_install(manifest: &Manifest, bin_dir: &Path, clean: bool) -> Result<()> {
    if clean {
        clean_bin_dir(bin_dir)?;
    }
    let builder = GoInstall::from_env();
    let links = SymlinkSupport::detect();
    install_binaries(manifest, bin_dir, &builder, &links)
        .context("Failed to install binaries")?;
    Ok(())
}
