use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use colored::Colorize;
use crate::alias::{publish_alias, AliasKind, SymlinkSupport};
use crate::builder::Builder;
use crate::error::BdError;
use crate::manifest::{Binary, Manifest};
use crate::util::make_executable;

/// Whether an install ran the builder or reused an existing artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallStatus {
    Built,
    AlreadyInstalled,
}

/// Result of installing one declaration.
#[derive(Debug, Clone)]
pub struct Installed {
    pub name: String,
    pub artifact: PathBuf,
    pub alias: PathBuf,
    pub alias_kind: AliasKind,
    pub status: InstallStatus,
}

/// Removes the bin directory and everything in it. A missing directory is fine.
pub fn clean_bin_dir(bin_dir: &Path) -> Result<()> {
    match std::fs::remove_dir_all(bin_dir) {
        Ok(()) => {
            tracing::info!(dir = %bin_dir.display(), "cleaned bin directory");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("failed to clean {}", bin_dir.display())),
    }
}

/// Installs every declared binary into `bin_dir`, in manifest order.
///
/// Stops at the first failure; binaries after it are not attempted.
pub fn install_binaries(
    manifest: &Manifest,
    bin_dir: &Path,
    builder: &dyn Builder,
    links: &SymlinkSupport,
) -> Result<Vec<Installed>> {
    std::fs::create_dir_all(bin_dir)
        .with_context(|| format!("create bin dir {}", bin_dir.display()))?;
    let mut installed = Vec::with_capacity(manifest.binaries.len());
    for binary in &manifest.binaries {
        let result = install_binary(binary, bin_dir, builder, links)
            .with_context(|| format!("install binary {}", binary.name))?;
        installed.push(result);
    }
    println!("\nAll binaries installed in {}", bin_dir.display());
    Ok(installed)
}

/// Installs a single declaration and publishes its alias.
///
/// A pinned version whose artifact already exists is not rebuilt, but its
/// alias is published again. The scratch directory is removed on every path.
pub fn install_binary(
    binary: &Binary,
    bin_dir: &Path,
    builder: &dyn Builder,
    links: &SymlinkSupport,
) -> Result<Installed> {
    let artifact = binary.artifact_path(bin_dir);
    let alias = binary.alias_path(bin_dir);

    if artifact.exists() && !binary.is_latest() {
        let alias_kind = publish_alias(&artifact, &alias, links).context("publish alias")?;
        println!(
            "{} {} {}",
            "Already installed:".yellow(),
            binary.name.bold(),
            binary.display_version()
        );
        return Ok(Installed {
            name: binary.name.clone(),
            artifact,
            alias,
            alias_kind,
            status: InstallStatus::AlreadyInstalled,
        });
    }

    let scratch = tempfile::Builder::new()
        .prefix("bd-build")
        .tempdir()
        .context("failed to create temp directory")?;
    tracing::debug!(scratch = %scratch.path().display(), name = %binary.name, "building");

    builder.build(binary, scratch.path())?;

    let built = find_built_binary(scratch.path())?;
    move_file(&built, &artifact).context("move binary to final path")?;
    make_executable(&artifact)?;

    let alias_kind = publish_alias(&artifact, &alias, links).context("publish alias")?;
    println!(
        "{} {} {}",
        "Installed:".green(),
        binary.name.bold(),
        binary.display_version()
    );
    Ok(Installed {
        name: binary.name.clone(),
        artifact,
        alias,
        alias_kind,
        status: InstallStatus::Built,
    })
}

/// The first regular file, by name, in the scratch directory.
fn find_built_binary(scratch: &Path) -> Result<PathBuf> {
    let mut files = Vec::new();
    let entries = std::fs::read_dir(scratch)
        .with_context(|| format!("read {}", scratch.display()))?;
    for entry in entries {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    if files.len() > 1 {
        tracing::warn!(
            count = files.len(),
            dir = %scratch.display(),
            "builder produced several files, using the first"
        );
    }
    files
        .into_iter()
        .next()
        .ok_or_else(|| BdError::NoBuildOutput { dir: scratch.to_path_buf() }.into())
}

// Scratch lives in the system temp dir, which may be another filesystem.
fn move_file(from: &Path, to: &Path) -> Result<()> {
    match std::fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::CrossesDevices => {
            tracing::debug!(error = %e, "rename crosses filesystems, copying instead");
            std::fs::copy(from, to)
                .with_context(|| format!("copy {} to {}", from.display(), to.display()))?;
            std::fs::remove_file(from)
                .with_context(|| format!("remove {}", from.display()))?;
            Ok(())
        }
        Err(e) => Err(e)
            .with_context(|| format!("rename {} to {}", from.display(), to.display())),
    }
}
