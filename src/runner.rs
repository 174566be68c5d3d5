use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use crate::error::BdError;
use crate::manifest::Manifest;

/// Finds the installed artifact declared under `name`.
///
/// The first declaration with a matching name wins.
///
/// # Errors
/// [`BdError::NotDeclared`] if no declaration matches,
/// [`BdError::NotInstalled`] if the artifact is missing on disk.
pub fn locate(manifest: &Manifest, bin_dir: &Path, name: &str) -> Result<PathBuf, BdError> {
    let binary = manifest
        .find(name)
        .ok_or_else(|| BdError::NotDeclared { name: name.to_string() })?;
    let artifact = binary.artifact_path(bin_dir);
    if !artifact.exists() {
        return Err(BdError::NotInstalled { name: name.to_string() });
    }
    Ok(artifact)
}

/// Runs `path` with inherited stdio and returns its exit code.
pub fn run_binary<S: AsRef<std::ffi::OsStr>>(path: &Path, args: &[S]) -> Result<i32, BdError> {
    tracing::debug!(path = %path.display(), "executing");
    let status = Command::new(path)
        .args(args)
        .status()
        .map_err(|source| BdError::Launch { path: path.to_path_buf(), source })?;
    Ok(exit_code(status))
}

/// Locates the binary declared under `name` and runs it.
pub fn exec_binary<S: AsRef<std::ffi::OsStr>>(
    manifest: &Manifest,
    bin_dir: &Path,
    name: &str,
    args: &[S],
) -> Result<i32, BdError> {
    let artifact = locate(manifest, bin_dir, name)?;
    run_binary(&artifact, args)
}

#[cfg(unix)]
fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status
        .code()
        .or_else(|| status.signal().map(|signal| 128 + signal))
        .unwrap_or(1)
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}
