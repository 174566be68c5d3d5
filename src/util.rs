use std::path::{Path, PathBuf};
use anyhow::Result;
use crate::manifest::Binary;

#[cfg(windows)]
pub const EXEC_SUFFIX: &str = ".exe";
#[cfg(not(windows))]
pub const EXEC_SUFFIX: &str = "";

/// File name of the version-pinned artifact: `<name>-<version>[-<toolchain>]`
/// plus the platform executable suffix.
pub fn artifact_file_name(name: &str, version: &str, toolchain: Option<&str>) -> String {
    match toolchain {
        Some(toolchain) => format!("{name}-{version}-{toolchain}{EXEC_SUFFIX}"),
        None => format!("{name}-{version}{EXEC_SUFFIX}"),
    }
}

/// File name of the version-agnostic alias.
pub fn alias_file_name(name: &str) -> String {
    format!("{name}{EXEC_SUFFIX}")
}

impl Binary {
    /// Path of the installed artifact under `bin_dir`.
    pub fn artifact_path(&self, bin_dir: &Path) -> PathBuf {
        bin_dir.join(artifact_file_name(
            &self.name,
            &self.version,
            self.toolchain.as_deref(),
        ))
    }

    /// Path of the stable alias under `bin_dir`.
    pub fn alias_path(&self, bin_dir: &Path) -> PathBuf {
        bin_dir.join(alias_file_name(&self.name))
    }

    /// Version as shown in progress lines, e.g. `v1.2.0 (go1.22.1)`.
    pub fn display_version(&self) -> String {
        match &self.toolchain {
            Some(toolchain) => format!("{} ({})", self.version, toolchain),
            None => self.version.clone(),
        }
    }
}

/// Sets the executable bits on Unix. A no-op elsewhere.
#[cfg(unix)]
pub fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let mut permissions = std::fs::metadata(path)?.permissions();
    let mode = permissions.mode();
    if mode & 0o111 != 0o111 {
        permissions.set_mode(mode | 0o755);
        std::fs::set_permissions(path, permissions)?;
    }
    Ok(())
}

#[cfg(not(unix))]
pub fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}
