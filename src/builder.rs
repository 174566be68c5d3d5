use std::ffi::OsString;
use std::path::Path;
use std::process::Command;
use anyhow::{bail, Context, Result};
use crate::manifest::Binary;

/// Environment variable overriding the `go` program used for builds.
pub const GO_ENV: &str = "BD_GO";

/// Produces the binary for one declaration inside `out_dir`.
///
/// Implementations must leave exactly one file in `out_dir` on success.
pub trait Builder {
    fn build(&self, binary: &Binary, out_dir: &Path) -> Result<()>;
}

/// Builds binaries with `go install <package>@<version>`.
///
/// `GOBIN` points at the scratch directory, `GOTOOLCHAIN` pins the
/// toolchain when the declaration carries one. Output is streamed live.
#[derive(Debug, Clone)]
pub struct GoInstall {
    program: OsString,
}

impl GoInstall {
    pub fn new<S: Into<OsString>>(program: S) -> Self {
        Self { program: program.into() }
    }

    /// Uses `$BD_GO` when set and non-empty, `go` from `PATH` otherwise.
    pub fn from_env() -> Self {
        match std::env::var_os(GO_ENV) {
            Some(program) if !program.is_empty() => Self::new(program),
            _ => Self::new("go"),
        }
    }

    fn command(&self, binary: &Binary, out_dir: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("install")
            .arg(format!("{}@{}", binary.package, binary.version))
            .env("GOBIN", out_dir);
        if let Some(toolchain) = &binary.toolchain {
            cmd.env("GOTOOLCHAIN", toolchain);
        }
        cmd
    }
}

impl Builder for GoInstall {
    fn build(&self, binary: &Binary, out_dir: &Path) -> Result<()> {
        let mut cmd = self.command(binary, out_dir);
        tracing::debug!(command = ?cmd, "running builder");
        let status = cmd
            .status()
            .with_context(|| format!("run {}", self.program.to_string_lossy()))?;
        if !status.success() {
            bail!("go install {}: {}", binary.package, status);
        }
        Ok(())
    }
}
