use std::path::{Path, PathBuf};
use serde::Deserialize;
use anyhow::{Context, Result};
use crate::error::BdError;

/// File name of the manifest, looked up in the working directory.
pub const MANIFEST_FILE_NAME: &str = "bd.json";
/// Version sentinel meaning "always rebuild".
pub const LATEST: &str = "latest";
/// Target directory used when the manifest does not name one.
pub const DEFAULT_BIN_DIR: &str = "bin";

/// Represents the contents of a `bd.json` file.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct Manifest {
    /// Declared binaries, in installation order.
    #[serde(default)]
    pub binaries: Vec<Binary>,
    /// Directory receiving the artifacts and their aliases, relative to the manifest.
    #[serde(rename = "binDir", default)]
    pub bin_dir: String,
}

/// One declared binary.
///
/// After [`Binary::normalize`] the package never contains `@`,
/// and both `version` and `name` are non-empty.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Binary {
    /// Package identifier handed to the builder, e.g. `golang.org/x/tools/cmd/stringer`.
    pub package: String,
    /// Pinned version, or [`LATEST`].
    #[serde(default)]
    pub version: String,
    /// Logical name used for lookups and file names.
    #[serde(default)]
    pub name: String,
    /// Optional toolchain pinned for this build only.
    #[serde(default)]
    pub toolchain: Option<String>,
}

impl Manifest {
    /// Loads and normalizes a manifest from a file path.
    ///
    /// # Errors
    /// Returns an error if the file can't be read, isn't valid JSON,
    /// or one of its entries fails normalization.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Manifest> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "loading manifest");
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("read {}", path.display()))?;
        Manifest::from_json(&content)
            .with_context(|| format!("load {}", path.display()))
    }

    /// Loads `bd.json` from the given directory.
    pub fn load_from_dir<P: AsRef<Path>>(dir: P) -> Result<Manifest> {
        Manifest::load(dir.as_ref().join(MANIFEST_FILE_NAME))
    }

    /// Parses manifest text and applies defaults.
    pub fn from_json(content: &str) -> Result<Manifest> {
        let mut manifest: Manifest = serde_json::from_str(content)
            .context("parse manifest")?;
        manifest.normalize()?;
        Ok(manifest)
    }

    fn normalize(&mut self) -> Result<()> {
        if self.bin_dir.is_empty() {
            self.bin_dir = DEFAULT_BIN_DIR.to_string();
        }
        for binary in &mut self.binaries {
            binary.normalize()?;
        }
        Ok(())
    }

    /// Returns the first declaration with the given name.
    ///
    /// Names are not required to be unique; the earliest entry wins.
    pub fn find(&self, name: &str) -> Option<&Binary> {
        self.binaries.iter().find(|binary| binary.name == name)
    }

    /// Resolves `binDir` against `base` unless it is already absolute.
    pub fn resolve_bin_dir<P: AsRef<Path>>(&self, base: P) -> PathBuf {
        let bin_dir = Path::new(&self.bin_dir);
        if bin_dir.is_absolute() {
            bin_dir.to_path_buf()
        } else {
            base.as_ref().join(bin_dir)
        }
    }
}

impl Binary {
    /// Splits an embedded `@version`, fills in defaults and validates the entry.
    ///
    /// An explicit `version` that disagrees with the embedded one is rejected.
    ///
    /// # Errors
    /// Returns [`BdError::InvalidDeclaration`] describing the offending field.
    pub fn normalize(&mut self) -> Result<(), BdError> {
        if let Some((bare, embedded)) = self.package.split_once('@') {
            if embedded.contains('@') {
                return Err(self.invalid("more than one '@' in package"));
            }
            if embedded.is_empty() {
                return Err(self.invalid("empty version after '@'"));
            }
            if !self.version.is_empty() && self.version != embedded {
                let reason = format!(
                    "version '{}' conflicts with '@{}' in package",
                    self.version, embedded
                );
                return Err(self.invalid(&reason));
            }
            let (bare, embedded) = (bare.to_string(), embedded.to_string());
            self.package = bare;
            self.version = embedded;
        }
        if self.package.is_empty() {
            return Err(self.invalid("package must not be empty"));
        }
        if self.version.is_empty() {
            self.version = LATEST.to_string();
        }
        if self.name.is_empty() {
            let last = self
                .package
                .trim_end_matches('/')
                .rsplit('/')
                .next()
                .unwrap_or_default();
            if last.is_empty() {
                return Err(self.invalid("cannot derive a name from the package"));
            }
            self.name = last.to_string();
        }
        if self.toolchain.as_deref() == Some("") {
            self.toolchain = None;
        }
        Ok(())
    }

    /// Whether this declaration must be rebuilt on every install.
    pub fn is_latest(&self) -> bool {
        self.version == LATEST
    }

    fn invalid(&self, reason: &str) -> BdError {
        BdError::InvalidDeclaration {
            package: self.package.clone(),
            reason: reason.to_string(),
        }
    }
}
