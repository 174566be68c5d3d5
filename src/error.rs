use std::path::PathBuf;
use thiserror::Error;
use crate::manifest::MANIFEST_FILE_NAME;

/// Failures callers need to tell apart.
///
/// Everything else travels as a plain [`anyhow::Error`] with context attached.
#[derive(Debug, Error)]
pub enum BdError {
    /// No declaration in the manifest carries the requested name.
    #[error("Binary '{name}' not found in {}", MANIFEST_FILE_NAME)]
    NotDeclared { name: String },
    /// The binary is declared but its version-pinned artifact is missing.
    #[error("Binary '{name}' is not installed. Run 'bd install' first.")]
    NotInstalled { name: String },
    /// The installed artifact could not be started.
    #[error("Failed to execute {}: {source}", .path.display())]
    Launch {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A manifest entry that cannot be normalized.
    #[error("invalid declaration '{package}': {reason}")]
    InvalidDeclaration { package: String, reason: String },
    /// The builder exited successfully but left nothing behind.
    #[error("no built binary found in {}", .dir.display())]
    NoBuildOutput { dir: PathBuf },
}
