use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use anyhow::{Context, Result};

/// How an alias ended up being published.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliasKind {
    Symlink,
    Copy,
}

/// Whether this process may create symbolic links.
///
/// The probe runs on first query and its answer is kept for the
/// lifetime of the handle.
#[derive(Debug)]
pub struct SymlinkSupport {
    probe: fn() -> bool,
    cached: OnceLock<bool>,
}

impl SymlinkSupport {
    /// Probes the platform lazily.
    pub fn detect() -> Self {
        Self {
            probe: probe_symlinks,
            cached: OnceLock::new(),
        }
    }

    /// A handle with a known answer.
    pub fn fixed(can_symlink: bool) -> Self {
        let cached = OnceLock::new();
        let _ = cached.set(can_symlink);
        Self {
            probe: probe_symlinks,
            cached,
        }
    }

    pub fn can_symlink(&self) -> bool {
        *self.cached.get_or_init(|| {
            let supported = (self.probe)();
            tracing::debug!(supported, "probed symlink support");
            supported
        })
    }
}

#[cfg(unix)]
fn probe_symlinks() -> bool {
    true
}

// Unprivileged symlinks need Developer Mode on Windows; try one and see.
#[cfg(windows)]
fn probe_symlinks() -> bool {
    let Ok(dir) = tempfile::tempdir() else {
        return false;
    };
    let target = dir.path().join("target");
    if std::fs::write(&target, b"").is_err() {
        return false;
    }
    std::os::windows::fs::symlink_file(&target, dir.path().join("link")).is_ok()
}

#[cfg(not(any(unix, windows)))]
fn probe_symlinks() -> bool {
    false
}

/// Makes `alias` resolve to `target`, replacing whatever is there.
///
/// A symlink is created when `links` allows it, otherwise `target` is
/// copied byte for byte (permissions included).
///
/// # Errors
///
/// Returns an error if the old alias can't be removed or the new one
/// can't be created.
pub fn publish_alias(target: &Path, alias: &Path, links: &SymlinkSupport) -> Result<AliasKind> {
    remove_existing(alias)?;
    if links.can_symlink() {
        let link_target = link_target(target, alias);
        symlink(&link_target, alias)
            .with_context(|| format!("create symlink {}", alias.display()))?;
        tracing::debug!(
            alias = %alias.display(),
            target = %link_target.display(),
            "symlinked alias"
        );
        Ok(AliasKind::Symlink)
    } else {
        std::fs::copy(target, alias)
            .with_context(|| format!("copy {} to {}", target.display(), alias.display()))?;
        tracing::debug!(alias = %alias.display(), target = %target.display(), "copied alias");
        Ok(AliasKind::Copy)
    }
}

fn remove_existing(alias: &Path) -> Result<()> {
    // symlink_metadata so that dangling links are seen too
    match std::fs::symlink_metadata(alias) {
        Ok(meta) if meta.is_dir() => std::fs::remove_dir_all(alias)
            .with_context(|| format!("remove {}", alias.display())),
        Ok(_) => std::fs::remove_file(alias)
            .with_context(|| format!("remove {}", alias.display())),
        Err(_) => Ok(()),
    }
}

/// Relative to the alias when both live in the same directory.
fn link_target(target: &Path, alias: &Path) -> PathBuf {
    match (target.parent(), alias.parent(), target.file_name()) {
        (Some(target_dir), Some(alias_dir), Some(file_name)) if target_dir == alias_dir => {
            PathBuf::from(file_name)
        }
        _ => target.to_path_buf(),
    }
}

#[cfg(unix)]
fn symlink(target: &Path, alias: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, alias)
}

#[cfg(windows)]
fn symlink(target: &Path, alias: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_file(target, alias)
}

#[cfg(not(any(unix, windows)))]
fn symlink(_target: &Path, _alias: &Path) -> std::io::Result<()> {
    Err(std::io::Error::new(std::io::ErrorKind::Unsupported, "symlinks are not supported"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn setup() -> (tempfile::TempDir, PathBuf, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("tool-v1.0.0");
        fs::write(&target, b"v1").unwrap();
        let alias = dir.path().join("tool");
        (dir, target, alias)
    }

    #[test]
    fn test_fixed_support_is_not_probed() {
        fn explode() -> bool {
            panic!("probe must not run")
        }
        let support = SymlinkSupport { probe: explode, ..SymlinkSupport::fixed(false) };
        assert!(!support.can_symlink());
    }

    #[test]
    fn test_probe_runs_once() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        static CALLS: AtomicUsize = AtomicUsize::new(0);
        fn counting() -> bool {
            CALLS.fetch_add(1, Ordering::SeqCst);
            true
        }
        let support = SymlinkSupport { probe: counting, cached: OnceLock::new() };
        assert!(support.can_symlink());
        assert!(support.can_symlink());
        assert_eq!(CALLS.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_copy_fallback() {
        let (_dir, target, alias) = setup();
        let kind = publish_alias(&target, &alias, &SymlinkSupport::fixed(false)).unwrap();
        assert_eq!(kind, AliasKind::Copy);
        assert!(!fs::symlink_metadata(&alias).unwrap().file_type().is_symlink());
        assert_eq!(fs::read(&alias).unwrap(), b"v1");
    }

    #[test]
    fn test_copy_is_refreshed() {
        let (dir, target, alias) = setup();
        publish_alias(&target, &alias, &SymlinkSupport::fixed(false)).unwrap();
        let newer = dir.path().join("tool-v2.0.0");
        fs::write(&newer, b"v2").unwrap();
        publish_alias(&newer, &alias, &SymlinkSupport::fixed(false)).unwrap();
        assert_eq!(fs::read(&alias).unwrap(), b"v2");
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_is_relative_and_replaced() {
        let (dir, target, alias) = setup();
        fs::write(&alias, b"stale").unwrap();
        let kind = publish_alias(&target, &alias, &SymlinkSupport::fixed(true)).unwrap();
        assert_eq!(kind, AliasKind::Symlink);
        assert_eq!(fs::read_link(&alias).unwrap(), PathBuf::from("tool-v1.0.0"));
        assert_eq!(fs::read(&alias).unwrap(), b"v1");

        let newer = dir.path().join("tool-v2.0.0");
        fs::write(&newer, b"v2").unwrap();
        publish_alias(&newer, &alias, &SymlinkSupport::fixed(true)).unwrap();
        assert_eq!(fs::read(&alias).unwrap(), b"v2");
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_is_replaced() {
        let (dir, target, alias) = setup();
        std::os::unix::fs::symlink(dir.path().join("gone"), &alias).unwrap();
        publish_alias(&target, &alias, &SymlinkSupport::fixed(true)).unwrap();
        assert_eq!(fs::read(&alias).unwrap(), b"v1");
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_across_directories_is_absolute() {
        let (dir, target, _) = setup();
        let other = dir.path().join("other");
        fs::create_dir(&other).unwrap();
        let alias = other.join("tool");
        publish_alias(&target, &alias, &SymlinkSupport::fixed(true)).unwrap();
        assert_eq!(fs::read_link(&alias).unwrap(), target);
    }
}
