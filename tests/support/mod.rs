//! Shared fixtures for the integration tests.
//!
//! A project is a temp directory holding a `bd.json` and a fake `go`
//! program. The fake `go` logs every invocation next to itself and, for
//! `install <pkg>@<version>`, writes a shell script named after the last
//! package segment into `$GOBIN`. That script prints its name, version and
//! arguments and exits with `$TOOL_EXIT` (default 0). Packages ending in
//! `/broken` fail to build.
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use assert_cmd::Command;
use tempfile::TempDir;

const FAKE_GO: &str = r##"#!/bin/sh
echo "$* GOTOOLCHAIN=${GOTOOLCHAIN:-}" >> "$(dirname "$0")/go.log"
[ "$1" = "install" ] || exit 2
spec="$2"
pkg="${spec%@*}"
version="${spec##*@}"
name="${pkg##*/}"
if [ "$name" = "broken" ]; then
    echo "build failed" >&2
    exit 1
fi
printf '#!/bin/sh\necho "%s %s $*"\nexit ${TOOL_EXIT:-0}\n' "$name" "$version" > "$GOBIN/$name"
chmod +x "$GOBIN/$name"
"##;

pub struct Project {
    pub dir: TempDir,
    tools: TempDir,
}

impl Project {
    pub fn new(manifest: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let tools = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bd.json"), manifest).unwrap();
        let go = tools.path().join("go");
        fs::write(&go, FAKE_GO).unwrap();
        make_executable(&go);
        Project { dir, tools }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn go(&self) -> PathBuf {
        self.tools.path().join("go")
    }

    pub fn log(&self) -> PathBuf {
        self.tools.path().join("go.log")
    }

    /// Lines logged by the fake `go`, one per build.
    pub fn builds(&self) -> Vec<String> {
        fs::read_to_string(self.log())
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// `bd` running in the project with the fake `go`.
    pub fn bd(&self) -> Command {
        let mut cmd = Command::cargo_bin("bd").unwrap();
        cmd.current_dir(self.path())
            .env("BD_GO", self.go())
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG");
        cmd
    }
}

pub fn make_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    let mut permissions = fs::metadata(path).unwrap().permissions();
    permissions.set_mode(0o755);
    fs::set_permissions(path, permissions).unwrap();
}
