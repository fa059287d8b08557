//! Shared testing harness for `fsgate` integration tests.

use assert_cmd::Command;
use assert_fs::TempDir;
use assert_fs::prelude::*;
use std::path::{Path, PathBuf};

/// Isolated working directory for CLI and facade exercises.
pub(crate) struct TestContext {
    root: TempDir,
}

impl TestContext {
    /// Create a new isolated environment.
    pub(crate) fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp directory for tests");
        Self { root }
    }

    /// Root of the isolated environment.
    pub(crate) fn root(&self) -> &Path {
        self.root.path()
    }

    /// Absolute path of `relative` inside the environment.
    pub(crate) fn path(&self, relative: &str) -> PathBuf {
        self.root.path().join(relative)
    }

    /// Build a command for invoking the compiled `fsgate` binary in the environment.
    pub(crate) fn cli(&self) -> Command {
        let mut cmd = Command::cargo_bin("fsgate").expect("Failed to locate fsgate binary");
        cmd.current_dir(self.root()).env_remove("RUST_LOG");
        cmd
    }

    /// Write `content` to `relative`, creating parent directories.
    pub(crate) fn write(&self, relative: &str, content: &str) {
        self.root.child(relative).write_str(content).expect("Failed to write fixture file");
    }

    /// Create the directory `relative` and its ancestors.
    pub(crate) fn mkdir(&self, relative: &str) {
        self.root.child(relative).create_dir_all().expect("Failed to create fixture directory");
    }

    /// Populate a small project tree used by copy/delete scenarios.
    pub(crate) fn seed_tree(&self, relative: &str) -> PathBuf {
        self.write(&format!("{relative}/README.md"), "# demo\n");
        self.write(&format!("{relative}/src/main.rs"), "fn main() {}\n");
        self.write(&format!("{relative}/src/util/mod.rs"), "pub fn helper() {}\n");
        self.mkdir(&format!("{relative}/empty"));
        self.path(relative)
    }
}
