//! Test double for `Platform` that simulates a concurrent directory creator.

use std::cell::Cell;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::adapters::OsPlatform;
use crate::domain::OpenMode;
use crate::ports::{Access, Platform};

/// Creates `contested` itself right before the facade's own create call on
/// it, so the facade's call fails with `AlreadyExists`.
#[derive(Debug)]
pub struct RacingPlatform {
    inner: OsPlatform,
    contested: PathBuf,
    raced: Cell<bool>,
    create_calls: Cell<usize>,
}

impl RacingPlatform {
    pub fn new(contested: impl AsRef<Path>) -> Self {
        Self {
            inner: OsPlatform,
            contested: contested.as_ref().to_path_buf(),
            raced: Cell::new(false),
            create_calls: Cell::new(0),
        }
    }

    /// Whether the simulated peer has created the contested directory.
    pub fn raced(&self) -> bool {
        self.raced.get()
    }

    /// Number of `create_dir` calls issued by the facade.
    pub fn create_calls(&self) -> usize {
        self.create_calls.get()
    }
}

impl Platform for RacingPlatform {
    fn metadata(&self, path: &Path) -> io::Result<fs::Metadata> {
        self.inner.metadata(path)
    }

    fn symlink_metadata(&self, path: &Path) -> io::Result<fs::Metadata> {
        self.inner.symlink_metadata(path)
    }

    fn access(&self, path: &Path, access: Access) -> io::Result<bool> {
        self.inner.access(path, access)
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        self.inner.canonicalize(path)
    }

    fn create_dir(&self, path: &Path, mode: u32) -> io::Result<()> {
        self.create_calls.set(self.create_calls.get() + 1);
        if path == self.contested && !self.raced.get() {
            self.inner.create_dir(path, mode)?;
            self.raced.set(true);
        }
        self.inner.create_dir(path, mode)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        self.inner.remove_file(path)
    }

    fn remove_dir(&self, path: &Path) -> io::Result<()> {
        self.inner.remove_dir(path)
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<OsString>> {
        self.inner.read_dir(path)
    }

    fn copy_file(&self, from: &Path, to: &Path) -> io::Result<u64> {
        self.inner.copy_file(from, to)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        self.inner.rename(from, to)
    }

    fn symlink(&self, target: &Path, link: &Path) -> io::Result<()> {
        self.inner.symlink(target, link)
    }

    fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
        self.inner.read_link(path)
    }

    fn set_permissions(&self, path: &Path, mode: u32) -> io::Result<()> {
        self.inner.set_permissions(path, mode)
    }

    fn touch(
        &self,
        path: &Path,
        accessed: Option<SystemTime>,
        modified: Option<SystemTime>,
    ) -> io::Result<()> {
        self.inner.touch(path, accessed, modified)
    }

    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.inner.read_file(path)
    }

    fn open(&self, path: &Path, mode: OpenMode) -> io::Result<File> {
        self.inner.open(path, mode)
    }
}
