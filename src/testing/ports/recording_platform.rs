//! Test double for `Platform` that logs mutations and injects failures.

use std::cell::RefCell;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::adapters::OsPlatform;
use crate::domain::OpenMode;
use crate::ports::{Access, Platform};

/// A mutating native call observed by [`RecordingPlatform`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CreateDir(PathBuf),
    RemoveFile(PathBuf),
    RemoveDir(PathBuf),
    CopyFile(PathBuf, PathBuf),
    SetPermissions(PathBuf, u32),
}

/// Native call to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOn {
    Metadata,
    CreateDir,
    RemoveFile,
    RemoveDir,
    CopyFile,
    SetPermissions,
}

#[derive(Debug, Clone)]
struct InjectedFailure {
    call: FailOn,
    path: PathBuf,
    kind: io::ErrorKind,
}

/// Delegates to the real OS, recording every mutation in call order.
#[derive(Debug, Default)]
pub struct RecordingPlatform {
    inner: OsPlatform,
    calls: RefCell<Vec<Call>>,
    failure: Option<InjectedFailure>,
}

impl RecordingPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `call` on exactly `path` fail with `kind`.
    pub fn fail_on(mut self, call: FailOn, path: impl AsRef<Path>, kind: io::ErrorKind) -> Self {
        self.failure = Some(InjectedFailure { call, path: path.as_ref().to_path_buf(), kind });
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn check(&self, call: FailOn, path: &Path) -> io::Result<()> {
        match &self.failure {
            Some(failure) if failure.call == call && failure.path == path => {
                Err(io::Error::new(failure.kind, format!("injected {call:?} failure")))
            }
            _ => Ok(()),
        }
    }
}

impl Platform for RecordingPlatform {
    fn metadata(&self, path: &Path) -> io::Result<fs::Metadata> {
        self.check(FailOn::Metadata, path)?;
        self.inner.metadata(path)
    }

    fn symlink_metadata(&self, path: &Path) -> io::Result<fs::Metadata> {
        self.check(FailOn::Metadata, path)?;
        self.inner.symlink_metadata(path)
    }

    fn access(&self, path: &Path, access: Access) -> io::Result<bool> {
        self.inner.access(path, access)
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        self.inner.canonicalize(path)
    }

    fn create_dir(&self, path: &Path, mode: u32) -> io::Result<()> {
        self.record(Call::CreateDir(path.to_path_buf()));
        self.check(FailOn::CreateDir, path)?;
        self.inner.create_dir(path, mode)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        self.record(Call::RemoveFile(path.to_path_buf()));
        self.check(FailOn::RemoveFile, path)?;
        self.inner.remove_file(path)
    }

    fn remove_dir(&self, path: &Path) -> io::Result<()> {
        self.record(Call::RemoveDir(path.to_path_buf()));
        self.check(FailOn::RemoveDir, path)?;
        self.inner.remove_dir(path)
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<OsString>> {
        self.inner.read_dir(path)
    }

    fn copy_file(&self, from: &Path, to: &Path) -> io::Result<u64> {
        self.record(Call::CopyFile(from.to_path_buf(), to.to_path_buf()));
        self.check(FailOn::CopyFile, from)?;
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
        self.record(Call::SetPermissions(path.to_path_buf(), mode));
        self.check(FailOn::SetPermissions, path)?;
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
