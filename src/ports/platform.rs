//! Native single-entry filesystem calls.
//!
//! Every method performs exactly one native operation and returns its
//! `io::Result` untouched. Interpreting results (negative vs. ambiguous,
//! race tolerance, error context) belongs to the facade built on top.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::domain::OpenMode;

/// Access check performed by [`Platform::access`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

/// Port for the native filesystem.
pub trait Platform {
    /// Stat following symlinks.
    fn metadata(&self, path: &Path) -> io::Result<fs::Metadata>;

    /// Stat the entry itself without following a final symlink.
    fn symlink_metadata(&self, path: &Path) -> io::Result<fs::Metadata>;

    /// Whether the calling process may read or write `path`.
    ///
    /// `Ok(false)` is a definite denial or absence; `Err` means the check
    /// itself could not be performed.
    fn access(&self, path: &Path, access: Access) -> io::Result<bool>;

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;

    /// Create a single directory. The parent must exist.
    fn create_dir(&self, path: &Path, mode: u32) -> io::Result<()>;

    fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Remove an empty directory.
    fn remove_dir(&self, path: &Path) -> io::Result<()>;

    /// Names of the children of `path`, in no particular order, excluding `.` and `..`.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<OsString>>;

    fn copy_file(&self, from: &Path, to: &Path) -> io::Result<u64>;

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Create `link` pointing at `target`.
    fn symlink(&self, target: &Path, link: &Path) -> io::Result<()>;

    fn read_link(&self, path: &Path) -> io::Result<PathBuf>;

    /// Set permission bits, following symlinks.
    fn set_permissions(&self, path: &Path, mode: u32) -> io::Result<()>;

    /// Create `path` if missing, then set its timestamps (`None` means now).
    fn touch(
        &self,
        path: &Path,
        accessed: Option<SystemTime>,
        modified: Option<SystemTime>,
    ) -> io::Result<()>;

    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>>;

    fn open(&self, path: &Path, mode: OpenMode) -> io::Result<File>;
}
