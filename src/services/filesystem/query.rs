//! Query operations.
//!
//! Each query performs a fresh native call. A definite negative (the entry
//! does not exist, or an ancestor is not a directory) is `Ok(false)`; any
//! other failure is ambiguous and surfaces as an `FsError`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::trace;

use crate::domain::{FsError, FsOperation, Metadata};
use crate::ports::{Access, Platform};
use crate::services::walk::{PreOrder, children};

use super::Filesystem;

/// Whether a native error means "nothing there" rather than "could not tell".
fn is_definite_absence(err: &io::Error) -> bool {
    if err.kind() == io::ErrorKind::NotFound {
        return true;
    }
    #[cfg(unix)]
    {
        err.raw_os_error() == Some(libc::ENOTDIR)
    }
    #[cfg(not(unix))]
    {
        false
    }
}

impl<P: Platform> Filesystem<P> {
    fn lookup(
        &self,
        path: &Path,
        operation: FsOperation,
        result: io::Result<fs::Metadata>,
    ) -> Result<Option<fs::Metadata>, FsError> {
        match result {
            Ok(meta) => Ok(Some(meta)),
            Err(err) if is_definite_absence(&err) => Ok(None),
            Err(err) => Err(FsError::io(operation, path, err)),
        }
    }

    /// Whether anything exists at `path` (symlinks are followed).
    pub fn exists(&self, path: impl AsRef<Path>) -> Result<bool, FsError> {
        let path = path.as_ref();
        let meta = self.lookup(path, FsOperation::CheckExistence, self.platform.metadata(path))?;
        Ok(meta.is_some())
    }

    pub fn is_file(&self, path: impl AsRef<Path>) -> Result<bool, FsError> {
        let path = path.as_ref();
        let meta = self.lookup(path, FsOperation::Stat, self.platform.metadata(path))?;
        Ok(meta.is_some_and(|m| m.is_file()))
    }

    pub fn is_directory(&self, path: impl AsRef<Path>) -> Result<bool, FsError> {
        let path = path.as_ref();
        let meta = self.lookup(path, FsOperation::Stat, self.platform.metadata(path))?;
        Ok(meta.is_some_and(|m| m.is_dir()))
    }

    /// Whether the entry at `path` is itself a symlink.
    pub fn is_link(&self, path: impl AsRef<Path>) -> Result<bool, FsError> {
        let path = path.as_ref();
        let meta = self.lookup(path, FsOperation::Stat, self.platform.symlink_metadata(path))?;
        Ok(meta.is_some_and(|m| m.file_type().is_symlink()))
    }

    pub fn is_readable(&self, path: impl AsRef<Path>) -> Result<bool, FsError> {
        let path = path.as_ref();
        self.platform
            .access(path, Access::Read)
            .map_err(|err| FsError::io(FsOperation::CheckAccess, path, err))
    }

    pub fn is_writable(&self, path: impl AsRef<Path>) -> Result<bool, FsError> {
        let path = path.as_ref();
        self.platform
            .access(path, Access::Write)
            .map_err(|err| FsError::io(FsOperation::CheckAccess, path, err))
    }

    /// Metadata snapshot of `path`, or `None` when nothing exists there.
    pub fn stat(&self, path: impl AsRef<Path>) -> Result<Option<Metadata>, FsError> {
        let path = path.as_ref();
        let meta = self.lookup(path, FsOperation::Stat, self.platform.metadata(path))?;
        Ok(meta.as_ref().map(Metadata::from))
    }

    /// Resolve symlinks and relative segments.
    ///
    /// `None` is a normal outcome (for example, the path does not exist) and
    /// is not reported as an error; callers must check it.
    pub fn real_path(&self, path: impl AsRef<Path>) -> Option<PathBuf> {
        let path = path.as_ref();
        match self.platform.canonicalize(path) {
            Ok(resolved) => Some(resolved),
            Err(err) => {
                trace!(path = %path.display(), error = %err, "real path unavailable");
                None
            }
        }
    }

    /// Absolute paths of the children of `path`, sorted by name.
    pub fn list_directory(&self, path: impl AsRef<Path>) -> Result<Vec<PathBuf>, FsError> {
        let root = self.absolute(path.as_ref(), FsOperation::ListDirectory)?;
        children(&self.platform, &root)
    }

    /// Absolute paths of every descendant of `path`, parent before children.
    pub fn list_directory_recursive(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<Vec<PathBuf>, FsError> {
        let root = self.absolute(path.as_ref(), FsOperation::ListDirectory)?;
        PreOrder::new(&self.platform, root).map(|entry| entry.map(|e| e.path)).collect()
    }

    fn absolute(&self, path: &Path, operation: FsOperation) -> Result<PathBuf, FsError> {
        std::path::absolute(path).map_err(|err| FsError::io(operation, path, err))
    }
}
