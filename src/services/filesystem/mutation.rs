//! Single-entry mutations.

use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::debug;

use crate::domain::{FsError, FsOperation, OpenMode};
use crate::ports::Platform;

use super::Filesystem;

impl<P: Platform> Filesystem<P> {
    /// Create `path` and every missing ancestor with `mode`.
    ///
    /// Succeeds without mutation when `path` is already a directory. A
    /// create call that fails because a concurrent creator got there first
    /// counts as success.
    pub fn create_directory(&self, path: impl AsRef<Path>, mode: u32) -> Result<(), FsError> {
        let path = path.as_ref();
        if self.is_directory(path)? {
            return Ok(());
        }

        let mut missing: Vec<PathBuf> = vec![path.to_path_buf()];
        let mut cursor = path.parent();
        while let Some(parent) = cursor {
            if parent.as_os_str().is_empty() || self.is_directory(parent)? {
                break;
            }
            missing.push(parent.to_path_buf());
            cursor = parent.parent();
        }

        for dir in missing.iter().rev() {
            self.create_single_directory(dir, mode)?;
        }
        Ok(())
    }

    fn create_single_directory(&self, path: &Path, mode: u32) -> Result<(), FsError> {
        debug!(path = %path.display(), mode = format_args!("{mode:o}"), "creating directory");
        match self.platform.create_dir(path, mode) {
            Ok(()) => Ok(()),
            Err(err) => {
                if matches!(self.is_directory(path), Ok(true)) {
                    debug!(path = %path.display(), "directory appeared concurrently");
                    return Ok(());
                }
                Err(FsError::io(FsOperation::CreateDirectory, path, err))
            }
        }
    }

    pub fn rename(&self, from: impl AsRef<Path>, to: impl AsRef<Path>) -> Result<(), FsError> {
        let (from, to) = (from.as_ref(), to.as_ref());
        debug!(from = %from.display(), to = %to.display(), "renaming");
        self.platform
            .rename(from, to)
            .map_err(|err| FsError::io_pair(FsOperation::Rename, from, to, err))
    }

    /// Copy a single file, returning the number of bytes copied.
    pub fn copy(&self, from: impl AsRef<Path>, to: impl AsRef<Path>) -> Result<u64, FsError> {
        let (from, to) = (from.as_ref(), to.as_ref());
        debug!(from = %from.display(), to = %to.display(), "copying file");
        self.platform
            .copy_file(from, to)
            .map_err(|err| FsError::io_pair(FsOperation::Copy, from, to, err))
    }

    /// Create `link` pointing at `target`.
    pub fn symlink(&self, target: impl AsRef<Path>, link: impl AsRef<Path>) -> Result<(), FsError> {
        let (target, link) = (target.as_ref(), link.as_ref());
        debug!(target = %target.display(), link = %link.display(), "creating symlink");
        self.platform
            .symlink(target, link)
            .map_err(|err| FsError::io_pair(FsOperation::Symlink, target, link, err))
    }

    pub fn delete_file(&self, path: impl AsRef<Path>) -> Result<(), FsError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "deleting file");
        self.platform.remove_file(path).map_err(|err| FsError::io(FsOperation::DeleteFile, path, err))
    }

    /// Create `path` if missing and set its timestamps (`None` means now).
    pub fn touch(
        &self,
        path: impl AsRef<Path>,
        modified: Option<SystemTime>,
        accessed: Option<SystemTime>,
    ) -> Result<(), FsError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "touching");
        self.platform
            .touch(path, accessed, modified)
            .map_err(|err| FsError::io(FsOperation::Touch, path, err))
    }

    pub fn change_permissions(&self, path: impl AsRef<Path>, mode: u32) -> Result<(), FsError> {
        let path = path.as_ref();
        debug!(path = %path.display(), mode = format_args!("{mode:o}"), "changing permissions");
        self.platform
            .set_permissions(path, mode)
            .map_err(|err| FsError::io(FsOperation::ChangePermissions, path, err))
    }

    pub fn read_file(&self, path: impl AsRef<Path>) -> Result<Vec<u8>, FsError> {
        let path = path.as_ref();
        self.platform.read_file(path).map_err(|err| FsError::io(FsOperation::ReadFile, path, err))
    }

    pub fn read_to_string(&self, path: impl AsRef<Path>) -> Result<String, FsError> {
        let path = path.as_ref();
        let bytes = self.read_file(path)?;
        String::from_utf8(bytes).map_err(|err| {
            FsError::io(FsOperation::ReadFile, path, io::Error::new(io::ErrorKind::InvalidData, err))
        })
    }

    /// Replace the contents of `path`, creating it if missing.
    ///
    /// Every byte is written or the call fails; returns the byte count.
    pub fn write_file(&self, path: impl AsRef<Path>, contents: impl AsRef<[u8]>) -> Result<usize, FsError> {
        self.write_with(path.as_ref(), OpenMode::Truncate { read: false }, contents.as_ref())
    }

    /// Append to `path`, creating it if missing.
    pub fn append_file(&self, path: impl AsRef<Path>, contents: impl AsRef<[u8]>) -> Result<usize, FsError> {
        self.write_with(path.as_ref(), OpenMode::Append { read: false }, contents.as_ref())
    }

    fn write_with(&self, path: &Path, mode: OpenMode, contents: &[u8]) -> Result<usize, FsError> {
        debug!(path = %path.display(), bytes = contents.len(), ?mode, "writing file");
        let mut stream = self.open(path, mode)?;
        let written = stream.write(contents)?;
        stream.close()?;
        Ok(written)
    }
}
