//! Recursive mutations built on [`PreOrder`] / [`PostOrder`] walks.
//!
//! Failure at any entry aborts the whole operation. Nothing is rolled back.

use std::io;
use std::path::Path;

use tracing::{debug, trace};

use crate::domain::{EntryType, FsError, FsErrorKind, FsOperation, Metadata, diagnostic};
use crate::ports::Platform;
use crate::services::walk::{PostOrder, PreOrder};

use super::Filesystem;

/// Owner access a copied directory needs while it is being filled.
const OWNER_RWX: u32 = 0o700;

impl<P: Platform> Filesystem<P> {
    /// Mirror the tree under `source` into `destination`.
    ///
    /// Directories are created owner-writable before anything is copied into
    /// them. Files are copied and symlinks are recreated with the same target.
    /// Once every entry is in place, each mirrored directory gets its source
    /// permission bits, children before parents.
    pub fn copy_directory(
        &self,
        source: impl AsRef<Path>,
        destination: impl AsRef<Path>,
    ) -> Result<(), FsError> {
        let (source, destination) = (source.as_ref(), destination.as_ref());
        debug!(source = %source.display(), destination = %destination.display(), "copying directory");

        let root = self.platform.metadata(source).map_err(|err| {
            FsError::io_pair(FsOperation::CopyDirectory, source, destination, err)
        })?;
        if !root.is_dir() {
            return Err(FsError::new(FsErrorKind::InvalidInput, FsOperation::CopyDirectory, source)
                .with_path(destination)
                .with_diagnostic("source is not a directory"));
        }
        let root_mode = Metadata::from(&root).permissions;
        self.create_directory(destination, root_mode | OWNER_RWX)?;
        let mut directory_modes = vec![(destination.to_path_buf(), root_mode)];

        for entry in PreOrder::new(&self.platform, source) {
            let entry = entry?;
            let target = destination.join(&entry.relative);
            match entry.entry_type {
                EntryType::Directory => {
                    self.create_directory(&target, entry.permissions | OWNER_RWX)?;
                    directory_modes.push((target, entry.permissions));
                }
                EntryType::Symlink => {
                    let link_target = self
                        .platform
                        .read_link(&entry.path)
                        .map_err(|err| FsError::io(FsOperation::ReadLink, &entry.path, err))?;
                    self.symlink(&link_target, &target)?;
                }
                EntryType::File | EntryType::Other => {
                    self.copy(&entry.path, &target)?;
                }
            }
        }

        // Reversed pre-order puts every directory after its descendants.
        for (dir, mode) in directory_modes.iter().rev() {
            self.change_permissions(dir, *mode)?;
        }
        Ok(())
    }

    /// Remove `path` and everything below it, children before parents.
    pub fn delete_directory(&self, path: impl AsRef<Path>) -> Result<(), FsError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "deleting directory");
        self.ensure_real_directory(path, FsOperation::DeleteDirectory)?;
        self.remove_children(path)?;
        self.platform
            .remove_dir(path)
            .map_err(|err| FsError::io(FsOperation::DeleteDirectory, path, err))
    }

    /// Remove everything below `path`, keeping `path` itself.
    pub fn clear_directory(&self, path: impl AsRef<Path>) -> Result<(), FsError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "clearing directory");
        self.ensure_real_directory(path, FsOperation::ClearDirectory)?;
        self.remove_children(path)
    }

    /// Remove whatever is at `path`. Nothing there is not an error.
    pub fn remove(&self, path: impl AsRef<Path>) -> Result<(), FsError> {
        let path = path.as_ref();
        match self.platform.symlink_metadata(path) {
            Ok(meta) if meta.is_dir() => self.delete_directory(path),
            Ok(_) => self.delete_file(path),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                trace!(path = %path.display(), "nothing to remove");
                Ok(())
            }
            Err(err) => Err(FsError::io(FsOperation::DeleteFile, path, err)),
        }
    }

    /// Set `path`'s mode, then every descendant's, children first.
    ///
    /// Files get `file_mode`, directories `dir_mode`. Symlinks are left
    /// alone. A failure is reported against `path`; the diagnostic names the
    /// entry that failed.
    pub fn change_permissions_recursively(
        &self,
        path: impl AsRef<Path>,
        dir_mode: u32,
        file_mode: u32,
    ) -> Result<(), FsError> {
        let path = path.as_ref();
        debug!(
            path = %path.display(),
            dir_mode = format_args!("{dir_mode:o}"),
            file_mode = format_args!("{file_mode:o}"),
            "changing permissions recursively"
        );

        let meta = self
            .platform
            .metadata(path)
            .map_err(|err| FsError::io(FsOperation::ChangePermissions, path, err))?;
        let own_mode = if meta.is_file() { file_mode } else { dir_mode };
        self.change_permissions(path, own_mode)?;
        if !meta.is_dir() {
            return Ok(());
        }

        for entry in PostOrder::new(&self.platform, path) {
            let entry = entry.map_err(|err| {
                FsError::new(FsErrorKind::Io, FsOperation::ChangePermissions, path)
                    .with_diagnostic(err.to_string())
            })?;
            let mode = match entry.entry_type {
                EntryType::Directory => dir_mode,
                EntryType::Symlink => continue,
                EntryType::File | EntryType::Other => file_mode,
            };
            trace!(path = %entry.path.display(), mode = format_args!("{mode:o}"), "chmod");
            self.platform.set_permissions(&entry.path, mode).map_err(|err| {
                let detail = diagnostic::capture(&err).unwrap_or_default();
                FsError::io(FsOperation::ChangePermissions, path, err)
                    .with_diagnostic(format!("{}: {detail}", entry.path.display()))
            })?;
        }
        Ok(())
    }

    fn ensure_real_directory(&self, path: &Path, operation: FsOperation) -> Result<(), FsError> {
        let meta =
            self.platform.symlink_metadata(path).map_err(|err| FsError::io(operation, path, err))?;
        if meta.is_dir() {
            Ok(())
        } else {
            Err(FsError::new(FsErrorKind::InvalidInput, operation, path)
                .with_diagnostic("not a directory"))
        }
    }

    fn remove_children(&self, path: &Path) -> Result<(), FsError> {
        for entry in PostOrder::new(&self.platform, path) {
            let entry = entry?;
            if entry.entry_type.is_directory() {
                trace!(path = %entry.path.display(), "removing directory");
                self.platform
                    .remove_dir(&entry.path)
                    .map_err(|err| FsError::io(FsOperation::DeleteDirectory, &entry.path, err))?;
            } else {
                self.delete_file(&entry.path)?;
            }
        }
        Ok(())
    }
}
