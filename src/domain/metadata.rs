use std::fs;
use std::time::SystemTime;

use serde::Serialize;

/// Type of a directory entry, as reported without following symlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    File,
    Directory,
    Symlink,
    Other,
}

impl EntryType {
    pub fn from_file_type(file_type: fs::FileType) -> Self {
        if file_type.is_symlink() {
            EntryType::Symlink
        } else if file_type.is_dir() {
            EntryType::Directory
        } else if file_type.is_file() {
            EntryType::File
        } else {
            EntryType::Other
        }
    }

    pub fn is_directory(self) -> bool {
        self == EntryType::Directory
    }
}

/// Snapshot of a stat query.
///
/// Taken at query time and never refreshed; a later query is required to
/// observe subsequent changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metadata {
    pub entry_type: EntryType,
    pub size: u64,
    /// Permission bits (`mode & 0o7777`).
    pub permissions: u32,
    pub accessed: Option<SystemTime>,
    pub modified: Option<SystemTime>,
    /// Inode change time on Unix, creation time elsewhere.
    pub changed: Option<SystemTime>,
    pub device: u64,
    pub inode: u64,
    pub links: u64,
    pub uid: u32,
    pub gid: u32,
}

impl Metadata {
    pub fn is_file(&self) -> bool {
        self.entry_type == EntryType::File
    }

    pub fn is_directory(&self) -> bool {
        self.entry_type.is_directory()
    }
}

impl From<&fs::Metadata> for Metadata {
    #[cfg(unix)]
    fn from(meta: &fs::Metadata) -> Self {
        use std::os::unix::fs::MetadataExt;
        use std::time::{Duration, UNIX_EPOCH};

        let changed = u64::try_from(meta.ctime())
            .ok()
            .map(|secs| UNIX_EPOCH + Duration::new(secs, meta.ctime_nsec().clamp(0, 999_999_999) as u32));

        Self {
            entry_type: EntryType::from_file_type(meta.file_type()),
            size: meta.size(),
            permissions: meta.mode() & 0o7777,
            accessed: meta.accessed().ok(),
            modified: meta.modified().ok(),
            changed,
            device: meta.dev(),
            inode: meta.ino(),
            links: meta.nlink(),
            uid: meta.uid(),
            gid: meta.gid(),
        }
    }

    #[cfg(not(unix))]
    fn from(meta: &fs::Metadata) -> Self {
        let permissions = if meta.permissions().readonly() { 0o444 } else { 0o666 };
        Self {
            entry_type: EntryType::from_file_type(meta.file_type()),
            size: meta.len(),
            permissions,
            accessed: meta.accessed().ok(),
            modified: meta.modified().ok(),
            changed: meta.created().ok(),
            device: 0,
            inode: 0,
            links: 1,
            uid: 0,
            gid: 0,
        }
    }
}
