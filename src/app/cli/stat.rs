use std::path::Path;
use std::time::SystemTime;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::domain::{EntryType, Metadata};

/// Printable form of a metadata snapshot.
#[derive(Debug, Serialize)]
pub(super) struct StatView {
    path: String,
    entry_type: EntryType,
    size: u64,
    permissions: String,
    accessed: Option<String>,
    modified: Option<String>,
    changed: Option<String>,
    inode: u64,
    links: u64,
    uid: u32,
    gid: u32,
}

impl StatView {
    pub(super) fn new(path: &Path, meta: &Metadata) -> Self {
        Self {
            path: path.display().to_string(),
            entry_type: meta.entry_type,
            size: meta.size,
            permissions: format!("{:04o}", meta.permissions),
            accessed: meta.accessed.map(format_time),
            modified: meta.modified.map(format_time),
            changed: meta.changed.map(format_time),
            inode: meta.inode,
            links: meta.links,
            uid: meta.uid,
            gid: meta.gid,
        }
    }

    pub(super) fn render_text(&self) -> String {
        let entry_type = match self.entry_type {
            EntryType::File => "file",
            EntryType::Directory => "directory",
            EntryType::Symlink => "symlink",
            EntryType::Other => "other",
        };
        let unknown = || "-".to_string();
        format!(
            "path: {}\ntype: {}\nsize: {}\npermissions: {}\nmodified: {}\naccessed: {}\nchanged: {}\ninode: {}\nlinks: {}\nowner: {}:{}",
            self.path,
            entry_type,
            self.size,
            self.permissions,
            self.modified.clone().unwrap_or_else(unknown),
            self.accessed.clone().unwrap_or_else(unknown),
            self.changed.clone().unwrap_or_else(unknown),
            self.inode,
            self.links,
            self.uid,
            self.gid,
        )
    }
}

fn format_time(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).to_rfc3339_opts(SecondsFormat::Secs, true)
}
