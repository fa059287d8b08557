//! Directory traversal on an explicit stack.
//!
//! Two orders are provided:
//!
//! - [`PreOrder`]: a directory is yielded before its children.
//! - [`PostOrder`]: a directory is yielded after all of its children.
//!
//! Siblings are visited in name order. The root itself is never yielded.
//! Symlinks are reported as [`EntryType::Symlink`] and never descended into.
//! The first failure is yielded as `Err` and ends the walk.

use std::path::{Path, PathBuf};

use tracing::trace;

use crate::domain::{EntryType, FsError, FsOperation, Metadata};
use crate::ports::Platform;

/// A single entry produced by a walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkEntry {
    /// `root` joined with `relative`.
    pub path: PathBuf,
    /// Path relative to the walk root.
    pub relative: PathBuf,
    /// 1 for direct children of the root.
    pub depth: usize,
    pub entry_type: EntryType,
    /// Permission bits of the entry itself.
    pub permissions: u32,
}

/// Sorted child paths of `dir`.
pub(crate) fn children<P: Platform + ?Sized>(
    platform: &P,
    dir: &Path,
) -> Result<Vec<PathBuf>, FsError> {
    let mut names =
        platform.read_dir(dir).map_err(|err| FsError::io(FsOperation::ListDirectory, dir, err))?;
    names.sort();
    Ok(names.into_iter().map(|name| dir.join(name)).collect())
}

fn describe<P: Platform + ?Sized>(
    platform: &P,
    root: &Path,
    path: PathBuf,
    depth: usize,
) -> Result<WalkEntry, FsError> {
    let meta = platform
        .symlink_metadata(&path)
        .map_err(|err| FsError::io(FsOperation::Stat, &path, err))?;
    let meta = Metadata::from(&meta);
    let relative = path.strip_prefix(root).map(Path::to_path_buf).unwrap_or_else(|_| path.clone());
    trace!(path = %path.display(), depth, "visiting entry");
    Ok(WalkEntry { path, relative, depth, entry_type: meta.entry_type, permissions: meta.permissions })
}

/// Parent-before-children traversal.
pub struct PreOrder<'a, P: Platform + ?Sized> {
    platform: &'a P,
    root: PathBuf,
    pending: Vec<(PathBuf, usize)>,
    started: bool,
    done: bool,
}

impl<'a, P: Platform + ?Sized> PreOrder<'a, P> {
    pub fn new(platform: &'a P, root: impl Into<PathBuf>) -> Self {
        Self { platform, root: root.into(), pending: Vec::new(), started: false, done: false }
    }

    fn push_children(&mut self, dir: &Path, depth: usize) -> Result<(), FsError> {
        let children = children(self.platform, dir)?;
        self.pending.extend(children.into_iter().rev().map(|child| (child, depth)));
        Ok(())
    }

    fn fail(&mut self, err: FsError) -> Option<Result<WalkEntry, FsError>> {
        self.done = true;
        self.pending.clear();
        Some(Err(err))
    }
}

impl<P: Platform + ?Sized> Iterator for PreOrder<'_, P> {
    type Item = Result<WalkEntry, FsError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            let root = self.root.clone();
            if let Err(err) = self.push_children(&root, 1) {
                return self.fail(err);
            }
        }

        let Some((path, depth)) = self.pending.pop() else {
            self.done = true;
            return None;
        };
        let entry = match describe(self.platform, &self.root, path, depth) {
            Ok(entry) => entry,
            Err(err) => return self.fail(err),
        };
        if entry.entry_type.is_directory() {
            if let Err(err) = self.push_children(&entry.path, depth + 1) {
                return self.fail(err);
            }
        }
        Some(Ok(entry))
    }
}

struct Frame {
    entry: Option<WalkEntry>,
    depth: usize,
    /// Children in reverse name order, so `pop` yields the next sibling.
    pending: Vec<PathBuf>,
}

/// Children-before-parent traversal.
pub struct PostOrder<'a, P: Platform + ?Sized> {
    platform: &'a P,
    root: PathBuf,
    frames: Vec<Frame>,
    started: bool,
    done: bool,
}

impl<'a, P: Platform + ?Sized> PostOrder<'a, P> {
    pub fn new(platform: &'a P, root: impl Into<PathBuf>) -> Self {
        Self { platform, root: root.into(), frames: Vec::new(), started: false, done: false }
    }

    fn push_frame(&mut self, entry: Option<WalkEntry>, dir: &Path, depth: usize) -> Result<(), FsError> {
        let mut pending = children(self.platform, dir)?;
        pending.reverse();
        self.frames.push(Frame { entry, depth, pending });
        Ok(())
    }

    fn fail(&mut self, err: FsError) -> Option<Result<WalkEntry, FsError>> {
        self.done = true;
        self.frames.clear();
        Some(Err(err))
    }
}

impl<P: Platform + ?Sized> Iterator for PostOrder<'_, P> {
    type Item = Result<WalkEntry, FsError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            let root = self.root.clone();
            if let Err(err) = self.push_frame(None, &root, 0) {
                return self.fail(err);
            }
        }

        loop {
            let Some(frame) = self.frames.last_mut() else {
                self.done = true;
                return None;
            };

            let Some(child) = frame.pending.pop() else {
                // All children visited: the directory itself comes next.
                let finished = self.frames.pop()?;
                match finished.entry {
                    Some(entry) => return Some(Ok(entry)),
                    None => {
                        self.done = true;
                        return None;
                    }
                }
            };

            let depth = frame.depth + 1;
            let entry = match describe(self.platform, &self.root, child, depth) {
                Ok(entry) => entry,
                Err(err) => return self.fail(err),
            };
            if !entry.entry_type.is_directory() {
                return Some(Ok(entry));
            }
            let dir = entry.path.clone();
            if let Err(err) = self.push_frame(Some(entry), &dir, depth) {
                return self.fail(err);
            }
        }
    }
}
