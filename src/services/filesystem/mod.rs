//! The filesystem facade.
//!
//! `Filesystem` turns raw [`Platform`] results into the uniform contract of
//! this crate: a well-typed value, or an [`FsError`] naming the operation,
//! the subject path(s), and the native diagnostic.

mod mutation;
mod query;
mod recursive;

use std::fs::File;
use std::path::Path;

use tracing::debug;

use crate::adapters::OsPlatform;
use crate::domain::{FsError, FsErrorKind, FsOperation, OpenMode};
use crate::ports::Platform;
use crate::services::stream::Stream;

/// Local filesystem facade over a [`Platform`].
#[derive(Debug, Clone, Default)]
pub struct Filesystem<P = OsPlatform> {
    platform: P,
}

impl Filesystem<OsPlatform> {
    /// Facade over the local operating system.
    pub fn local() -> Self {
        Self::new(OsPlatform)
    }
}

impl<P: Platform> Filesystem<P> {
    pub fn new(platform: P) -> Self {
        Self { platform }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Open a stream on `path`.
    ///
    /// The returned handle is owned by the caller until [`Stream::close`].
    pub fn open(&self, path: impl AsRef<Path>, mode: OpenMode) -> Result<Stream<File>, FsError> {
        let path = path.as_ref();
        debug!(path = %path.display(), ?mode, "opening stream");
        let file =
            self.platform.open(path, mode).map_err(|err| FsError::io(FsOperation::Open, path, err))?;
        Ok(Stream::new(path, file))
    }

    /// Open a stream with an fopen-style mode string such as `"r+"`.
    pub fn open_with(&self, path: impl AsRef<Path>, mode: &str) -> Result<Stream<File>, FsError> {
        let path = path.as_ref();
        let mode = OpenMode::parse(mode).ok_or_else(|| {
            FsError::new(FsErrorKind::InvalidInput, FsOperation::Open, path)
                .with_diagnostic(format!("unsupported open mode '{mode}'"))
        })?;
        self.open(path, mode)
    }
}
